//! Scan command - parse one invoice document and print the record.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use restock_core::models::invoice::InvoiceRecord;
use restock_core::parsers;

use crate::input;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input document (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Report data issues found in the parsed record
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV line items
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ScanArgs) -> anyhow::Result<()> {
    let text = input::read_document(&args.input)?;

    let record = parsers::parse_document(&text)
        .map_err(|e| anyhow::anyhow!("{}: {e}", args.input.display()))?;
    println!(
        "{} {} invoice detected, {} item(s)",
        style("✓").green(),
        record.distributor,
        record.items.len()
    );

    if args.validate {
        let issues = record.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Data issues:").yellow());
            for issue in &issues {
                eprintln!("  - {issue}");
            }
        }
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&record)?,
        OutputFormat::Csv => format_csv(&record)?,
        OutputFormat::Text => format_text(&record),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{output}");
    }

    Ok(())
}

fn format_csv(record: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["sku", "upc", "name", "quantity", "unit_price"])?;
    for item in &record.items {
        wtr.write_record([
            item.sku.as_deref().unwrap_or(""),
            item.upc.as_deref().unwrap_or(""),
            &item.name,
            &item.quantity.to_string(),
            &item.unit_price.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &InvoiceRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Distributor: {}\n", record.distributor));
    if let Some(number) = &record.invoice_number {
        output.push_str(&format!("Invoice: {number}\n"));
    }
    if let Some(date) = record.invoice_date {
        output.push_str(&format!("Date: {date}\n"));
    }
    if let Some(po) = &record.po_number {
        output.push_str(&format!("PO: {po}\n"));
    }
    output.push('\n');

    for item in &record.items {
        let identifier = item
            .sku
            .as_deref()
            .or(item.upc.as_deref())
            .unwrap_or("(no identifier)");
        output.push_str(&format!(
            "  {:>6} x {:<20} {:<40} @ {}\n",
            item.quantity, identifier, item.name, item.unit_price
        ));
    }

    output
}

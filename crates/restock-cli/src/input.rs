//! Document input handling.
//!
//! PDF byte-to-text extraction is a collaborator, not part of the
//! pipeline: PDFs go through `pdf-extract`, anything else is read as a
//! UTF-8 text blob (useful for pre-extracted documents and fixtures).

use std::fs;
use std::path::Path;

use anyhow::Context;

pub fn read_document(path: &Path) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension == "pdf" {
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        pdf_extract::extract_text_from_mem(&data)
            .with_context(|| format!("extracting text from {}", path.display()))
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

//! End-to-end checks for the scan command over text-blob inputs.

use assert_cmd::Command;
use predicates::prelude::*;

const RANDOLPH_DOC: &str = "\
Groupe Randolph Inc.
Facture : INV/2025/06/1087
Date de la facture : 2025-06-26
[LKY AME-R02-FR] Améliorations Roll Player
2,00
27,0000 MSRP 39,99
Sous-total
";

fn write_doc(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn scan_parses_a_randolph_document() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(&dir, "invoice.txt", RANDOLPH_DOC);

    Command::cargo_bin("restock")
        .unwrap()
        .arg("scan")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("Groupe Randolph Inc."))
        .stdout(predicate::str::contains("LKY AME-R02-FR"));
}

#[test]
fn scan_json_output_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(&dir, "invoice.txt", RANDOLPH_DOC);
    let out = dir.path().join("record.json");

    Command::cargo_bin("restock")
        .unwrap()
        .args(["scan", "--format", "json", "--output"])
        .arg(&out)
        .arg(&doc)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["distributor"], "randolph");
    assert_eq!(json["invoice_number"], "INV/2025/06/1087");
    assert_eq!(json["items"][0]["sku"], "LKY AME-R02-FR");
}

#[test]
fn scan_rejects_unrecognized_distributor() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(&dir, "mystery.txt", "Some Other Wholesale Inc.\n1 x thing\n");

    Command::cargo_bin("restock")
        .unwrap()
        .arg("scan")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no known distributor marker"));
}

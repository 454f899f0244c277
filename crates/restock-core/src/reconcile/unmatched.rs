//! Persistent queue of identifiers that failed catalog resolution.
//!
//! The queue file is an append-only UTF-8 log, one tab-separated
//! `identifier\tdisplay_name` record per line. A separate backfill pass
//! reads it back and creates the missing catalog entries.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::debug;

/// Open handle on the queue file for one run.
///
/// Deduplication happens only within a run, through the in-memory
/// seen-set; re-running without clearing the file accumulates duplicates
/// across runs, and clearing is the caller's decision.
pub struct UnmatchedQueue {
    file: File,
    seen: HashSet<String>,
}

impl UnmatchedQueue {
    /// Open (creating if needed) the queue file in append mode.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file,
            seen: HashSet::new(),
        })
    }

    /// Append one record. Returns false when the identifier was already
    /// recorded during this run.
    pub fn record(&mut self, identifier: &str, display_name: &str) -> std::io::Result<bool> {
        if !self.seen.insert(identifier.to_string()) {
            debug!(identifier, "already queued this run");
            return Ok(false);
        }
        writeln!(self.file, "{identifier}\t{display_name}")?;
        Ok(true)
    }

    /// Identifiers recorded during this run.
    pub fn recorded(&self) -> usize {
        self.seen.len()
    }

    /// Read every record currently in the queue file.
    pub fn read_all(path: &Path) -> std::io::Result<Vec<UnmatchedRecord>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(content
            .lines()
            .filter_map(|line| {
                let (identifier, display_name) = line.split_once('\t').unwrap_or((line, ""));
                let identifier = identifier.trim();
                if identifier.is_empty() {
                    return None;
                }
                Some(UnmatchedRecord {
                    identifier: identifier.to_string(),
                    display_name: display_name.trim().to_string(),
                })
            })
            .collect())
    }

    /// Truncate the queue file.
    pub fn clear(path: &Path) -> std::io::Result<()> {
        std::fs::write(path, "")
    }
}

/// One queued identifier awaiting catalog-entry creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedRecord {
    /// UPC or SKU, whichever the invoice carried.
    pub identifier: String,
    /// Item description from the invoice, for the created entry.
    pub display_name: String,
}

impl UnmatchedRecord {
    /// SKU-shaped identifiers are non-numeric or shorter than a UPC.
    pub fn is_sku(&self) -> bool {
        !self.identifier.chars().all(|c| c.is_ascii_digit()) || self.identifier.len() < 12
    }
}

use anyhow::Result;
use std::io::Write;

use crate::domain::Ledger;

use super::ledger_csv;

/// File name offered for downloads of the ledger.
pub const EXPORT_FILE_NAME: &str = "expenses.csv";
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

/// A complete serialized ledger ready to be handed out as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBlob {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Exporter for turning a ledger into the same CSV shape used for storage
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Export the ledger as CSV into any writer
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        ledger_csv::write_ledger(self.ledger, writer)
    }

    /// Export the ledger as an in-memory download
    pub fn export_blob(&self) -> Result<ExportBlob> {
        Ok(ExportBlob {
            file_name: EXPORT_FILE_NAME,
            content_type: EXPORT_CONTENT_TYPE,
            bytes: ledger_csv::ledger_to_bytes(self.ledger)?,
        })
    }
}

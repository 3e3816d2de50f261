use std::io::Read;

use crate::domain::Ledger;

use super::ledger_csv::{self, LedgerRow};

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Start from an empty ledger instead of merging into the current one
    pub replace: bool,
    /// Report what would happen without keeping the result
    pub dry_run: bool,
}

/// Importer for loading `Participant,Amount` rows into a ledger
pub struct Importer {
    options: ImportOptions,
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Build the ledger that results from importing `reader` on top of `base`.
    ///
    /// Rows with parse errors or repeated names are reported and skipped. In
    /// merge mode, names already in `base` keep their balance and count as
    /// skipped.
    pub fn import_csv<R: Read>(&self, base: &Ledger, reader: R) -> (Ledger, ImportResult) {
        let mut ledger = if self.options.replace {
            Ledger::new()
        } else {
            base.clone()
        };
        let existing = ledger.clone();
        let mut result = ImportResult::default();

        for (line_num, row) in ledger_csv::read_rows(reader).enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let row: LedgerRow = match row {
                Ok(r) => r,
                Err(e) => {
                    result.errors.push(ImportError {
                        line,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let amount = match row.amount_cents() {
                Ok(a) => a,
                Err(e) => {
                    result.errors.push(ImportError {
                        line,
                        error: format!("{:#}", e),
                    });
                    continue;
                }
            };

            if existing.contains(&row.participant) {
                result.skipped += 1;
                continue;
            }

            let name = match ledger.add(row.participant.clone()) {
                Ok(added) => added.name.clone(),
                Err(e) => {
                    result.errors.push(ImportError {
                        line,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if let Err(e) = ledger.apply_delta(&name, amount) {
                result.errors.push(ImportError {
                    line,
                    error: e.to_string(),
                });
                continue;
            }

            result.imported += 1;
        }

        (ledger, result)
    }
}

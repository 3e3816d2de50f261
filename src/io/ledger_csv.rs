use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::domain::{Cents, Ledger, format_cents, parse_cents};

pub const PARTICIPANT_COLUMN: &str = "Participant";
pub const AMOUNT_COLUMN: &str = "Amount";

/// One `Participant,Amount` row as it appears on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    #[serde(rename = "Participant")]
    pub participant: String,
    #[serde(rename = "Amount")]
    pub amount: String,
}

impl LedgerRow {
    pub fn amount_cents(&self) -> Result<Cents> {
        parse_cents(&self.amount)
            .with_context(|| format!("Invalid amount '{}' for {}", self.amount, self.participant))
    }
}

/// Write the whole ledger as `Participant,Amount` CSV, amounts with two decimals.
pub fn write_ledger<W: Write>(ledger: &Ledger, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    // An empty ledger still gets its header
    csv_writer.write_record([PARTICIPANT_COLUMN, AMOUNT_COLUMN])?;

    let mut count = 0;
    for participant in ledger.iter() {
        csv_writer.write_record([
            participant.name.as_str(),
            format_cents(participant.net_balance).as_str(),
        ])?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

/// Serialize the ledger into an in-memory CSV buffer.
pub fn ledger_to_bytes(ledger: &Ledger) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_ledger(ledger, &mut buffer)?;
    Ok(buffer)
}

/// Read raw rows without interpreting them.
pub fn read_rows<R: Read>(reader: R) -> csv::DeserializeRecordsIntoIter<R, LedgerRow> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize()
}

/// Read a complete ledger. Any malformed row, bad amount or repeated name fails
/// the whole read.
pub fn read_ledger<R: Read>(reader: R) -> Result<Ledger> {
    let mut entries = Vec::new();
    for (index, row) in read_rows(reader).enumerate() {
        let line = index + 2; // header is line 1
        let row: LedgerRow = row.with_context(|| format!("Malformed CSV row at line {}", line))?;
        let amount = row
            .amount_cents()
            .with_context(|| format!("Bad amount at line {}", line))?;
        entries.push((row.participant, amount));
    }

    Ledger::from_entries(entries).context("Stored ledger is inconsistent")
}

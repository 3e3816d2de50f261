use std::io::Read;

use tracing::{debug, info};

use crate::domain::{
    BalanceDelta, Cents, Ledger, Participant, PaymentEvent, Summary, record_payment, summarize,
};
use crate::io::{ExportBlob, Exporter, ImportOptions, ImportResult, Importer};
use crate::storage::LedgerStore;

use super::AppError;

/// Application service owning one identity's ledger and its store.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// Every mutation works on a copy of the ledger; the copy is written through
/// to the store and only then replaces the session's ledger, so a failed
/// operation (validation or storage) leaves both untouched.
pub struct LedgerService<S: LedgerStore> {
    store: S,
    ledger: Ledger,
}

/// Result of recording a payment
#[derive(Debug)]
pub struct PaymentResult {
    pub payment: PaymentEvent,
    pub deltas: Vec<BalanceDelta>,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Open a session on the ledger held by `store`.
    pub async fn open(store: S) -> Result<Self, AppError> {
        let ledger = store.load().await?;
        info!(
            location = %store.location(),
            participants = ledger.len(),
            "ledger loaded"
        );
        Ok(Self { store, ledger })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn commit(&mut self, next: Ledger) -> Result<(), AppError> {
        self.store.save(&next).await?;
        self.ledger = next;
        Ok(())
    }

    // ========================
    // Participant operations
    // ========================

    /// Add a participant with a zero balance.
    pub async fn add_participant(&mut self, name: &str) -> Result<(), AppError> {
        let mut next = self.ledger.clone();
        let added = next.add(name)?.name.clone();
        self.commit(next).await?;
        info!(participant = %added, "participant added");
        Ok(())
    }

    /// Remove a participant and their balance.
    pub async fn remove_participant(&mut self, name: &str) -> Result<Participant, AppError> {
        let mut next = self.ledger.clone();
        let removed = next.remove(name)?;
        self.commit(next).await?;
        info!(
            participant = name,
            balance = removed.net_balance,
            "participant removed"
        );
        Ok(removed)
    }

    /// Participant names in insertion order.
    pub fn participants(&self) -> Vec<String> {
        self.ledger.list().map(str::to_string).collect()
    }

    /// Raw net balances (running totals before fair-share normalization).
    pub fn balances(&self) -> Vec<(String, Cents)> {
        self.ledger
            .iter()
            .map(|p| (p.name.clone(), p.net_balance))
            .collect()
    }

    // ========================
    // Settlement operations
    // ========================

    /// Validate a payment, apply it and persist the new balances.
    pub async fn record_payment(
        &mut self,
        payment: PaymentEvent,
    ) -> Result<PaymentResult, AppError> {
        let mut next = self.ledger.clone();
        let deltas = record_payment(&mut next, &payment)?;
        self.commit(next).await?;

        info!(
            payer = %payment.payer,
            amount = payment.amount_cents,
            split = payment.policy.as_str(),
            description = payment.description.as_deref().unwrap_or(""),
            "payment recorded"
        );
        for delta in &deltas {
            debug!(
                participant = %delta.participant,
                charge = delta.charge,
                delta = delta.delta,
                "balance delta"
            );
        }

        Ok(PaymentResult { payment, deltas })
    }

    /// Fair-share summary of the current ledger. Never mutates anything.
    pub fn summary(&self) -> Result<Summary, AppError> {
        Ok(summarize(&self.ledger)?)
    }

    /// Drop every participant and delete the stored record.
    pub async fn reset(&mut self) -> Result<(), AppError> {
        self.store.delete().await?;
        self.ledger.reset();
        info!(location = %self.store.location(), "ledger reset");
        Ok(())
    }

    // ========================
    // Import / export
    // ========================

    /// Serialize the current ledger as a CSV download.
    pub fn export(&self) -> Result<ExportBlob, AppError> {
        Ok(Exporter::new(&self.ledger).export_blob()?)
    }

    /// Import `Participant,Amount` rows. Dry runs report without saving.
    pub async fn import_csv<R: Read>(
        &mut self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult, AppError> {
        let importer = Importer::new(options);
        let (next, result) = importer.import_csv(&self.ledger, reader);

        if importer.options().dry_run {
            debug!(imported = result.imported, "dry run import, nothing saved");
            return Ok(result);
        }

        self.commit(next).await?;
        info!(
            imported = result.imported,
            skipped = result.skipped,
            errors = result.errors.len(),
            "import complete"
        );
        Ok(result)
    }
}

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Cents, Ledger, LedgerError, PaymentEvent, SplitPolicy, allocate, format_cents};

/// Change applied to one participant's net balance by a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDelta {
    pub participant: String,
    /// What this participant is charged for the payment
    pub charge: Cents,
    /// Net effect on the balance (credit for the payer minus the charge)
    pub delta: Cents,
}

/// Compute the per-participant deltas for a payment without touching the ledger.
///
/// Deltas come back in ledger order and always sum to zero: the payer is
/// credited the full amount and every participant, payer included, is charged
/// their portion.
pub fn compute_deltas(
    ledger: &Ledger,
    payment: &PaymentEvent,
) -> Result<Vec<BalanceDelta>, LedgerError> {
    if payment.amount_cents <= 0 {
        return Err(LedgerError::InvalidAmount(payment.amount_cents));
    }
    if ledger.is_empty() {
        return Err(LedgerError::EmptyLedger);
    }
    if !ledger.contains(&payment.payer) {
        return Err(LedgerError::ParticipantNotFound(payment.payer.clone()));
    }

    let charges = match &payment.policy {
        SplitPolicy::Equal => allocate(payment.amount_cents, &vec![Decimal::ONE; ledger.len()]),
        SplitPolicy::Weighted(shares) => {
            validate_shares(shares, ledger.len())?;
            allocate(payment.amount_cents, shares)
        }
    };

    let mut deltas = Vec::with_capacity(ledger.len());
    for (participant, charge) in ledger.iter().zip(charges) {
        let credit = if participant.name == payment.payer {
            payment.amount_cents
        } else {
            0
        };
        let delta = credit - charge;
        // Every resulting balance must stay representable before anything is applied
        if participant.net_balance.checked_add(delta).is_none() {
            return Err(LedgerError::InvalidAmount(payment.amount_cents));
        }
        deltas.push(BalanceDelta {
            participant: participant.name.clone(),
            charge,
            delta,
        });
    }
    Ok(deltas)
}

/// Shares must match the participant count, be non-negative and add up to
/// exactly 100.
pub fn validate_shares(shares: &[Decimal], participant_count: usize) -> Result<(), LedgerError> {
    if shares.len() != participant_count {
        return Err(LedgerError::ShareMismatch {
            expected: participant_count,
            actual: shares.len(),
        });
    }
    let sum: Decimal = shares.iter().sum();
    let has_negative = shares.iter().any(|s| s.is_sign_negative() && !s.is_zero());
    if sum != Decimal::ONE_HUNDRED || has_negative {
        return Err(LedgerError::ShareSumInvalid { sum });
    }
    Ok(())
}

/// Validate a payment and apply its deltas to the ledger.
///
/// All validation happens in [`compute_deltas`]; once it succeeds every delta
/// targets a participant that is known to exist, so the ledger is either fully
/// updated or left untouched.
pub fn record_payment(
    ledger: &mut Ledger,
    payment: &PaymentEvent,
) -> Result<Vec<BalanceDelta>, LedgerError> {
    let deltas = compute_deltas(ledger, payment)?;
    for delta in &deltas {
        ledger.apply_delta(&delta.participant, delta.delta)?;
    }
    Ok(deltas)
}

/// Where a participant stands once the fair share is subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "amount_cents", rename_all = "snake_case")]
pub enum Standing {
    Receives(Cents),
    Owes(Cents),
    Settled,
}

impl Standing {
    pub fn from_balance(balance: Cents) -> Self {
        match balance.signum() {
            1 => Standing::Receives(balance),
            -1 => Standing::Owes(-balance),
            _ => Standing::Settled,
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standing::Receives(amount) => write!(f, "should receive {}", format_cents(*amount)),
            Standing::Owes(amount) => write!(f, "owes {}", format_cents(*amount)),
            Standing::Settled => write!(f, "is settled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub participant: String,
    pub net_balance: Cents,
    pub fair_share: Cents,
    /// `net_balance - fair_share`
    pub balance: Cents,
    pub standing: Standing,
}

/// Read-only projection of a ledger against the group-wide fair share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: Cents,
    pub participant_count: usize,
    pub entries: Vec<SummaryEntry>,
}

impl Summary {
    pub fn get(&self, participant: &str) -> Option<&SummaryEntry> {
        self.entries.iter().find(|e| e.participant == participant)
    }

    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|e| e.standing == Standing::Settled)
    }
}

/// Project the ledger onto per-participant settlement balances.
///
/// The fair share is `total / count`, expressed in whole cents by the same
/// largest-remainder split used for payments, so the summary balances always
/// add up to zero.
pub fn summarize(ledger: &Ledger) -> Result<Summary, LedgerError> {
    if ledger.is_empty() {
        return Err(LedgerError::EmptyLedger);
    }

    let total = ledger.total()?;
    let fair_shares = allocate(total, &vec![Decimal::ONE; ledger.len()]);

    let entries = ledger
        .iter()
        .zip(fair_shares)
        .map(|(participant, fair_share)| {
            let balance = participant
                .net_balance
                .checked_sub(fair_share)
                .ok_or(LedgerError::InvalidAmount(participant.net_balance))?;
            Ok(SummaryEntry {
                participant: participant.name.clone(),
                net_balance: participant.net_balance,
                fair_share,
                balance,
                standing: Standing::from_balance(balance),
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    Ok(Summary {
        total,
        participant_count: ledger.len(),
        entries,
    })
}

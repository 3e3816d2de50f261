use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::Cents;

/// How a payment is divided among the participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Everyone, payer included, is charged the same fraction.
    Equal,
    /// Percentage shares, one per participant in ledger order.
    Weighted(Vec<Decimal>),
}

impl SplitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitPolicy::Equal => "equal",
            SplitPolicy::Weighted(_) => "weighted",
        }
    }
}

/// A single payment waiting to be applied to a ledger. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentEvent {
    pub payer: String,
    /// Amount in cents (must be positive)
    pub amount_cents: Cents,
    pub policy: SplitPolicy,
    /// Free-form label, ignored by the calculation
    pub description: Option<String>,
}

impl PaymentEvent {
    pub fn new(payer: impl Into<String>, amount_cents: Cents, policy: SplitPolicy) -> Self {
        Self {
            payer: payer.into(),
            amount_cents,
            policy,
            description: None,
        }
    }

    pub fn equal(payer: impl Into<String>, amount_cents: Cents) -> Self {
        Self::new(payer, amount_cents, SplitPolicy::Equal)
    }

    pub fn weighted(payer: impl Into<String>, amount_cents: Cents, shares: Vec<Decimal>) -> Self {
        Self::new(payer, amount_cents, SplitPolicy::Weighted(shares))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Parse a comma-separated list of percentage shares.
/// Example: "50,30,20" -> [50, 30, 20], "33.33, 33.33, 33.34" -> [33.33, 33.33, 33.34]
pub fn parse_shares(input: &str) -> Result<Vec<Decimal>, ParseSharesError> {
    input
        .split(',')
        .enumerate()
        .map(|(index, raw)| {
            let raw = raw.trim();
            let share =
                Decimal::from_str(raw).map_err(|_| ParseSharesError::InvalidShare {
                    position: index + 1,
                    value: raw.to_string(),
                })?;
            if share.is_sign_negative() && !share.is_zero() {
                return Err(ParseSharesError::NegativeShare {
                    position: index + 1,
                    value: raw.to_string(),
                });
            }
            Ok(share)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseSharesError {
    InvalidShare { position: usize, value: String },
    NegativeShare { position: usize, value: String },
}

impl fmt::Display for ParseSharesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseSharesError::InvalidShare { position, value } => {
                write!(f, "share #{} is not a number: '{}'", position, value)
            }
            ParseSharesError::NegativeShare { position, value } => {
                write!(f, "share #{} must not be negative: '{}'", position, value)
            }
        }
    }
}

impl std::error::Error for ParseSharesError {}

/// Split `total` cents proportionally to `weights` using the largest-remainder
/// method.
///
/// Every portion is the floor of its exact value; the cents left over go one
/// each to the largest fractional remainders, ties resolved by position. The
/// portions always add up to `total`. Weights must be non-negative with a
/// positive sum; otherwise every portion is zero.
pub fn allocate(total: Cents, weights: &[Decimal]) -> Vec<Cents> {
    let weight_sum: Decimal = weights.iter().sum();
    if weights.is_empty() || weight_sum <= Decimal::ZERO {
        return vec![0; weights.len()];
    }

    let total_dec = Decimal::from(total);
    let mut portions = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());

    for (index, weight) in weights.iter().enumerate() {
        let exact = total_dec * *weight / weight_sum;
        let floor = exact.floor();
        portions.push(floor.to_i64().unwrap_or(0));
        remainders.push((index, exact - floor));
    }

    let leftover = total - portions.iter().sum::<Cents>();
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    for (index, _) in remainders.into_iter().take(leftover.max(0) as usize) {
        portions[index] += 1;
    }

    portions
}

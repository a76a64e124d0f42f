use alloy::primitives::U256;
use std::fmt;
use thiserror::Error;

use crate::config::Network;
use crate::sources::Reading;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("currency unit mismatch in response: no `{expected}` among [{found}]")]
    Mismatch { expected: String, found: String },
    #[error("error converting `{amount}` to an integer: {reason}")]
    MalformedAmount { amount: String, reason: String },
}

/// Balance in the network's smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(pub U256);

impl Amount {
    /// Whether this amount is strictly below a (possibly fractional) threshold
    pub fn is_below(&self, threshold: f64) -> bool {
        if threshold <= 0.0 {
            return false;
        }
        // b < t  <=>  b < ceil(t) for integer b; saturates for absurd thresholds
        let bound = U256::from(threshold.ceil() as u128);
        self.0 < bound
    }

    /// Amount divided by the network's conversion factor, for display
    pub fn to_display(&self, conversion_factor: f64) -> f64 {
        let raw = self.0.to_string().parse::<f64>().unwrap_or(0.0);
        if conversion_factor > 0.0 {
            raw / conversion_factor
        } else {
            raw
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Pick the amount denominated in `network.currency_unit` out of a reading.
///
/// If several entries carry the same denom, the last one wins.
pub fn extract(reading: &Reading, network: &Network) -> Result<Amount, ExtractError> {
    let matched = reading
        .coins
        .iter()
        .rev()
        .find(|coin| coin.denom == network.currency_unit)
        .ok_or_else(|| ExtractError::Mismatch {
            expected: network.currency_unit.clone(),
            found: reading
                .coins
                .iter()
                .map(|c| c.denom.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })?;

    let digits = matched.amount.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExtractError::MalformedAmount {
            amount: matched.amount.clone(),
            reason: "not a base-10 integer".to_string(),
        });
    }

    U256::from_str_radix(digits, 10)
        .map(Amount)
        .map_err(|e| ExtractError::MalformedAmount {
            amount: matched.amount.clone(),
            reason: e.to_string(),
        })
}

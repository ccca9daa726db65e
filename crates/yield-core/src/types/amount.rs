use alloy_primitives::utils::{format_units, parse_units, ParseUnits};
use alloy_primitives::U256;
use std::fmt;
use thiserror::Error;

use super::TokenDescriptor;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Amount must not be negative: {0}")]
    Negative(String),

    #[error("Amount is not a decimal number: {0}")]
    NotANumber(String),

    #[error("Amount {amount} has more fractional digits than the token's {decimals} decimals")]
    TooPrecise { amount: String, decimals: u8 },

    #[error("Amount must be greater than zero")]
    Zero,

    #[error("Amount {amount} cannot be scaled: {reason}")]
    Scaling { amount: String, reason: String },

    #[error("Amount was scaled with {actual} decimals but {token} has {expected}")]
    DecimalsMismatch {
        token: String,
        expected: u8,
        actual: u8,
    },
}

/// A user-facing quantity of a specific token.
///
/// The human amount is scaled to base units exactly once, when the amount is
/// parsed. Everything downstream works with [`AmountSpec::base_units`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountSpec {
    raw: String,
    decimals: u8,
    base_units: U256,
}

impl AmountSpec {
    /// Parse a non-negative decimal string such as `1`, `0.25` or `.5`.
    ///
    /// Inputs with more fractional digits than the token supports are
    /// rejected rather than truncated.
    pub fn parse(raw: &str, token: &TokenDescriptor) -> Result<Self, AmountError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AmountError::Empty);
        }
        if raw.starts_with('-') {
            return Err(AmountError::Negative(raw.to_string()));
        }

        let (integer, fraction) = raw.split_once('.').unwrap_or((raw, ""));
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction)
        {
            return Err(AmountError::NotANumber(raw.to_string()));
        }
        if fraction.len() > token.decimals as usize {
            return Err(AmountError::TooPrecise {
                amount: raw.to_string(),
                decimals: token.decimals,
            });
        }

        let scaled = parse_units(raw, token.decimals).map_err(|e| AmountError::Scaling {
            amount: raw.to_string(),
            reason: e.to_string(),
        })?;
        let base_units = match scaled {
            ParseUnits::U256(value) => value,
            ParseUnits::I256(_) => return Err(AmountError::Negative(raw.to_string())),
        };
        if base_units.is_zero() {
            return Err(AmountError::Zero);
        }

        Ok(Self {
            raw: raw.to_string(),
            decimals: token.decimals,
            base_units,
        })
    }

    /// The amount as the user typed it
    pub fn human(&self) -> &str {
        &self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// The amount in the token's smallest indivisible unit
    pub fn base_units(&self) -> U256 {
        self.base_units
    }
}

impl fmt::Display for AmountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} base units)", self.raw, self.base_units)
    }
}

/// Render a base-unit amount in human units for logging
pub fn format_base_units(value: U256, decimals: u8) -> String {
    format_units(value, decimals).unwrap_or_else(|_| value.to_string())
}

//! Currency string normalization.
//!
//! Export amounts arrive as `"$12,345.67"`, `"1.234,56"`, plain numbers, or a
//! sentinel such as `"Locked"`. Everything that is not a digit or a separator is
//! dropped, so amounts are always read as non-negative.

use std::str::FromStr;

use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::LOCKED_VALUE_TOKEN;

/// Why an amount string could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("value is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    Unparsable(String),
}

/// Parses a currency-formatted string into an exact decimal.
pub fn parse_currency_decimal(raw: &str) -> Result<Decimal, AmountError> {
    let cleaned = clean_amount(raw).ok_or(AmountError::Empty)?;
    Decimal::from_str(&cleaned).map_err(|_| AmountError::Unparsable(raw.to_string()))
}

/// Parses a currency-formatted string into an `f64`.
pub fn parse_currency(raw: &str) -> Result<f64, AmountError> {
    // Round-trip through the decimal's exact text so the f64 is correctly rounded
    let value = parse_currency_decimal(raw)?;
    value
        .to_string()
        .parse::<f64>()
        .map_err(|_| AmountError::Unparsable(raw.to_string()))
}

/// Ledger-style reading of an amount: missing means "no transaction" (zero),
/// garbage is logged and read as zero.
pub fn amount_or_zero(raw: &str, field_name: &str) -> f64 {
    match parse_currency(raw) {
        Ok(value) => value,
        Err(AmountError::Empty) => 0.0,
        Err(e) => {
            warn!("Failed to parse {} '{}': {}. Falling back to zero.", field_name, raw, e);
            0.0
        }
    }
}

/// Reduces a raw amount to `digits[.digits]`, or `None` if no digit is present.
fn clean_amount(raw: &str) -> Option<String> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if !kept.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let dotted = match kept.rfind([',', '.']) {
        Some(idx) if kept[idx..].starts_with(',') && comma_is_decimal(&kept, idx) => {
            let (whole, fraction) = kept.split_at(idx);
            format!("{}.{}", whole.replace([',', '.'], ""), &fraction[1..])
        }
        _ => kept.replace(',', ""),
    };

    let collapsed = collapse_extra_points(&dotted);
    let trimmed = collapsed.trim_end_matches('.');
    if trimmed.starts_with('.') {
        Some(format!("0{}", trimmed))
    } else {
        Some(trimmed.to_string())
    }
}

/// A trailing comma is the decimal separator when a point precedes it
/// (`1.234,56`) or when it is not followed by a thousands group (`1,5`).
fn comma_is_decimal(kept: &str, comma_idx: usize) -> bool {
    let fraction_len = kept.len() - comma_idx - 1;
    kept[..comma_idx].contains('.') || (fraction_len > 0 && fraction_len != 3)
}

/// Keeps only the last decimal point: `1.234.56` reads as `1234.56`.
fn collapse_extra_points(value: &str) -> String {
    match value.rfind('.') {
        Some(last) if value.matches('.').count() > 1 => {
            let (head, tail) = value.split_at(last);
            format!("{}{}", head.replace('.', ""), tail)
        }
        _ => value.to_string(),
    }
}

/// An amount column that may carry the "value not disclosed" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "amount")]
pub enum ReportedValue {
    Known(f64),
    Locked,
}

impl ReportedValue {
    /// Reads a raw cell, recognising the locked sentinel before any numeric coercion.
    pub fn parse(raw: &str, field_name: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case(LOCKED_VALUE_TOKEN) {
            ReportedValue::Locked
        } else {
            ReportedValue::Known(amount_or_zero(raw, field_name))
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, ReportedValue::Locked)
    }

    /// The usable amount; a locked value counts as zero.
    pub fn amount(&self) -> f64 {
        match self {
            ReportedValue::Known(value) => *value,
            ReportedValue::Locked => 0.0,
        }
    }
}

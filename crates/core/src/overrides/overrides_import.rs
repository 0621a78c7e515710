//! Reads the override side table.
//!
//! The table is a CSV whose first line is a free-form comment, followed by a
//! header with at least `Company/Fund`, `Match Date` and `New Value`. Any other
//! columns are ignored.

use std::collections::HashMap;

use log::{debug, warn};

use super::ValueOverride;
use crate::errors::{Error, Result, ValidationError};
use crate::investments::{parse_csv, ParseConfig, COLUMN_COMPANY};
use crate::normalize::{parse_currency, parse_export_date, DateConvention};

pub const COLUMN_MATCH_DATE: &str = "Match Date";
pub const COLUMN_NEW_VALUE: &str = "New Value";

/// Parses override rows. Rows without a usable date or value are skipped.
pub fn load_value_overrides(
    content: &[u8],
    config: &ParseConfig,
    convention: DateConvention,
) -> Result<Vec<ValueOverride>> {
    let parsed = parse_csv(content, config)?;
    let index: HashMap<&str, usize> = parsed
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();
    let column = |name: &str| -> Result<usize> {
        index.get(name).copied().ok_or_else(|| {
            Error::Validation(ValidationError::MissingColumn(name.to_string()))
        })
    };
    let company_idx = column(COLUMN_COMPANY)?;
    let date_idx = column(COLUMN_MATCH_DATE)?;
    let value_idx = column(COLUMN_NEW_VALUE)?;

    let mut overrides = Vec::new();
    for (row_idx, row) in parsed.rows.iter().enumerate() {
        let company = row[company_idx].trim();
        let raw_value = row[value_idx].trim();
        if company.is_empty() || raw_value.is_empty() {
            continue;
        }
        let Some(invest_date) = parse_export_date(&row[date_idx], convention) else {
            warn!("Override row {} ({}) has no usable match date, skipping", row_idx, company);
            continue;
        };
        match parse_currency(raw_value) {
            Ok(new_value) => overrides.push(ValueOverride {
                company: company.to_string(),
                invest_date,
                new_value,
            }),
            Err(e) => warn!("Override row {} ({}): {}, skipping", row_idx, company, e),
        }
    }

    debug!("Loaded {} value overrides", overrides.len());
    Ok(overrides)
}

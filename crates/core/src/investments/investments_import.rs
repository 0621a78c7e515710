//! Maps parsed CSV rows onto raw investment records.

use std::collections::HashMap;

use log::{debug, warn};

use super::csv_parser::{parse_csv, ParseConfig, ParsedCsvResult};
use super::investments_constants::*;
use super::investments_model::{ColumnSchema, RawDataset, RawInvestment};
use crate::errors::{Error, Result, ValidationError};

/// Parses an export file and maps it onto raw investment rows.
///
/// Fails when the header lacks `Company/Fund` or `Invested`. Other missing
/// required columns are logged; the features that depend on them fail later
/// with `Error::SchemaMismatch`.
pub fn load_investments(content: &[u8], config: &ParseConfig) -> Result<RawDataset> {
    let parsed = parse_csv(content, config)?;
    raw_dataset_from_csv(parsed)
}

/// Builds a `RawDataset` from an already parsed CSV.
pub fn raw_dataset_from_csv(parsed: ParsedCsvResult) -> Result<RawDataset> {
    let schema = ColumnSchema::new(parsed.headers.clone());
    for column in ESSENTIAL_COLUMNS {
        if !schema.contains(column) {
            return Err(Error::Validation(ValidationError::MissingColumn(
                column.to_string(),
            )));
        }
    }
    for column in schema.missing_required() {
        warn!("Export has no '{}' column; dependent breakdowns are unavailable", column);
    }

    let index: HashMap<&str, usize> = parsed
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let rows: Vec<RawInvestment> = parsed
        .rows
        .iter()
        .map(|row| {
            let cell = |column: &str| -> Option<String> {
                index
                    .get(column)
                    .and_then(|&i| row.get(i))
                    .map(|v| v.trim().to_string())
            };
            let text = |column: &str| cell(column).unwrap_or_default();

            RawInvestment {
                company: text(COLUMN_COMPANY),
                status: text(COLUMN_STATUS),
                lead: text(COLUMN_LEAD),
                round: text(COLUMN_ROUND),
                market: text(COLUMN_MARKET),
                invest_date: text(COLUMN_INVEST_DATE),
                invested: text(COLUMN_INVESTED),
                realized_value: text(COLUMN_REALIZED_VALUE),
                unrealized_value: text(COLUMN_UNREALIZED_VALUE),
                net_value: text(COLUMN_NET_VALUE),
                multiple: text(COLUMN_MULTIPLE),
                round_size: cell(COLUMN_ROUND_SIZE),
                valuation_or_cap: cell(COLUMN_VALUATION_OR_CAP),
                realized_date: cell(COLUMN_REALIZED_DATE),
                url: cell(COLUMN_URL).filter(|u| !u.is_empty()),
                valuation_unknown: cell(COLUMN_VALUATION_UNKNOWN).and_then(|v| parse_flag(&v)),
            }
        })
        .collect();

    debug!(
        "Loaded {} investment rows ({} columns, {} parse issues)",
        rows.len(),
        schema.columns.len(),
        parsed.errors.len()
    );

    Ok(RawDataset {
        schema,
        rows,
        preamble: parsed.preamble,
        parse_errors: parsed.errors,
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "Investments export,,\n\
        Company/Fund,Status,Lead,Round,Market,Invest Date,Invested,Realized Value,Unrealized Value,Net Value,Multiple,URL\n\
        Acme,Active,Jane Syndicate,Seed,Fintech,01/15/20,\"$1,000\",$0,\"$3,000\",\"$3,000\",3.00x,https://acme.test\n\
        Beta,Active,Jane Syndicate,Series A,Health,06/01/21,$500,$0,Locked,Locked,Locked,\n";

    #[test]
    fn test_load_maps_columns() {
        let dataset = load_investments(EXPORT.as_bytes(), &ParseConfig::default()).unwrap();

        assert_eq!(dataset.rows.len(), 2);
        let acme = &dataset.rows[0];
        assert_eq!(acme.company, "Acme");
        assert_eq!(acme.invested, "$1,000");
        assert_eq!(acme.unrealized_value, "$3,000");
        assert_eq!(acme.url.as_deref(), Some("https://acme.test"));
        assert_eq!(acme.realized_date, None);
        assert_eq!(dataset.rows[1].unrealized_value, "Locked");
        assert_eq!(dataset.rows[1].url, None);
        assert!(!dataset.schema.has_realized_dates());
        assert!(dataset.schema.missing_required().is_empty());
    }

    #[test]
    fn test_missing_essential_column_is_fatal() {
        let content = b"title\nCompany/Fund,Status\nAcme,Active\n";
        let err = load_investments(content, &ParseConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingColumn(ref c)) if c == "Invested"
        ));
    }

    #[test]
    fn test_missing_optional_columns_degrade() {
        let content = b"title\nCompany/Fund,Invested,Unrealized Value\nAcme,100,50\n";
        let dataset = load_investments(content, &ParseConfig::default()).unwrap();

        assert_eq!(dataset.rows[0].round, "");
        assert!(dataset.schema.missing_required().contains(&COLUMN_ROUND));
        assert!(dataset.schema.require(COLUMN_MARKET).is_err());
    }

    #[test]
    fn test_prior_run_flag_is_read() {
        let content =
            b"title\nCompany/Fund,Invested,Unrealized Value,Valuation Unknown\nAcme,100,0,True\nBeta,100,5,False\n";
        let dataset = load_investments(content, &ParseConfig::default()).unwrap();

        assert_eq!(dataset.rows[0].valuation_unknown, Some(true));
        assert_eq!(dataset.rows[1].valuation_unknown, Some(false));
    }
}

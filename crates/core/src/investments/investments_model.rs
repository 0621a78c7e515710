use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::csv_parser::ParseError;
use super::investments_constants::*;
use crate::constants::{STATUS_DEAD, STATUS_REALIZED};
use crate::errors::{Error, Result};
use crate::normalize::DateConvention;
use crate::portfolio::performance::XirrSettings;

/// One export row exactly as read, before any coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInvestment {
    pub company: String,
    pub status: String,
    pub lead: String,
    pub round: String,
    pub market: String,
    pub invest_date: String,
    pub invested: String,
    pub realized_value: String,
    pub unrealized_value: String,
    pub net_value: String,
    pub multiple: String,
    pub round_size: Option<String>,
    pub valuation_or_cap: Option<String>,
    pub realized_date: Option<String>,
    pub url: Option<String>,
    /// Flag carried over from a previous normalization pass
    pub valuation_unknown: Option<bool>,
}

/// Which columns the export actually carried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    pub columns: Vec<String>,
}

impl ColumnSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Schema of a complete export with every optional column present.
    pub fn full() -> Self {
        let columns = REQUIRED_COLUMNS
            .iter()
            .chain(
                [
                    COLUMN_ROUND_SIZE,
                    COLUMN_VALUATION_OR_CAP,
                    COLUMN_REALIZED_DATE,
                    COLUMN_URL,
                ]
                .iter(),
            )
            .map(|c| c.to_string())
            .collect();
        Self { columns }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fails with `SchemaMismatch` for features that depend on `column`.
    pub fn require(&self, column: &str) -> Result<()> {
        if self.contains(column) {
            Ok(())
        } else {
            Err(Error::SchemaMismatch(column.to_string()))
        }
    }

    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !self.contains(c))
            .collect()
    }

    pub fn has_realized_dates(&self) -> bool {
        self.contains(COLUMN_REALIZED_DATE)
    }
}

/// Rows as loaded from an export, plus what the loader noticed on the way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataset {
    pub schema: ColumnSchema,
    pub rows: Vec<RawInvestment>,
    /// Metadata lines above the header row
    pub preamble: Vec<String>,
    pub parse_errors: Vec<ParseError>,
}

/// Row-level data quality problems. Recorded, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "detail")]
pub enum DataIssue {
    /// Invested cell is blank; the row cannot carry a multiple or XIRR
    MissingInvested,
    /// Invested cell could not be read as a number
    UnparsableInvested(String),
    /// Invested is zero; multiple and XIRR are not computed
    ZeroInvested,
    /// No usable invest date; XIRR is 0.0
    MissingInvestDate,
    /// A date cell that could not be parsed
    UnparsableDate { column: String, value: String },
    /// The XIRR solver failed for this row; XIRR is NaN
    XirrNotConverged(String),
}

/// A normalized investment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    /// Position in the source export, used for stable ordering
    pub row_index: usize,
    pub company: String,
    pub status: String,
    pub lead: String,
    pub round: String,
    pub market: String,
    pub invest_date: Option<NaiveDate>,
    pub realized_date: Option<NaiveDate>,
    pub invested: f64,
    pub realized_value: f64,
    pub unrealized_value: f64,
    pub net_value: f64,
    /// Multiple as stated by the export
    pub reported_multiple: f64,
    /// (realized + unrealized) / invested; `None` when invested is zero
    pub real_multiple: Option<f64>,
    pub valuation_unknown: bool,
    /// Annualized return; NaN when the solver failed
    pub xirr: f64,
    pub round_size: Option<f64>,
    pub valuation_or_cap: Option<f64>,
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DataIssue>,
}

impl Investment {
    pub fn is_realized(&self) -> bool {
        self.status == STATUS_REALIZED
    }

    pub fn is_dead(&self) -> bool {
        self.status == STATUS_DEAD
    }

    /// Multiple used for ranking and classification; an uncomputable multiple ranks as 0.
    pub fn multiple_or_zero(&self) -> f64 {
        self.real_multiple.unwrap_or(0.0)
    }

    /// Realized plus unrealized value.
    pub fn total_value(&self) -> f64 {
        self.realized_value + self.unrealized_value
    }

    /// Value created over the amount invested.
    pub fn increase(&self) -> f64 {
        self.net_value - self.invested
    }

    /// Date the net value is assigned to for return calculations.
    pub fn exit_date(&self, as_of: NaiveDate) -> NaiveDate {
        self.realized_date.unwrap_or(as_of)
    }

    /// Label used in example lists, e.g. `Acme (2.50x)`.
    pub fn example_label(&self) -> String {
        format!("{} ({:.2}x)", self.company, self.multiple_or_zero())
    }
}

/// Scalar statistics gathered while normalizing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
    pub total_investments: usize,
    pub num_uniques: usize,
    pub num_leads: usize,
    /// Leads whose investments show no unrealized value at all
    pub num_zero_value_leads: usize,
    pub num_locked: usize,
    pub invested_locked: f64,
    pub has_realized_dates: bool,
}

/// The normalized table plus everything needed to recompute derived fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDataset {
    pub investments: Vec<Investment>,
    pub stats: DatasetStats,
    pub schema: ColumnSchema,
    pub as_of: NaiveDate,
    pub convention: DateConvention,
    pub xirr_settings: XirrSettings,
}

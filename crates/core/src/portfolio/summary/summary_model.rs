//! Category summary models.

use serde::{Deserialize, Serialize};

/// Summary bucket. Every non-Totals category is mutually exclusive; together
/// they cover every row exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SummaryCategory {
    Totals,
    RealizedAtOrAbove1x,
    RealizedBelow1x,
    Locked,
    MarkedUp,
    NotMarkedUp,
}

impl SummaryCategory {
    /// Display order of the summary table.
    pub const ALL: [SummaryCategory; 6] = [
        SummaryCategory::Totals,
        SummaryCategory::RealizedAtOrAbove1x,
        SummaryCategory::RealizedBelow1x,
        SummaryCategory::Locked,
        SummaryCategory::MarkedUp,
        SummaryCategory::NotMarkedUp,
    ];

    /// The five buckets that partition the rows.
    pub const PARTITION: [SummaryCategory; 5] = [
        SummaryCategory::RealizedAtOrAbove1x,
        SummaryCategory::RealizedBelow1x,
        SummaryCategory::Locked,
        SummaryCategory::MarkedUp,
        SummaryCategory::NotMarkedUp,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SummaryCategory::Totals => "Totals",
            SummaryCategory::RealizedAtOrAbove1x => "Realized >=1x",
            SummaryCategory::RealizedBelow1x => "Realized <1x",
            SummaryCategory::Locked => "Locked",
            SummaryCategory::MarkedUp => "Marked Up",
            SummaryCategory::NotMarkedUp => "Not Marked Up",
        }
    }
}

impl std::fmt::Display for SummaryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Aggregates for one summary bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: SummaryCategory,
    /// Number of rows in the bucket
    pub investments: usize,
    /// Distinct companies in the bucket
    pub companies: usize,
    /// Share of the Totals invested amount (0-1)
    pub percentage: f64,
    pub invested: f64,
    pub realized: f64,
    pub unrealized: f64,
    /// Realized plus unrealized
    pub value: f64,
    /// value / invested, 0 when nothing was invested
    pub multiple: f64,
    /// Top rows by multiple, rendered as `Name (X.XXx)` and comma separated
    pub examples: String,
}

impl CategorySummary {
    pub(crate) fn recompute_multiple(&mut self) {
        self.value = self.realized + self.unrealized;
        self.multiple = if self.invested != 0.0 {
            self.value / self.invested
        } else {
            0.0
        };
    }
}

/// The six-row summary table, Totals first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummaryTable {
    pub rows: Vec<CategorySummary>,
    /// Portfolio total supplied by the user to price locked positions
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub disclosed_total: Option<f64>,
}

impl CategorySummaryTable {
    pub fn get(&self, category: SummaryCategory) -> Option<&CategorySummary> {
        self.rows.iter().find(|row| row.category == category)
    }

    pub(crate) fn get_mut(&mut self, category: SummaryCategory) -> Option<&mut CategorySummary> {
        self.rows.iter_mut().find(|row| row.category == category)
    }

    pub fn totals(&self) -> Option<&CategorySummary> {
        self.get(SummaryCategory::Totals)
    }
}

/// Headline figures for the whole portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHeadline {
    pub investments: usize,
    pub companies: usize,
    pub leads: usize,
    pub leads_without_value: usize,
    pub invested: f64,
    /// Realized plus unrealized when nothing is locked. With locked rows it is
    /// the disclosed total, which stands for unrealized value only and so
    /// excludes anything already realized.
    pub total_value: f64,
    pub multiple: f64,
    /// Distributions to paid-in: realized / invested
    pub dpi: f64,
    pub mean_invested: f64,
    pub median_invested: f64,
    /// `None` when the cash flows cannot produce a rate
    pub xirr: Option<f64>,
}

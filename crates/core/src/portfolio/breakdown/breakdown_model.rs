//! Breakdown models: per-company, per-label, per-year and per-lead views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::investments::{Investment, COLUMN_MARKET, COLUMN_ROUND};

/// All investments in one company or fund rolled into a single position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRollup {
    pub company: String,
    pub investments: usize,
    pub invested: f64,
    pub realized: f64,
    pub unrealized: f64,
    pub net_value: f64,
    pub first_invest_date: Option<NaiveDate>,
    pub last_invest_date: Option<NaiveDate>,
    /// First URL seen for the company
    pub url: Option<String>,
    /// net value / invested; `None` when nothing was invested
    pub multiple: Option<f64>,
    /// XIRR over every investment in the company, 0.0 when it cannot be computed
    pub xirr: f64,
}

/// Column a label breakdown groups on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakdownDimension {
    Round,
    Market,
}

impl BreakdownDimension {
    pub fn column(&self) -> &'static str {
        match self {
            BreakdownDimension::Round => COLUMN_ROUND,
            BreakdownDimension::Market => COLUMN_MARKET,
        }
    }

    pub fn label_of<'a>(&self, investment: &'a Investment) -> &'a str {
        match self {
            BreakdownDimension::Round => &investment.round,
            BreakdownDimension::Market => &investment.market,
        }
    }
}

/// Invested capital and value creation for one round or market label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelBreakdown {
    pub label: String,
    pub investments: usize,
    pub invested: f64,
    /// Sum of net value minus invested
    pub increase: f64,
    /// Share of all invested capital (0-1)
    pub share_of_invested: f64,
    /// Share of the summed positive increases across labels; negative for labels that lost value
    pub share_of_increase: f64,
    /// Top rows by increase, rendered as `Name (X.XXx)`
    pub examples: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearBreakdown {
    pub year: i32,
    pub investments: usize,
    /// Distinct leads investing that year
    pub leads: usize,
    pub invested: f64,
    /// Sum of net value
    pub value: f64,
    pub average_invested: f64,
    pub min_invested: f64,
    pub max_invested: f64,
    pub multiple: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub lead: String,
    pub investments: usize,
    pub invested: f64,
    /// Realized plus unrealized value
    pub value: f64,
    pub average_invested: f64,
    pub multiple: f64,
    pub realized_count: usize,
    /// Realized investments as a share of all the lead's investments (0-1)
    pub realized_share: f64,
    /// Highest multiples for the lead
    pub best: String,
    /// Lowest realized multiples for the lead
    pub worst_realized: String,
}

/// A lead that has not disclosed the value of at least one investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndisclosedLead {
    pub lead: String,
    pub investments: usize,
    pub average_invested: f64,
    pub invested: f64,
    pub locked_count: usize,
    /// Locked investments as a share of the lead's investments (0-1)
    pub locked_share: f64,
}

/// An exited position, either returned capital or written off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizedExit {
    pub company: String,
    pub lead: String,
    pub status: String,
    pub invest_date: Option<NaiveDate>,
    pub realized_date: Option<NaiveDate>,
    pub invested: f64,
    pub realized_value: f64,
    /// Realized value minus invested
    pub profit: f64,
    /// Realized value / invested; `None` when nothing was invested
    pub realized_multiple: Option<f64>,
    pub xirr: f64,
}

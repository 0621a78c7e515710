use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A corrected value for the investment made in `company` on `invest_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueOverride {
    pub company: String,
    pub invest_date: NaiveDate,
    pub new_value: f64,
}

/// Before and after figures for one overridden row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideChange {
    pub row_index: usize,
    pub company: String,
    pub invest_date: NaiveDate,
    /// Net value before and after
    pub old_value: f64,
    pub new_value: f64,
    pub old_multiple: Option<f64>,
    pub new_multiple: Option<f64>,
    pub old_xirr: f64,
    pub new_xirr: f64,
    /// The row was locked before the override priced it
    pub was_locked: bool,
}

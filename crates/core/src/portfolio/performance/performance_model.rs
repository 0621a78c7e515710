use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{XIRR_INITIAL_GUESS, XIRR_MAX_ITERATIONS, XIRR_TOLERANCE};

/// A single dated cash flow from the investor's point of view.
/// Negative amounts are money invested, positive amounts money returned or value held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: f64,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }

    pub fn outflow(date: NaiveDate, amount: f64) -> Self {
        Self::new(date, -amount.abs())
    }

    pub fn inflow(date: NaiveDate, amount: f64) -> Self {
        Self::new(date, amount.abs())
    }
}

/// Iteration bound and tolerance for the XIRR root finder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XirrSettings {
    pub max_iterations: u32,
    /// Convergence threshold on |NPV|, relative to the largest absolute flow
    pub tolerance: f64,
    pub initial_guess: f64,
}

impl Default for XirrSettings {
    fn default() -> Self {
        Self {
            max_iterations: XIRR_MAX_ITERATIONS,
            tolerance: XIRR_TOLERANCE,
            initial_guess: XIRR_INITIAL_GUESS,
        }
    }
}

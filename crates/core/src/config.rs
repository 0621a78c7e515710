//! Engine configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_TOP_EXAMPLES, XIRR_INITIAL_GUESS, XIRR_MAX_ITERATIONS, XIRR_TOLERANCE,
};
use crate::errors::{Error, Result};
use crate::normalize::DateConvention;
use crate::portfolio::performance::XirrSettings;
use crate::utils::time_utils::valuation_date_today;

/// Configuration for normalizing and analysing a dataset.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Day/month ordering of date columns (default: US)
    pub date_convention: Option<DateConvention>,
    /// Terminal date for unrealized value (default: today)
    pub as_of_date: Option<NaiveDate>,
    /// Number of example rows per summary category (default: 5)
    pub top_examples: Option<usize>,
    /// XIRR iteration bound (default: 100)
    pub xirr_max_iterations: Option<u32>,
    /// XIRR relative NPV tolerance (default: 1e-6)
    pub xirr_tolerance: Option<f64>,
}

impl AnalysisConfig {
    /// Returns the effective date convention
    pub fn convention(&self) -> DateConvention {
        self.date_convention.unwrap_or_default()
    }

    /// Returns the as-of date, defaulting to today in the valuation timezone
    pub fn as_of(&self) -> NaiveDate {
        self.as_of_date.unwrap_or_else(valuation_date_today)
    }

    /// Returns the number of examples per category
    pub fn examples(&self) -> usize {
        self.top_examples.unwrap_or(DEFAULT_TOP_EXAMPLES)
    }

    /// Returns the solver settings with defaults filled in
    pub fn xirr_settings(&self) -> XirrSettings {
        XirrSettings {
            max_iterations: self.xirr_max_iterations.unwrap_or(XIRR_MAX_ITERATIONS),
            tolerance: self.xirr_tolerance.unwrap_or(XIRR_TOLERANCE),
            initial_guess: XIRR_INITIAL_GUESS,
        }
    }

    /// Rejects settings the solver cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.xirr_max_iterations == Some(0) {
            return Err(Error::InvalidConfigValue(
                "xirrMaxIterations must be at least 1".to_string(),
            ));
        }
        if let Some(tolerance) = self.xirr_tolerance {
            if !(tolerance.is_finite() && tolerance > 0.0) {
                return Err(Error::InvalidConfigValue(format!(
                    "xirrTolerance must be a positive number, got {}",
                    tolerance
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.convention(), DateConvention::Us);
        assert_eq!(config.examples(), 5);
        let settings = config.xirr_settings();
        assert_eq!(settings.max_iterations, 100);
        assert_eq!(settings.tolerance, 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{"dateConvention":"international","asOfDate":"2024-01-01","topExamples":3}"#,
        )
        .unwrap();
        assert_eq!(config.convention(), DateConvention::International);
        assert_eq!(config.as_of(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(config.examples(), 3);
    }

    #[test]
    fn test_validate_rejects_bad_solver_settings() {
        let config = AnalysisConfig {
            xirr_max_iterations: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            xirr_tolerance: Some(-1.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Core error types for Ventfolio.
//!
//! Row-level problems (an unparsable amount, a missing date, a solver that does
//! not converge) are recovered where they happen and recorded on the row. The
//! types here cover the failures that do reach the caller.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Calculation failed: {0}")]
    Calculation(#[from] CalculatorError),

    #[error("Column '{0}' is not present in this dataset")]
    SchemaMismatch(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Problems with the shape of the export itself.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required column '{0}' is missing from the header row")]
    MissingColumn(String),
}

/// Errors raised by the return calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    #[error("Investment has no invest date")]
    DateMissing,

    #[error("Invested amount is zero; multiple and XIRR are undefined")]
    ZeroInvested,

    #[error("XIRR did not converge after {iterations} iterations")]
    NoConvergence { iterations: u32 },

    #[error("Cash flows cannot produce an XIRR: {0}")]
    DegenerateCashFlows(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

//! Ventfolio Core - normalization and return calculations for venture portfolios.
//!
//! This crate turns a raw investment export (one row per investment) into a
//! typed dataset and derives per-row and portfolio-level metrics from it:
//! real multiples, XIRR, and the categorized summary table.

pub mod config;
pub mod constants;
pub mod errors;
pub mod investments;
pub mod normalize;
pub mod overrides;
pub mod portfolio;
pub mod utils;

// Re-export the main entry points
pub use config::AnalysisConfig;
pub use investments::*;
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

//! Investments module - export loading, raw and normalized row models.

mod csv_parser;
mod investments_constants;
mod investments_import;
mod investments_model;
mod investments_normalizer;


pub use csv_parser::{parse_csv, ParseConfig, ParseError, ParseErrorKind, ParsedCsvResult};
pub use investments_constants::*;
pub use investments_import::{load_investments, raw_dataset_from_csv};
pub use investments_model::{
    ColumnSchema, DataIssue, DatasetStats, Investment, NormalizedDataset, RawDataset,
    RawInvestment,
};
pub use investments_normalizer::{
    compute_stats, normalize_dataset, normalize_investment, refresh_xirr, RowContext,
};

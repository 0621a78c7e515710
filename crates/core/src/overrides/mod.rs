//! Value overrides - corrected valuations from a side table.

mod overrides_import;
mod overrides_model;
mod value_overrides;

#[cfg(test)]
mod value_overrides_tests;

pub use overrides_import::{load_value_overrides, COLUMN_MATCH_DATE, COLUMN_NEW_VALUE};
pub use overrides_model::*;
pub use value_overrides::apply_value_overrides;

//! Field-level normalizers for raw export values.

mod currency;
mod dates;

pub use currency::{
    amount_or_zero, parse_currency, parse_currency_decimal, AmountError, ReportedValue,
};
pub use dates::{parse_export_date, DateConvention};

//! Portfolio breakdown module - company, round, market, year and lead views.

mod breakdown_calculator;
mod breakdown_model;


pub use breakdown_calculator::*;
pub use breakdown_model::*;

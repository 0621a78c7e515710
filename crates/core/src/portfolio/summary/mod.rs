//! Category summary module - six-bucket summary table and portfolio headline.

mod summary_calculator;
mod summary_model;

#[cfg(test)]
mod summary_calculator_tests;

pub use summary_calculator::{
    classify, join_examples, portfolio_headline, portfolio_total_value, summarize_categories,
    top_examples_by_multiple,
};
pub use summary_model::*;

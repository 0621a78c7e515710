mod performance_model;
mod xirr_calculator;

pub use performance_model::*;
pub use xirr_calculator::{
    calculate_portfolio_xirr, calculate_row_xirr, portfolio_cash_flows, row_xirr_value,
    solve_xirr,
};

//! Money-weighted return (XIRR) for single investments and the whole portfolio.
//!
//! The solver runs Newton-Raphson from the configured guess and falls back to
//! bisection over an expanding bracket. Both phases are bounded by
//! `XirrSettings::max_iterations`, so a pathological stream ends in
//! `CalculatorError::NoConvergence` rather than looping.

use chrono::NaiveDate;
use log::{debug, warn};

use super::{CashFlow, XirrSettings};
use crate::errors::CalculatorError;
use crate::investments::Investment;
use crate::utils::time_utils::year_fraction;

/// Lowest rate the solver will evaluate; (1 + r) must stay positive.
const MIN_RATE: f64 = -0.999_999;

/// Bracket width below which bisection is considered converged.
const MIN_BRACKET_WIDTH: f64 = 1e-12;

/// Solves for the annual rate that zeroes the NPV of `flows`.
pub fn solve_xirr(flows: &[CashFlow], settings: &XirrSettings) -> Result<f64, CalculatorError> {
    if flows.len() < 2 {
        return Err(CalculatorError::DegenerateCashFlows(format!(
            "need at least two cash flows, got {}",
            flows.len()
        )));
    }
    let has_outflow = flows.iter().any(|cf| cf.amount < 0.0);
    let has_inflow = flows.iter().any(|cf| cf.amount > 0.0);
    if !has_outflow || !has_inflow {
        return Err(CalculatorError::DegenerateCashFlows(
            "cash flows must contain both an outflow and an inflow".to_string(),
        ));
    }

    let base_date = flows
        .iter()
        .map(|cf| cf.date)
        .min()
        .ok_or_else(|| CalculatorError::DegenerateCashFlows("no cash flows".to_string()))?;
    let scale = flows.iter().map(|cf| cf.amount.abs()).fold(0.0, f64::max);
    let tolerance = settings.tolerance * scale;

    if let Some(rate) = newton_raphson(flows, base_date, tolerance, settings) {
        return Ok(rate);
    }
    debug!("Newton-Raphson did not converge, falling back to bisection");
    bisection(flows, base_date, tolerance, settings).ok_or(CalculatorError::NoConvergence {
        iterations: settings.max_iterations,
    })
}

fn newton_raphson(
    flows: &[CashFlow],
    base_date: NaiveDate,
    tolerance: f64,
    settings: &XirrSettings,
) -> Option<f64> {
    let mut rate = settings.initial_guess.max(MIN_RATE);
    for _ in 0..settings.max_iterations {
        let (npv, derivative) = npv_and_derivative(flows, base_date, rate);
        if !npv.is_finite() {
            return None;
        }
        if npv.abs() <= tolerance {
            return Some(rate);
        }
        if derivative == 0.0 || !derivative.is_finite() {
            return None;
        }

        let mut next = rate - npv / derivative;
        if next <= MIN_RATE {
            // Step would leave the domain; move halfway toward the bound instead
            next = (rate + MIN_RATE) / 2.0;
        }
        if !next.is_finite() {
            return None;
        }
        rate = next;
    }
    None
}

fn bisection(
    flows: &[CashFlow],
    base_date: NaiveDate,
    tolerance: f64,
    settings: &XirrSettings,
) -> Option<f64> {
    let mut low = MIN_RATE;
    let mut high = 1.0;
    let npv_low = npv(flows, base_date, low);
    let mut npv_high = npv(flows, base_date, high);

    let mut expansions = 0;
    while npv_low.signum() == npv_high.signum() {
        if expansions >= settings.max_iterations || !npv_high.is_finite() {
            return None;
        }
        high *= 2.0;
        npv_high = npv(flows, base_date, high);
        expansions += 1;
    }

    for _ in 0..settings.max_iterations {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(flows, base_date, mid);
        if npv_mid.abs() <= tolerance || (high - low) < MIN_BRACKET_WIDTH {
            return Some(mid);
        }
        if npv_mid.signum() == npv_low.signum() {
            low = mid;
        } else {
            high = mid;
        }
    }
    None
}

fn npv(flows: &[CashFlow], base_date: NaiveDate, rate: f64) -> f64 {
    flows
        .iter()
        .map(|cf| cf.amount * (1.0 + rate).powf(-year_fraction(base_date, cf.date)))
        .sum()
}

fn npv_and_derivative(flows: &[CashFlow], base_date: NaiveDate, rate: f64) -> (f64, f64) {
    flows.iter().fold((0.0, 0.0), |(npv, derivative), cf| {
        let years = year_fraction(base_date, cf.date);
        let discount = (1.0 + rate).powf(-years);
        (
            npv + cf.amount * discount,
            derivative - years * cf.amount * discount / (1.0 + rate),
        )
    })
}

/// XIRR of one investment: invested at the invest date, net value at the
/// realized date if known, else at `as_of`.
///
/// A written-off position (net value <= 0) has a return of 0.0 rather than an
/// undefined rate.
pub fn calculate_row_xirr(
    investment: &Investment,
    as_of: NaiveDate,
    settings: &XirrSettings,
) -> Result<f64, CalculatorError> {
    let invest_date = investment.invest_date.ok_or(CalculatorError::DateMissing)?;
    if investment.invested <= 0.0 {
        return Err(CalculatorError::ZeroInvested);
    }
    if investment.net_value <= 0.0 {
        return Ok(0.0);
    }

    let flows = [
        CashFlow::outflow(invest_date, investment.invested),
        CashFlow::inflow(investment.exit_date(as_of), investment.net_value),
    ];
    solve_xirr(&flows, settings)
}

/// Collapses a row XIRR outcome into the stored value: rows that cannot have
/// a rate read 0.0, rows whose solve failed read NaN.
pub fn row_xirr_value(outcome: &Result<f64, CalculatorError>) -> f64 {
    match outcome {
        Ok(rate) => *rate,
        Err(CalculatorError::DateMissing) | Err(CalculatorError::ZeroInvested) => 0.0,
        Err(_) => f64::NAN,
    }
}

/// Builds the consolidated portfolio stream: one outflow per dated investment,
/// one inflow per realized exit (when realized dates are tracked), and the
/// terminal value at `as_of`.
pub fn portfolio_cash_flows(
    investments: &[Investment],
    include_realized: bool,
    terminal_value: f64,
    as_of: NaiveDate,
) -> Vec<CashFlow> {
    let mut flows: Vec<CashFlow> = Vec::with_capacity(investments.len() + 1);
    for investment in investments {
        if let Some(invest_date) = investment.invest_date {
            if investment.invested > 0.0 {
                flows.push(CashFlow::outflow(invest_date, investment.invested));
            }
        }
        if include_realized && investment.realized_value > 0.0 {
            if let Some(realized_date) = investment.realized_date {
                flows.push(CashFlow::inflow(realized_date, investment.realized_value));
            }
        }
    }
    if terminal_value > 0.0 {
        flows.push(CashFlow::inflow(as_of, terminal_value));
    }
    flows
}

/// Portfolio-level XIRR. Returns `None` when the stream is degenerate or the
/// solver fails; callers must treat that as "not computable", not zero.
pub fn calculate_portfolio_xirr(
    investments: &[Investment],
    include_realized: bool,
    terminal_value: f64,
    as_of: NaiveDate,
    settings: &XirrSettings,
) -> Option<f64> {
    let flows = portfolio_cash_flows(investments, include_realized, terminal_value, as_of);
    match solve_xirr(&flows, settings) {
        Ok(rate) => Some(rate),
        Err(e) => {
            warn!("Error calculating portfolio XIRR: {}", e);
            None
        }
    }
}

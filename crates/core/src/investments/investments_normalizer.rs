//! Dataset normalization: typed rows, locked-value handling, multiples and XIRR.
//!
//! Each row goes through the same ordered steps:
//! 1. amounts that are always numeric (realized, invested, multiple, round data)
//! 2. the valuation-unknown flag, honouring one left by an earlier pass
//! 3. locked rows forced to zero unrealized and net value
//! 4. unrealized and net value of the remaining rows
//! 5. real multiple, guarded against zero invested
//! 6. dates under the dataset's convention
//! 7. row XIRR against the realized date or the as-of date

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use log::{debug, warn};

use super::investments_constants::*;
use super::investments_model::{
    DataIssue, DatasetStats, Investment, NormalizedDataset, RawDataset, RawInvestment,
};
use crate::config::AnalysisConfig;
use crate::errors::{CalculatorError, Result};
use crate::normalize::{
    amount_or_zero, parse_currency, parse_export_date, AmountError, DateConvention,
    ReportedValue,
};
use crate::portfolio::performance::{calculate_row_xirr, row_xirr_value, XirrSettings};

/// Everything a single row needs from the dataset to normalize itself.
#[derive(Debug, Clone, Copy)]
pub struct RowContext {
    pub convention: DateConvention,
    pub as_of: NaiveDate,
    pub xirr_settings: XirrSettings,
}

impl RowContext {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            convention: config.convention(),
            as_of: config.as_of(),
            xirr_settings: config.xirr_settings(),
        }
    }
}

/// Normalizes every row of `raw` and gathers the dataset statistics.
pub fn normalize_dataset(raw: RawDataset, config: &AnalysisConfig) -> Result<NormalizedDataset> {
    config.validate()?;
    let context = RowContext::from_config(config);

    let investments: Vec<Investment> = raw
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| normalize_investment(index, row, &context))
        .collect();

    let stats = compute_stats(&investments, raw.schema.has_realized_dates());
    debug!(
        "Normalized {} investments ({} locked, {} companies)",
        stats.total_investments, stats.num_locked, stats.num_uniques
    );

    Ok(NormalizedDataset {
        investments,
        stats,
        schema: raw.schema,
        as_of: context.as_of,
        convention: context.convention,
        xirr_settings: context.xirr_settings,
    })
}

/// Normalizes one raw row. Pure: the result depends only on its arguments.
pub fn normalize_investment(index: usize, raw: &RawInvestment, context: &RowContext) -> Investment {
    let mut issues = Vec::new();

    // 1. Always-numeric amounts
    let realized_value = amount_or_zero(&raw.realized_value, COLUMN_REALIZED_VALUE);
    let stated_multiple = match ReportedValue::parse(&raw.multiple, COLUMN_MULTIPLE) {
        ReportedValue::Known(multiple) => multiple,
        ReportedValue::Locked => 0.0,
    };
    let invested = match parse_currency(&raw.invested) {
        Ok(value) => value,
        Err(AmountError::Empty) => {
            warn!("Row {} ({}): Invested is missing", index, raw.company);
            issues.push(DataIssue::MissingInvested);
            0.0
        }
        Err(AmountError::Unparsable(value)) => {
            warn!("Row {} ({}): Invested '{}' is not a number", index, raw.company, value);
            issues.push(DataIssue::UnparsableInvested(value));
            0.0
        }
    };
    let round_size = optional_amount(raw.round_size.as_deref(), COLUMN_ROUND_SIZE);
    let valuation_or_cap = optional_amount(raw.valuation_or_cap.as_deref(), COLUMN_VALUATION_OR_CAP);

    // 2-3. Locked values are recognised before any numeric coercion
    let unrealized = ReportedValue::parse(&raw.unrealized_value, COLUMN_UNREALIZED_VALUE);
    let valuation_unknown = raw.valuation_unknown.unwrap_or(false) || unrealized.is_locked();

    let reported_multiple = if valuation_unknown { 0.0 } else { stated_multiple };

    // 4. Remaining values
    let (unrealized_value, net_value) = if valuation_unknown {
        (0.0, 0.0)
    } else {
        let unrealized_value = unrealized.amount();
        let net_value = match parse_currency(&raw.net_value) {
            Ok(value) => value,
            Err(_) => realized_value + unrealized_value,
        };
        (unrealized_value, net_value)
    };

    // 5. Real multiple
    let real_multiple = if invested > 0.0 {
        Some((realized_value + unrealized_value) / invested)
    } else {
        if !issues.iter().any(|i| {
            matches!(i, DataIssue::MissingInvested | DataIssue::UnparsableInvested(_))
        }) {
            issues.push(DataIssue::ZeroInvested);
        }
        None
    };

    // 6. Dates
    let invest_date = parse_date_column(&raw.invest_date, COLUMN_INVEST_DATE, context, &mut issues);
    if invest_date.is_none() && raw.invest_date.trim().is_empty() {
        issues.push(DataIssue::MissingInvestDate);
    }
    let realized_date = raw
        .realized_date
        .as_deref()
        .and_then(|value| parse_date_column(value, COLUMN_REALIZED_DATE, context, &mut issues));

    let mut investment = Investment {
        row_index: index,
        company: raw.company.clone(),
        status: raw.status.clone(),
        lead: raw.lead.clone(),
        round: raw.round.clone(),
        market: raw.market.clone(),
        invest_date,
        realized_date,
        invested,
        realized_value,
        unrealized_value,
        net_value,
        reported_multiple,
        real_multiple,
        valuation_unknown,
        xirr: 0.0,
        round_size,
        valuation_or_cap,
        url: raw.url.clone(),
        issues,
    };

    // 7. Row XIRR
    refresh_xirr(&mut investment, context.as_of, &context.xirr_settings);
    investment
}

/// Recomputes the row XIRR in place, recording a failed solve as an issue.
pub fn refresh_xirr(investment: &mut Investment, as_of: NaiveDate, settings: &XirrSettings) {
    investment
        .issues
        .retain(|i| !matches!(i, DataIssue::XirrNotConverged(_)));

    let outcome = calculate_row_xirr(investment, as_of, settings);
    match &outcome {
        Err(CalculatorError::DateMissing) | Err(CalculatorError::ZeroInvested) | Ok(_) => {}
        Err(e) => {
            warn!(
                "Error calculating XIRR for row {} ({}): {}",
                investment.row_index, investment.company, e
            );
            investment.issues.push(DataIssue::XirrNotConverged(e.to_string()));
        }
    }
    investment.xirr = row_xirr_value(&outcome);
}

/// Recounts the dataset statistics from normalized rows.
pub fn compute_stats(investments: &[Investment], has_realized_dates: bool) -> DatasetStats {
    let num_uniques = investments
        .iter()
        .map(|i| i.company.as_str())
        .filter(|c| !c.is_empty())
        .collect::<HashSet<_>>()
        .len();

    let mut unrealized_by_lead: HashMap<&str, f64> = HashMap::new();
    for investment in investments.iter().filter(|i| !i.lead.is_empty()) {
        *unrealized_by_lead.entry(investment.lead.as_str()).or_insert(0.0) +=
            investment.unrealized_value;
    }
    let num_zero_value_leads = unrealized_by_lead.values().filter(|v| **v == 0.0).count();

    let locked: Vec<&Investment> = investments.iter().filter(|i| i.valuation_unknown).collect();

    DatasetStats {
        total_investments: investments.len(),
        num_uniques,
        num_leads: unrealized_by_lead.len(),
        num_zero_value_leads,
        num_locked: locked.len(),
        invested_locked: locked.iter().map(|i| i.invested).sum(),
        has_realized_dates,
    }
}

fn optional_amount(raw: Option<&str>, field_name: &str) -> Option<f64> {
    raw.and_then(|value| match parse_currency(value) {
        Ok(amount) => Some(amount),
        Err(AmountError::Empty) => None,
        Err(e) => {
            warn!("Failed to parse {} '{}': {}", field_name, value, e);
            None
        }
    })
}

fn parse_date_column(
    value: &str,
    column: &str,
    context: &RowContext,
    issues: &mut Vec<DataIssue>,
) -> Option<NaiveDate> {
    let parsed = parse_export_date(value, context.convention);
    if parsed.is_none() && !value.trim().is_empty() {
        issues.push(DataIssue::UnparsableDate {
            column: column.to_string(),
            value: value.to_string(),
        });
    }
    parsed
}

//! Grouped views over a normalized dataset.
//!
//! Views that group on an optional export column fail with
//! `Error::SchemaMismatch` when the column was not in the export. Rows with a
//! blank grouping label are left out of that view.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::{Datelike, NaiveDate};
use log::warn;

use super::{
    BreakdownDimension, CompanyRollup, LabelBreakdown, LeadStats, RealizedExit, UndisclosedLead,
    YearBreakdown,
};
use crate::constants::{DEFAULT_TOP_EXAMPLES, LEAD_TOP_EXAMPLES, ROUND_ORDER};
use crate::errors::Result;
use crate::investments::{
    Investment, NormalizedDataset, COLUMN_COMPANY, COLUMN_INVEST_DATE, COLUMN_LEAD, COLUMN_STATUS,
};
use crate::portfolio::performance::{solve_xirr, CashFlow, XirrSettings};
use crate::portfolio::summary::{join_examples, top_examples_by_multiple};

/// Groups rows by a key, keeping groups in first-seen order.
fn group_by<'a, K, F>(investments: &'a [Investment], key: F) -> Vec<(K, Vec<&'a Investment>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&Investment) -> Option<K>,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&Investment>)> = Vec::new();
    for investment in investments {
        let Some(label) = key(investment) else {
            continue;
        };
        match positions.get(&label) {
            Some(&idx) => groups[idx].1.push(investment),
            None => {
                positions.insert(label.clone(), groups.len());
                groups.push((label, vec![investment]));
            }
        }
    }
    groups
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn descending_multiple(a: Option<f64>, b: Option<f64>) -> Ordering {
    b.unwrap_or(f64::NEG_INFINITY)
        .total_cmp(&a.unwrap_or(f64::NEG_INFINITY))
}

// ============================================================================
// Companies
// ============================================================================

/// Rolls every company's investments into one position, best multiple first.
pub fn company_rollups(dataset: &NormalizedDataset) -> Result<Vec<CompanyRollup>> {
    dataset.schema.require(COLUMN_COMPANY)?;

    let mut rollups: Vec<CompanyRollup> =
        group_by(&dataset.investments, |i| non_empty(&i.company))
            .into_iter()
            .map(|(company, rows)| {
                let invested: f64 = rows.iter().map(|i| i.invested).sum();
                let net_value: f64 = rows.iter().map(|i| i.net_value).sum();
                let xirr = company_xirr(
                    &rows,
                    dataset.stats.has_realized_dates,
                    dataset.as_of,
                    &dataset.xirr_settings,
                );
                CompanyRollup {
                    investments: rows.len(),
                    invested,
                    realized: rows.iter().map(|i| i.realized_value).sum(),
                    unrealized: rows.iter().map(|i| i.unrealized_value).sum(),
                    net_value,
                    first_invest_date: rows.iter().filter_map(|i| i.invest_date).min(),
                    last_invest_date: rows.iter().filter_map(|i| i.invest_date).max(),
                    url: rows.iter().find_map(|i| i.url.clone()),
                    multiple: (invested > 0.0).then(|| net_value / invested),
                    xirr,
                    company,
                }
            })
            .collect();

    rollups.sort_by(|a, b| descending_multiple(a.multiple, b.multiple));
    Ok(rollups)
}

/// XIRR of a company position: every investment is an outflow and the summed
/// net value flows back at the latest realized date, or at `as_of`.
///
/// A company whose first investment carries no value is treated as a 0.0
/// return, as is a stream the solver cannot resolve.
fn company_xirr(
    rows: &[&Investment],
    include_realized: bool,
    as_of: NaiveDate,
    settings: &XirrSettings,
) -> f64 {
    match rows.first() {
        Some(first) if first.net_value > 0.0 => {}
        _ => return 0.0,
    }

    let mut flows: Vec<CashFlow> = rows
        .iter()
        .filter(|i| i.invested > 0.0)
        .filter_map(|i| i.invest_date.map(|date| CashFlow::outflow(date, i.invested)))
        .collect();
    let exit_date = include_realized
        .then(|| rows.iter().filter_map(|i| i.realized_date).max())
        .flatten()
        .unwrap_or(as_of);
    flows.push(CashFlow::inflow(
        exit_date,
        rows.iter().map(|i| i.net_value).sum(),
    ));

    solve_xirr(&flows, settings).unwrap_or_else(|e| {
        warn!("Error calculating XIRR for company {}: {}", rows[0].company, e);
        0.0
    })
}

// ============================================================================
// Rounds and markets
// ============================================================================

/// Invested capital and value creation per funding round, in canonical round order.
pub fn round_breakdown(dataset: &NormalizedDataset) -> Result<Vec<LabelBreakdown>> {
    label_breakdown(dataset, BreakdownDimension::Round)
}

/// Invested capital and value creation per market, largest allocation first.
pub fn market_breakdown(dataset: &NormalizedDataset) -> Result<Vec<LabelBreakdown>> {
    label_breakdown(dataset, BreakdownDimension::Market)
}

pub fn label_breakdown(
    dataset: &NormalizedDataset,
    dimension: BreakdownDimension,
) -> Result<Vec<LabelBreakdown>> {
    dataset.schema.require(dimension.column())?;

    let groups = group_by(&dataset.investments, |i| non_empty(dimension.label_of(i)));
    let total_invested: f64 = groups
        .iter()
        .flat_map(|(_, rows)| rows.iter())
        .map(|i| i.invested)
        .sum();
    let increases: Vec<f64> = groups
        .iter()
        .map(|(_, rows)| rows.iter().map(|i| i.increase()).sum())
        .collect();
    let positive_increase: f64 = increases.iter().filter(|v| **v > 0.0).sum();

    let mut breakdown: Vec<LabelBreakdown> = groups
        .into_iter()
        .zip(increases)
        .map(|((label, rows), increase)| {
            let invested: f64 = rows.iter().map(|i| i.invested).sum();
            LabelBreakdown {
                investments: rows.len(),
                invested,
                increase,
                share_of_invested: ratio(invested, total_invested),
                share_of_increase: ratio(increase, positive_increase),
                examples: top_examples_by_increase(&rows, DEFAULT_TOP_EXAMPLES),
                label,
            }
        })
        .collect();

    match dimension {
        BreakdownDimension::Round => breakdown.sort_by(|a, b| {
            round_rank(&a.label)
                .cmp(&round_rank(&b.label))
                .then_with(|| a.label.cmp(&b.label))
        }),
        BreakdownDimension::Market => {
            breakdown.sort_by(|a, b| b.invested.total_cmp(&a.invested))
        }
    }
    Ok(breakdown)
}

/// Position in the canonical round order; unknown rounds sort after all known ones.
fn round_rank(label: &str) -> usize {
    ROUND_ORDER
        .iter()
        .position(|round| *round == label)
        .unwrap_or(ROUND_ORDER.len())
}

fn top_examples_by_increase(rows: &[&Investment], n: usize) -> String {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| b.increase().total_cmp(&a.increase()));
    join_examples(ranked.into_iter().take(n))
}

// ============================================================================
// Years
// ============================================================================

/// Activity per invest year, oldest first. Rows without an invest date are skipped.
pub fn year_breakdown(dataset: &NormalizedDataset) -> Result<Vec<YearBreakdown>> {
    dataset.schema.require(COLUMN_INVEST_DATE)?;

    let mut by_year = group_by(&dataset.investments, |i| i.invest_date.map(|d| d.year()));
    by_year.sort_by_key(|(year, _)| *year);

    Ok(by_year
        .into_iter()
        .map(|(year, rows)| {
            let invested: f64 = rows.iter().map(|i| i.invested).sum();
            let value: f64 = rows.iter().map(|i| i.net_value).sum();
            YearBreakdown {
                year,
                investments: rows.len(),
                leads: rows
                    .iter()
                    .map(|i| i.lead.as_str())
                    .filter(|l| !l.is_empty())
                    .collect::<HashSet<_>>()
                    .len(),
                invested,
                value,
                average_invested: ratio(invested, rows.len() as f64),
                min_invested: rows.iter().map(|i| i.invested).fold(f64::INFINITY, f64::min),
                max_invested: rows.iter().map(|i| i.invested).fold(0.0, f64::max),
                multiple: ratio(value, invested),
            }
        })
        .collect())
}

// ============================================================================
// Leads
// ============================================================================

/// Per-lead performance, best multiple first.
pub fn lead_stats(dataset: &NormalizedDataset) -> Result<Vec<LeadStats>> {
    dataset.schema.require(COLUMN_LEAD)?;

    let mut stats: Vec<LeadStats> = group_by(&dataset.investments, |i| non_empty(&i.lead))
        .into_iter()
        .map(|(lead, rows)| {
            let invested: f64 = rows.iter().map(|i| i.invested).sum();
            let value: f64 = rows.iter().map(|i| i.total_value()).sum();
            let mut realized: Vec<&Investment> =
                rows.iter().copied().filter(|i| i.is_realized()).collect();
            realized.sort_by(|a, b| a.multiple_or_zero().total_cmp(&b.multiple_or_zero()));

            LeadStats {
                investments: rows.len(),
                invested,
                value,
                average_invested: ratio(invested, rows.len() as f64),
                multiple: ratio(value, invested),
                realized_count: realized.len(),
                realized_share: ratio(realized.len() as f64, rows.len() as f64),
                best: top_examples_by_multiple(&rows, LEAD_TOP_EXAMPLES),
                worst_realized: join_examples(realized.into_iter().take(LEAD_TOP_EXAMPLES)),
                lead,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.multiple.total_cmp(&a.multiple));
    Ok(stats)
}

/// Leads with at least one locked investment, most locked first.
pub fn undisclosed_leads(dataset: &NormalizedDataset) -> Result<Vec<UndisclosedLead>> {
    dataset.schema.require(COLUMN_LEAD)?;

    let mut leads: Vec<UndisclosedLead> = group_by(&dataset.investments, |i| non_empty(&i.lead))
        .into_iter()
        .filter_map(|(lead, rows)| {
            let locked_count = rows.iter().filter(|i| i.valuation_unknown).count();
            if locked_count == 0 {
                return None;
            }
            let invested: f64 = rows.iter().map(|i| i.invested).sum();
            Some(UndisclosedLead {
                investments: rows.len(),
                average_invested: ratio(invested, rows.len() as f64),
                invested,
                locked_count,
                locked_share: ratio(locked_count as f64, rows.len() as f64),
                lead,
            })
        })
        .collect();

    leads.sort_by(|a, b| {
        b.locked_count
            .cmp(&a.locked_count)
            .then_with(|| b.locked_share.total_cmp(&a.locked_share))
    });
    Ok(leads)
}

// ============================================================================
// Exits
// ============================================================================

/// Realized and written-off positions, best realized multiple first.
pub fn realized_exits(dataset: &NormalizedDataset) -> Result<Vec<RealizedExit>> {
    dataset.schema.require(COLUMN_STATUS)?;

    let mut exits: Vec<RealizedExit> = dataset
        .investments
        .iter()
        .filter(|i| i.is_realized() || i.is_dead())
        .map(|i| RealizedExit {
            company: i.company.clone(),
            lead: i.lead.clone(),
            status: i.status.clone(),
            invest_date: i.invest_date,
            realized_date: i.realized_date,
            invested: i.invested,
            realized_value: i.realized_value,
            profit: i.realized_value - i.invested,
            realized_multiple: (i.invested > 0.0).then(|| i.realized_value / i.invested),
            xirr: i.xirr,
        })
        .collect();

    exits.sort_by(|a, b| descending_multiple(a.realized_multiple, b.realized_multiple));
    Ok(exits)
}

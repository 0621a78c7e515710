//! Category summary: classification, per-bucket aggregates and headline figures.

use std::collections::HashSet;

use log::debug;

use super::{CategorySummary, CategorySummaryTable, PortfolioHeadline, SummaryCategory};
use crate::constants::EXAMPLES_SEPARATOR;
use crate::investments::{Investment, NormalizedDataset};
use crate::portfolio::performance::calculate_portfolio_xirr;

/// Assigns a row to exactly one non-Totals bucket.
///
/// Realized status wins over everything else, then the locked flag. A row
/// whose multiple cannot be computed classifies as a 0x multiple.
pub fn classify(investment: &Investment) -> SummaryCategory {
    let multiple = investment.multiple_or_zero();
    if investment.is_realized() {
        if multiple >= 1.0 {
            SummaryCategory::RealizedAtOrAbove1x
        } else {
            SummaryCategory::RealizedBelow1x
        }
    } else if investment.valuation_unknown {
        SummaryCategory::Locked
    } else if multiple > 1.0 {
        SummaryCategory::MarkedUp
    } else {
        SummaryCategory::NotMarkedUp
    }
}

/// Builds the six-row summary table, Totals first.
pub fn summarize_categories(investments: &[Investment], top_n: usize) -> CategorySummaryTable {
    let all: Vec<&Investment> = investments.iter().collect();
    let totals = summarize_rows(SummaryCategory::Totals, &all, None, top_n);
    let total_invested = totals.invested;

    let mut rows = Vec::with_capacity(SummaryCategory::ALL.len());
    rows.push(totals);
    for category in SummaryCategory::PARTITION {
        let members: Vec<&Investment> = investments
            .iter()
            .filter(|i| classify(i) == category)
            .collect();
        rows.push(summarize_rows(category, &members, Some(total_invested), top_n));
    }

    CategorySummaryTable {
        rows,
        disclosed_total: None,
    }
}

fn summarize_rows(
    category: SummaryCategory,
    rows: &[&Investment],
    total_invested: Option<f64>,
    top_n: usize,
) -> CategorySummary {
    let invested: f64 = rows.iter().map(|i| i.invested).sum();
    let realized: f64 = rows.iter().map(|i| i.realized_value).sum();
    let unrealized: f64 = rows.iter().map(|i| i.unrealized_value).sum();
    let denominator = total_invested.unwrap_or(invested);

    let mut summary = CategorySummary {
        category,
        investments: rows.len(),
        companies: distinct_companies(rows),
        percentage: if denominator != 0.0 {
            invested / denominator
        } else {
            0.0
        },
        invested,
        realized,
        unrealized,
        value: 0.0,
        multiple: 0.0,
        examples: top_examples_by_multiple(rows, top_n),
    };
    summary.recompute_multiple();
    summary
}

fn distinct_companies(rows: &[&Investment]) -> usize {
    rows.iter()
        .map(|i| i.company.as_str())
        .filter(|c| !c.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// Renders the `n` highest multiples as `Name (X.XXx), ...`. Ties keep row order.
pub fn top_examples_by_multiple(rows: &[&Investment], n: usize) -> String {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| b.multiple_or_zero().total_cmp(&a.multiple_or_zero()));
    join_examples(ranked.into_iter().take(n))
}

/// Joins example labels with the standard separator.
pub fn join_examples<'a>(rows: impl Iterator<Item = &'a Investment>) -> String {
    rows.map(Investment::example_label)
        .collect::<Vec<_>>()
        .join(EXAMPLES_SEPARATOR)
}

impl CategorySummaryTable {
    /// Prices the locked positions from a user-supplied portfolio total.
    ///
    /// The gap between `total_value` and the disclosed unrealized value is
    /// attributed to both Locked and Totals. Re-applying the same total is a
    /// no-op. Without locked rows, or with a non-positive total, the table is
    /// returned unchanged.
    pub fn with_disclosed_total(mut self, total_value: f64) -> Self {
        let has_locked = self
            .get(SummaryCategory::Locked)
            .is_some_and(|row| row.investments > 0);
        if !has_locked || total_value.is_nan() || total_value <= 0.0 {
            debug!("Ignoring disclosed total {}: nothing to price", total_value);
            return self;
        }

        let disclosed_unrealized = self.totals().map(|t| t.unrealized).unwrap_or(0.0);
        let locked_value = total_value - disclosed_unrealized;
        for category in [SummaryCategory::Locked, SummaryCategory::Totals] {
            if let Some(row) = self.get_mut(category) {
                row.unrealized += locked_value;
                row.recompute_multiple();
            }
        }
        self.disclosed_total = Some(total_value);
        self
    }
}

/// Effective portfolio value: realized plus unrealized when nothing is locked,
/// otherwise the disclosed total if one was supplied. The disclosed total is
/// an unrealized figure, so the two cases are not directly comparable.
pub fn portfolio_total_value(table: &CategorySummaryTable, num_locked: usize) -> Option<f64> {
    if num_locked == 0 {
        table.totals().map(|t| t.realized + t.unrealized)
    } else {
        table.disclosed_total
    }
}

/// Headline figures. Portfolio XIRR is only attempted once the total value is
/// known, with the Totals unrealized value as the terminal inflow.
pub fn portfolio_headline(
    dataset: &NormalizedDataset,
    table: &CategorySummaryTable,
) -> PortfolioHeadline {
    let stats = &dataset.stats;
    let (invested, realized, unrealized, multiple) = table
        .totals()
        .map(|t| (t.invested, t.realized, t.unrealized, t.multiple))
        .unwrap_or_default();
    let total_value = portfolio_total_value(table, stats.num_locked);

    let xirr = total_value.and_then(|_| {
        calculate_portfolio_xirr(
            &dataset.investments,
            stats.has_realized_dates,
            unrealized,
            dataset.as_of,
            &dataset.xirr_settings,
        )
    });

    let mut amounts: Vec<f64> = dataset.investments.iter().map(|i| i.invested).collect();
    amounts.sort_by(f64::total_cmp);

    PortfolioHeadline {
        investments: stats.total_investments,
        companies: stats.num_uniques,
        leads: stats.num_leads,
        leads_without_value: stats.num_zero_value_leads,
        invested,
        total_value: total_value.unwrap_or(realized + unrealized),
        multiple,
        dpi: if invested != 0.0 { realized / invested } else { 0.0 },
        mean_invested: mean(&amounts),
        median_invested: median(&amounts),
        xirr,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Median of an already sorted slice.
fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

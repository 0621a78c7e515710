//! Patches normalized rows with corrected values and recomputes what depends on them.

use log::{debug, info};

use super::{OverrideChange, ValueOverride};
use crate::investments::{compute_stats, refresh_xirr, NormalizedDataset};

/// Applies `overrides` to every row matching on company and invest date.
///
/// A matched row takes the new value as its unrealized value, with net value
/// kept at realized plus unrealized. It stops being locked, and its multiple,
/// XIRR and the dataset stats are recomputed.
/// Overrides that match nothing are ignored.
pub fn apply_value_overrides(
    mut dataset: NormalizedDataset,
    overrides: &[ValueOverride],
) -> (NormalizedDataset, Vec<OverrideChange>) {
    let as_of = dataset.as_of;
    let settings = dataset.xirr_settings;
    let mut changes = Vec::new();

    for value_override in overrides {
        let mut matched = false;
        for investment in dataset.investments.iter_mut().filter(|i| {
            i.company == value_override.company
                && i.invest_date == Some(value_override.invest_date)
        }) {
            matched = true;
            let old_value = investment.net_value;
            let old_multiple = investment.real_multiple;
            let old_xirr = investment.xirr;
            let was_locked = investment.valuation_unknown;

            investment.unrealized_value = value_override.new_value;
            investment.net_value = investment.realized_value + value_override.new_value;
            investment.valuation_unknown = false;
            investment.real_multiple = (investment.invested > 0.0)
                .then(|| investment.total_value() / investment.invested);
            refresh_xirr(investment, as_of, &settings);

            changes.push(OverrideChange {
                row_index: investment.row_index,
                company: investment.company.clone(),
                invest_date: value_override.invest_date,
                old_value,
                new_value: investment.net_value,
                old_multiple,
                new_multiple: investment.real_multiple,
                old_xirr,
                new_xirr: investment.xirr,
                was_locked,
            });
        }
        if !matched {
            debug!(
                "Override for {} on {} matched no investment",
                value_override.company, value_override.invest_date
            );
        }
    }

    if !changes.is_empty() {
        dataset.stats = compute_stats(&dataset.investments, dataset.stats.has_realized_dates);
        info!("Applied {} value overrides", changes.len());
    }
    (dataset, changes)
}

//! Property-based integration tests for normalization and the category summary.
//!
//! These tests verify that the dataset invariants hold across randomly
//! generated export rows, using the `proptest` crate.

use chrono::NaiveDate;
use proptest::prelude::*;
use ventfolio_core::normalize::{parse_currency, DateConvention};
use ventfolio_core::{
    normalize_investment, summarize_categories, Investment, RawInvestment, RowContext,
    SummaryCategory, XirrSettings,
};

// =============================================================================
// Generators
// =============================================================================

/// Renders cents as an export amount, e.g. `$12,345.67`.
fn format_dollars(cents: u64) -> String {
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("${}.{:02}", grouped, cents % 100)
}

fn arb_amount() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u64..1_000_000_000).prop_map(format_dollars),
        (0u64..1_000_000).prop_map(|v| v.to_string()),
        Just(String::new()),
        Just("n/a".to_string()),
    ]
}

fn arb_unrealized() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_amount(),
        1 => Just("Locked".to_string()),
    ]
}

fn arb_date() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..=12, 1u32..=28, 15u32..=24).prop_map(|(m, d, y)| format!("{:02}/{:02}/{}", m, d, y)),
        Just(String::new()),
        Just("someday".to_string()),
    ]
}

fn arb_raw_investment() -> impl Strategy<Value = RawInvestment> {
    (
        "[A-E][a-z]{2,6}",
        prop_oneof![Just("Active"), Just("Realized"), Just("Dead")],
        arb_amount(),      // invested
        arb_amount(),      // realized
        arb_unrealized(),  // unrealized
        arb_date(),        // invest date
        proptest::option::of(any::<bool>()),
    )
        .prop_map(
            |(company, status, invested, realized, unrealized, date, prior_flag)| RawInvestment {
                company,
                status: status.to_string(),
                lead: "Lead".to_string(),
                round: "Seed".to_string(),
                market: "Fintech".to_string(),
                invest_date: date,
                invested,
                realized_value: realized,
                net_value: unrealized.clone(),
                multiple: unrealized.clone(),
                unrealized_value: unrealized,
                valuation_unknown: prior_flag,
                ..Default::default()
            },
        )
}

fn context() -> RowContext {
    RowContext {
        convention: DateConvention::Us,
        as_of: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        xirr_settings: XirrSettings::default(),
    }
}

fn normalize_all(rows: &[RawInvestment]) -> Vec<Investment> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| normalize_investment(i, row, &context()))
        .collect()
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Normalized amounts are never negative.
    #[test]
    fn prop_amounts_are_non_negative(row in arb_raw_investment()) {
        let investment = normalize_investment(0, &row, &context());
        prop_assert!(investment.invested >= 0.0);
        prop_assert!(investment.realized_value >= 0.0);
        prop_assert!(investment.unrealized_value >= 0.0);
    }

    /// A locked row carries no unrealized or net value.
    #[test]
    fn prop_locked_rows_are_zeroed(row in arb_raw_investment()) {
        let investment = normalize_investment(0, &row, &context());
        if investment.valuation_unknown {
            prop_assert_eq!(investment.unrealized_value, 0.0);
            prop_assert_eq!(investment.net_value, 0.0);
            prop_assert_eq!(investment.reported_multiple, 0.0);
        }
        if row.unrealized_value == "Locked" || row.valuation_unknown == Some(true) {
            prop_assert!(investment.valuation_unknown);
        }
    }

    /// The real multiple is (realized + unrealized) / invested, and absent
    /// only when nothing was invested.
    #[test]
    fn prop_multiple_law(row in arb_raw_investment()) {
        let investment = normalize_investment(0, &row, &context());
        match investment.real_multiple {
            Some(multiple) => {
                prop_assert!(investment.invested > 0.0);
                let expected = investment.total_value() / investment.invested;
                prop_assert!((multiple - expected).abs() <= 1e-12 * expected.abs().max(1.0));
            }
            None => prop_assert_eq!(investment.invested, 0.0),
        }
    }

    /// Normalizing the same row twice yields bit-identical XIRR values.
    #[test]
    fn prop_xirr_is_deterministic(row in arb_raw_investment()) {
        let first = normalize_investment(0, &row, &context());
        let second = normalize_investment(0, &row, &context());
        prop_assert_eq!(first.xirr.to_bits(), second.xirr.to_bits());
    }

    /// The five buckets partition the rows: counts and sums add up to Totals.
    #[test]
    fn prop_partition_law(rows in proptest::collection::vec(arb_raw_investment(), 0..40)) {
        let investments = normalize_all(&rows);
        let table = summarize_categories(&investments, 5);
        let totals = table.get(SummaryCategory::Totals).unwrap();

        let parts: Vec<_> = SummaryCategory::PARTITION
            .iter()
            .filter_map(|c| table.get(*c))
            .collect();
        prop_assert_eq!(parts.len(), 5);
        prop_assert_eq!(parts.iter().map(|p| p.investments).sum::<usize>(), totals.investments);

        let tolerance = 1e-6 * totals.invested.max(totals.realized + totals.unrealized).max(1.0);
        prop_assert!((parts.iter().map(|p| p.invested).sum::<f64>() - totals.invested).abs() <= tolerance);
        prop_assert!((parts.iter().map(|p| p.realized).sum::<f64>() - totals.realized).abs() <= tolerance);
        prop_assert!((parts.iter().map(|p| p.unrealized).sum::<f64>() - totals.unrealized).abs() <= tolerance);
    }

    /// Already-clean float strings parse to the value they spell.
    #[test]
    fn prop_currency_fixed_point(cents in 0u64..100_000_000_000) {
        let clean = format!("{}.{:02}", cents / 100, cents % 100);
        prop_assert_eq!(parse_currency(&clean).unwrap(), cents as f64 / 100.0);
        prop_assert_eq!(parse_currency(&format_dollars(cents)).unwrap(), cents as f64 / 100.0);
    }
}

use chrono::NaiveDate;

use super::*;
use crate::investments::{ColumnSchema, DatasetStats, Investment, NormalizedDataset};
use crate::normalize::DateConvention;
use crate::portfolio::performance::XirrSettings;

fn row(index: usize, company: &str, status: &str, invested: f64, realized: f64, unrealized: f64) -> Investment {
    Investment {
        row_index: index,
        company: company.to_string(),
        status: status.to_string(),
        lead: "Lead".to_string(),
        round: "Seed".to_string(),
        market: "Fintech".to_string(),
        invest_date: NaiveDate::from_ymd_opt(2020, 1, 1),
        realized_date: None,
        invested,
        realized_value: realized,
        unrealized_value: unrealized,
        net_value: realized + unrealized,
        reported_multiple: 0.0,
        real_multiple: if invested > 0.0 {
            Some((realized + unrealized) / invested)
        } else {
            None
        },
        valuation_unknown: false,
        xirr: 0.0,
        round_size: None,
        valuation_or_cap: None,
        url: None,
        issues: Vec::new(),
    }
}

fn locked(index: usize, company: &str, invested: f64) -> Investment {
    let mut investment = row(index, company, "Active", invested, 0.0, 0.0);
    investment.valuation_unknown = true;
    investment
}

fn sample() -> Vec<Investment> {
    vec![
        row(0, "Acme", "Active", 1000.0, 0.0, 3000.0),
        locked(1, "Beta", 500.0),
        row(2, "Gamma", "Realized", 200.0, 400.0, 0.0),
        row(3, "Delta", "Realized", 300.0, 100.0, 0.0),
        row(4, "Epsilon", "Active", 400.0, 0.0, 400.0),
        row(5, "Acme", "Active", 600.0, 0.0, 300.0),
    ]
}

#[test]
fn test_classify_priorities() {
    assert_eq!(classify(&locked(0, "Beta", 100.0)), SummaryCategory::Locked);
    assert_eq!(
        classify(&row(0, "Acme", "Active", 1000.0, 0.0, 3000.0)),
        SummaryCategory::MarkedUp
    );
    // Exactly 1.0x is not a markup, but a realized 1.0x is a >=1x exit
    assert_eq!(
        classify(&row(0, "Acme", "Active", 100.0, 0.0, 100.0)),
        SummaryCategory::NotMarkedUp
    );
    assert_eq!(
        classify(&row(0, "Acme", "Realized", 100.0, 100.0, 0.0)),
        SummaryCategory::RealizedAtOrAbove1x
    );
    // Realized status wins over the locked flag
    let mut realized_locked = locked(0, "Beta", 100.0);
    realized_locked.status = "Realized".to_string();
    assert_eq!(classify(&realized_locked), SummaryCategory::RealizedBelow1x);
    // No computable multiple reads as 0x
    assert_eq!(
        classify(&row(0, "Zero", "Active", 0.0, 0.0, 50.0)),
        SummaryCategory::NotMarkedUp
    );
}

#[test]
fn test_locked_row_lands_in_locked_bucket() {
    let table = summarize_categories(&[locked(0, "Beta", 100.0)], 5);

    let locked = table.get(SummaryCategory::Locked).unwrap();
    assert_eq!(locked.investments, 1);
    assert_eq!(locked.invested, 100.0);
    assert_eq!(locked.unrealized, 0.0);
    assert_eq!(locked.percentage, 1.0);
}

#[test]
fn test_marked_up_row() {
    let table = summarize_categories(&[row(0, "Acme", "Active", 1000.0, 0.0, 3000.0)], 5);

    let marked_up = table.get(SummaryCategory::MarkedUp).unwrap();
    assert_eq!(marked_up.investments, 1);
    assert_eq!(marked_up.multiple, 3.0);
    assert_eq!(marked_up.value, 3000.0);
    assert_eq!(marked_up.examples, "Acme (3.00x)");
}

#[test]
fn test_partition_matches_totals() {
    let table = summarize_categories(&sample(), 5);
    let totals = table.totals().unwrap();

    assert_eq!(table.rows.len(), 6);
    assert_eq!(table.rows[0].category, SummaryCategory::Totals);
    assert_eq!(totals.investments, 6);
    assert_eq!(totals.companies, 5);
    assert_eq!(totals.percentage, 1.0);

    let parts: Vec<&CategorySummary> = table.rows.iter().skip(1).collect();
    assert_eq!(parts.iter().map(|r| r.investments).sum::<usize>(), 6);
    assert!((parts.iter().map(|r| r.invested).sum::<f64>() - totals.invested).abs() < 1e-9);
    assert!((parts.iter().map(|r| r.realized).sum::<f64>() - totals.realized).abs() < 1e-9);
    assert!((parts.iter().map(|r| r.unrealized).sum::<f64>() - totals.unrealized).abs() < 1e-9);
    assert!((parts.iter().map(|r| r.percentage).sum::<f64>() - 1.0).abs() < 1e-9);

    let not_marked_up = table.get(SummaryCategory::NotMarkedUp).unwrap();
    assert_eq!(not_marked_up.investments, 2);
    assert_eq!(not_marked_up.companies, 2);
    assert!((not_marked_up.percentage - 1000.0 / 3000.0).abs() < 1e-12);
}

#[test]
fn test_examples_are_ranked_and_stable() {
    let rows = vec![
        row(0, "A", "Active", 100.0, 0.0, 200.0),
        row(1, "B", "Active", 100.0, 0.0, 500.0),
        row(2, "C", "Active", 100.0, 0.0, 200.0),
        row(3, "D", "Active", 100.0, 0.0, 300.0),
    ];
    let refs: Vec<&Investment> = rows.iter().collect();

    assert_eq!(
        top_examples_by_multiple(&refs, 3),
        "B (5.00x), D (3.00x), A (2.00x)"
    );
    assert_eq!(top_examples_by_multiple(&[], 3), "");
}

#[test]
fn test_disclosed_total_prices_locked_rows() {
    let table = summarize_categories(&sample(), 5);
    let unrealized_before = table.totals().unwrap().unrealized;
    let priced = table.clone().with_disclosed_total(5000.0);

    let locked = priced.get(SummaryCategory::Locked).unwrap();
    let totals = priced.totals().unwrap();
    assert_eq!(locked.unrealized, 5000.0 - unrealized_before);
    assert_eq!(totals.unrealized, 5000.0);
    assert_eq!(locked.multiple, locked.value / locked.invested);
    assert_eq!(priced.disclosed_total, Some(5000.0));
    assert_eq!(portfolio_total_value(&priced, 1), Some(5000.0));

    // Re-applying the same total changes nothing
    assert_eq!(priced.clone().with_disclosed_total(5000.0), priced);
}

#[test]
fn test_total_value_without_locked_rows() {
    let rows = vec![
        row(0, "Acme", "Active", 1000.0, 0.0, 3000.0),
        row(1, "Gamma", "Realized", 200.0, 400.0, 0.0),
    ];
    let table = summarize_categories(&rows, 5);

    assert_eq!(portfolio_total_value(&table, 0), Some(3400.0));
    // A disclosed total has nothing to price here
    assert_eq!(table.clone().with_disclosed_total(9999.0), table);
}

#[test]
fn test_total_value_unknown_until_disclosed() {
    let table = summarize_categories(&sample(), 5);
    assert_eq!(portfolio_total_value(&table, 1), None);
}

#[test]
fn test_headline() {
    let investments = vec![
        row(0, "Acme", "Active", 1000.0, 0.0, 3000.0),
        row(1, "Gamma", "Realized", 200.0, 400.0, 0.0),
        row(2, "Delta", "Active", 600.0, 0.0, 600.0),
    ];
    let dataset = NormalizedDataset {
        stats: DatasetStats {
            total_investments: 3,
            num_uniques: 3,
            num_leads: 1,
            ..Default::default()
        },
        investments,
        schema: ColumnSchema::full(),
        as_of: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        convention: DateConvention::Us,
        xirr_settings: XirrSettings::default(),
    };
    let table = summarize_categories(&dataset.investments, 5);
    let headline = portfolio_headline(&dataset, &table);

    assert_eq!(headline.invested, 1800.0);
    assert_eq!(headline.total_value, 4000.0);
    assert!((headline.dpi - 400.0 / 1800.0).abs() < 1e-12);
    assert_eq!(headline.mean_invested, 600.0);
    assert_eq!(headline.median_invested, 600.0);
    assert!(headline.xirr.is_some_and(|rate| rate > 0.0));
}

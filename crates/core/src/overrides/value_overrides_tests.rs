use chrono::NaiveDate;

use super::*;
use crate::config::AnalysisConfig;
use crate::investments::{normalize_dataset, ColumnSchema, RawDataset, RawInvestment};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn raw(company: &str, date: &str, invested: &str, unrealized: &str) -> RawInvestment {
    RawInvestment {
        company: company.to_string(),
        status: "Active".to_string(),
        lead: "Jane Syndicate".to_string(),
        invest_date: date.to_string(),
        invested: invested.to_string(),
        realized_value: "$0".to_string(),
        unrealized_value: unrealized.to_string(),
        net_value: unrealized.to_string(),
        multiple: unrealized.to_string(),
        ..Default::default()
    }
}

fn normalized() -> crate::investments::NormalizedDataset {
    let dataset = RawDataset {
        schema: ColumnSchema::full(),
        rows: vec![
            raw("Acme", "01/01/20", "$1,000", "$1,500"),
            raw("Beta", "06/01/21", "$500", "Locked"),
            raw("Acme", "01/01/22", "$1,000", "$900"),
        ],
        ..Default::default()
    };
    let config = AnalysisConfig {
        as_of_date: Some(ymd(2024, 1, 1)),
        ..Default::default()
    };
    normalize_dataset(dataset, &config).unwrap()
}

#[test]
fn test_override_prices_locked_row() {
    let overrides = vec![ValueOverride {
        company: "Beta".to_string(),
        invest_date: ymd(2021, 6, 1),
        new_value: 1500.0,
    }];
    let (dataset, changes) = apply_value_overrides(normalized(), &overrides);

    assert_eq!(changes.len(), 1);
    let change = &changes[0];
    assert!(change.was_locked);
    assert_eq!(change.row_index, 1);
    assert_eq!(change.old_value, 0.0);
    assert_eq!(change.new_value, 1500.0);
    assert_eq!(change.old_multiple, Some(0.0));
    assert_eq!(change.new_multiple, Some(3.0));
    assert_eq!(change.old_xirr, 0.0);
    assert!(change.new_xirr > 0.0);

    let beta = &dataset.investments[1];
    assert!(!beta.valuation_unknown);
    assert_eq!(beta.unrealized_value, 1500.0);
    assert_eq!(beta.xirr, change.new_xirr);
    assert_eq!(dataset.stats.num_locked, 0);
    assert_eq!(dataset.stats.invested_locked, 0.0);
}

#[test]
fn test_override_matches_on_company_and_date() {
    let overrides = vec![ValueOverride {
        company: "Acme".to_string(),
        invest_date: ymd(2022, 1, 1),
        new_value: 2000.0,
    }];
    let (dataset, changes) = apply_value_overrides(normalized(), &overrides);

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].row_index, 2);
    assert_eq!(dataset.investments[0].net_value, 1500.0);
    assert_eq!(dataset.investments[2].net_value, 2000.0);
    assert_eq!(dataset.investments[2].real_multiple, Some(2.0));
}

#[test]
fn test_unmatched_override_changes_nothing() {
    let before = normalized();
    let overrides = vec![ValueOverride {
        company: "Acme".to_string(),
        invest_date: ymd(2019, 1, 1),
        new_value: 2000.0,
    }];
    let (after, changes) = apply_value_overrides(before.clone(), &overrides);

    assert!(changes.is_empty());
    assert_eq!(after.investments, before.investments);
    assert_eq!(after.stats, before.stats);
}

#[test]
fn test_override_keeps_realized_part_of_net_value() {
    let mut partial_exit = raw("Gamma", "03/01/19", "$400", "$100");
    partial_exit.realized_value = "$300".to_string();
    partial_exit.net_value = "$400".to_string();
    let dataset = RawDataset {
        schema: ColumnSchema::full(),
        rows: vec![partial_exit],
        ..Default::default()
    };
    let config = AnalysisConfig {
        as_of_date: Some(ymd(2024, 1, 1)),
        ..Default::default()
    };
    let dataset = normalize_dataset(dataset, &config).unwrap();

    let overrides = vec![ValueOverride {
        company: "Gamma".to_string(),
        invest_date: ymd(2019, 3, 1),
        new_value: 500.0,
    }];
    let (dataset, changes) = apply_value_overrides(dataset, &overrides);

    let gamma = &dataset.investments[0];
    assert_eq!(gamma.realized_value, 300.0);
    assert_eq!(gamma.unrealized_value, 500.0);
    assert_eq!(gamma.net_value, 800.0);
    assert_eq!(gamma.net_value, gamma.total_value());
    assert_eq!(gamma.real_multiple, Some(2.0));
    assert_eq!(changes[0].old_value, 400.0);
    assert_eq!(changes[0].new_value, 800.0);
    // 2x over the holding period, same as the multiple implies
    let years = (ymd(2024, 1, 1) - ymd(2019, 3, 1)).num_days() as f64 / 365.0;
    assert!((gamma.xirr - (2.0f64.powf(1.0 / years) - 1.0)).abs() < 1e-4);
}

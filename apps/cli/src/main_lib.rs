use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use ventfolio_core::normalize::DateConvention;
use ventfolio_core::overrides::{apply_value_overrides, load_value_overrides, OverrideChange};
use ventfolio_core::{
    company_rollups, lead_stats, load_investments, market_breakdown, normalize_dataset,
    portfolio_headline, realized_exits, round_breakdown, summarize_categories, undisclosed_leads,
    year_breakdown, AnalysisConfig, CategorySummaryTable, CompanyRollup, DatasetStats, Error,
    Investment, LabelBreakdown, LeadStats, ParseConfig, ParseError, PortfolioHeadline,
    RawDataset, RealizedExit, UndisclosedLead, YearBreakdown,
};

use crate::config::{Config, ConventionSetting};

/// Banner AngelList puts above the header row; its exports use US dates.
const ANGELLIST_MARKER: &str = "AngelList";

pub fn init_tracing() {
    let log_format = std::env::var("VF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the report
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub as_of: NaiveDate,
    pub date_convention: DateConvention,
    pub stats: DatasetStats,
    pub headline: PortfolioHeadline,
    pub summary: CategorySummaryTable,
    pub companies: Vec<CompanyRollup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds: Option<Vec<LabelBreakdown>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markets: Option<Vec<LabelBreakdown>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<Vec<YearBreakdown>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads: Option<Vec<LeadStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undisclosed_leads: Option<Vec<UndisclosedLead>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realized: Option<Vec<RealizedExit>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<OverrideChange>,
    pub investments: Vec<Investment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parse_errors: Vec<ParseError>,
}

/// Loads the export, runs every calculation and assembles the report.
pub fn run(config: &Config) -> anyhow::Result<Report> {
    let input = config
        .input
        .as_deref()
        .context("No input file: pass a path or set VF_INPUT")?;
    let raw = load_investments(&read(input)?, &ParseConfig::default())
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let convention = resolve_convention(config.date_convention, &raw);
    tracing::info!(
        "Loaded {} rows from {} ({:?} dates)",
        raw.rows.len(),
        input.display(),
        convention
    );
    let parse_errors = raw.parse_errors.clone();

    let analysis = AnalysisConfig {
        date_convention: Some(convention),
        as_of_date: config.as_of,
        top_examples: config.top_examples,
        ..Default::default()
    };
    let mut dataset = normalize_dataset(raw, &analysis)?;

    let mut overrides = Vec::new();
    if let Some(path) = &config.overrides {
        let values = load_value_overrides(&read(path)?, &ParseConfig::default(), convention)
            .with_context(|| format!("Failed to load overrides from {}", path.display()))?;
        let (patched, changes) = apply_value_overrides(dataset, &values);
        dataset = patched;
        overrides = changes;
    }

    let mut summary = summarize_categories(&dataset.investments, analysis.examples());
    if let Some(total) = config.total_value {
        summary = summary.with_disclosed_total(total);
    } else if dataset.stats.num_locked > 0 {
        tracing::warn!(
            "{} investments have locked values; set VF_TOTAL_VALUE to price them",
            dataset.stats.num_locked
        );
    }
    let headline = portfolio_headline(&dataset, &summary);

    Ok(Report {
        as_of: dataset.as_of,
        date_convention: convention,
        headline,
        companies: company_rollups(&dataset)?,
        rounds: optional_view("round breakdown", round_breakdown(&dataset))?,
        markets: optional_view("market breakdown", market_breakdown(&dataset))?,
        years: optional_view("year breakdown", year_breakdown(&dataset))?,
        leads: optional_view("lead stats", lead_stats(&dataset))?,
        undisclosed_leads: optional_view("undisclosed leads", undisclosed_leads(&dataset))?,
        realized: optional_view("realized list", realized_exits(&dataset))?,
        summary,
        overrides,
        stats: dataset.stats,
        investments: dataset.investments,
        parse_errors,
    })
}

fn read(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Picks the date convention for `raw`, sniffing the export when set to auto.
pub fn resolve_convention(setting: ConventionSetting, raw: &RawDataset) -> DateConvention {
    match setting {
        ConventionSetting::Fixed(convention) => convention,
        ConventionSetting::Auto => {
            if raw.preamble.iter().any(|line| line.contains(ANGELLIST_MARKER)) {
                DateConvention::Us
            } else {
                DateConvention::infer(raw.rows.iter().flat_map(|row| {
                    std::iter::once(row.invest_date.as_str())
                        .chain(row.realized_date.as_deref())
                }))
            }
        }
    }
}

/// A view whose column is missing from the export is left out of the report.
fn optional_view<T>(name: &str, result: ventfolio_core::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(view) => Ok(Some(view)),
        Err(Error::SchemaMismatch(column)) => {
            tracing::warn!("Skipping {}: the export has no '{}' column", name, column);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

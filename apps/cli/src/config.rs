use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use ventfolio_core::normalize::DateConvention;

/// How the date convention of the export is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConventionSetting {
    Fixed(DateConvention),
    /// Sniff the export: AngelList exports are US, otherwise infer from the dates
    Auto,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input: Option<PathBuf>,
    pub date_convention: ConventionSetting,
    pub as_of: Option<NaiveDate>,
    /// Portfolio total used to price locked positions
    pub total_value: Option<f64>,
    pub overrides: Option<PathBuf>,
    pub top_examples: Option<usize>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    pub fn from_source(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let date_convention = match var("VF_DATE_CONVENTION")
            .unwrap_or_else(|| "auto".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "auto" => ConventionSetting::Auto,
            "us" => ConventionSetting::Fixed(DateConvention::Us),
            "intl" | "international" => ConventionSetting::Fixed(DateConvention::International),
            other => anyhow::bail!("Invalid VF_DATE_CONVENTION '{}': expected us, intl or auto", other),
        };
        let as_of = var("VF_AS_OF")
            .map(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d"))
            .transpose()
            .context("Invalid VF_AS_OF, expected YYYY-MM-DD")?;
        let total_value = var("VF_TOTAL_VALUE")
            .map(|v| v.parse::<f64>())
            .transpose()
            .context("Invalid VF_TOTAL_VALUE")?;
        let top_examples = var("VF_TOP_EXAMPLES")
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("Invalid VF_TOP_EXAMPLES")?;

        Ok(Self {
            input: var("VF_INPUT").map(PathBuf::from),
            date_convention,
            as_of,
            total_value,
            overrides: var("VF_OVERRIDES").map(PathBuf::from),
            top_examples,
        })
    }

    /// A positional path on the command line wins over `VF_INPUT`.
    pub fn with_input_arg(mut self, arg: Option<String>) -> Self {
        if let Some(path) = arg {
            self.input = Some(PathBuf::from(path));
        }
        self
    }
}

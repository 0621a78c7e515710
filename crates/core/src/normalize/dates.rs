//! Date normalization for export date columns.

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

/// Day/month ordering used by the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum DateConvention {
    /// `MM/DD/YY`
    #[default]
    Us,
    /// `DD/MM/YY`
    International,
}

/// Formats accepted after the hinted ones, identical for both conventions.
const FALLBACK_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

impl DateConvention {
    pub fn from_us_flag(us_format: bool) -> Self {
        if us_format {
            DateConvention::Us
        } else {
            DateConvention::International
        }
    }

    /// Guesses the convention from sample dates. A leading component that can
    /// only be a day means day-first; ambiguous samples read as US.
    pub fn infer<'a>(samples: impl IntoIterator<Item = &'a str>) -> Self {
        let day_first = samples.into_iter().any(|sample| {
            sample
                .trim()
                .split('/')
                .next()
                .and_then(|part| part.parse::<u32>().ok())
                .is_some_and(|first| (13..=31).contains(&first))
        });
        Self::from_us_flag(!day_first)
    }

    /// Two-digit year first: `%Y` would happily read `20` as the year 20 AD.
    fn hinted_formats(self) -> [&'static str; 2] {
        match self {
            DateConvention::Us => ["%m/%d/%y", "%m/%d/%Y"],
            DateConvention::International => ["%d/%m/%y", "%d/%m/%Y"],
        }
    }
}

/// Parses an export date, returning `None` for blank or unreadable values.
///
/// The hinted convention is tried first, then ISO-style dates. The opposite
/// convention is never tried since `03/04/21` would silently change meaning.
pub fn parse_export_date(raw: &str, convention: DateConvention) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    let parsed = convention
        .hinted_formats()
        .iter()
        .chain(FALLBACK_FORMATS.iter())
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok());

    if parsed.is_none() {
        warn!("Could not convert date: '{}' ({:?} convention)", value, convention);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_us_convention() {
        assert_eq!(parse_export_date("03/04/21", DateConvention::Us), Some(ymd(2021, 3, 4)));
        assert_eq!(parse_export_date("12/31/2020", DateConvention::Us), Some(ymd(2020, 12, 31)));
    }

    #[test]
    fn test_international_convention() {
        assert_eq!(
            parse_export_date("03/04/21", DateConvention::International),
            Some(ymd(2021, 4, 3))
        );
        assert_eq!(
            parse_export_date("31/12/2020", DateConvention::International),
            Some(ymd(2020, 12, 31))
        );
    }

    #[test]
    fn test_iso_fallback_applies_to_both_conventions() {
        for convention in [DateConvention::Us, DateConvention::International] {
            assert_eq!(parse_export_date("2020-01-15", convention), Some(ymd(2020, 1, 15)));
        }
    }

    #[test]
    fn test_no_date_marker() {
        assert_eq!(parse_export_date("", DateConvention::Us), None);
        assert_eq!(parse_export_date("not a date", DateConvention::Us), None);
        // Day 31 in the month slot is not retried under the other convention
        assert_eq!(parse_export_date("31/12/20", DateConvention::Us), None);
    }

    #[test]
    fn test_infer_convention() {
        assert_eq!(DateConvention::infer(["01/02/20", "25/03/21"]), DateConvention::International);
        assert_eq!(DateConvention::infer(["01/02/20", "12/31/21"]), DateConvention::Us);
        assert_eq!(DateConvention::infer(["2020-01-15", ""]), DateConvention::Us);
        assert_eq!(DateConvention::infer(Vec::<&str>::new()), DateConvention::Us);
    }

    #[test]
    fn test_from_us_flag() {
        assert_eq!(DateConvention::from_us_flag(true), DateConvention::Us);
        assert_eq!(DateConvention::from_us_flag(false), DateConvention::International);
    }
}

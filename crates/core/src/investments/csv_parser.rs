//! CSV parsing for investment exports.
//!
//! Exports start with a metadata line (export title, date) followed by the
//! header row, so the header is expected at index 1 unless configured
//! otherwise. Ragged rows are padded or truncated to the header width and the
//! problem is reported rather than failing the whole file.

use csv::{ReaderBuilder, Terminator};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};
use crate::Result;

/// Reader options for an export file. Unset fields take the export defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ParseConfig {
    /// Header position among non-empty rows; exports put a title line first (default: 1)
    pub header_row_index: Option<usize>,
    /// ",", ";", "\t", or "auto" to sniff it from the table (default: "auto")
    pub delimiter: Option<String>,
    /// Quote character, first byte used (default: '"')
    pub quote_char: Option<String>,
    /// Drop rows whose cells are all blank (default: true)
    pub skip_empty_rows: Option<bool>,
}

impl ParseConfig {
    pub fn effective_delimiter(&self) -> &str {
        self.delimiter.as_deref().unwrap_or("auto")
    }

    pub fn header_index(&self) -> usize {
        self.header_row_index.unwrap_or(1)
    }

    pub fn skip_empty(&self) -> bool {
        self.skip_empty_rows.unwrap_or(true)
    }

    pub fn quote_byte(&self) -> u8 {
        self.quote_char
            .as_ref()
            .and_then(|s| s.bytes().next())
            .unwrap_or(b'"')
    }
}

/// Header, data rows and metadata lines read from an export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCsvResult {
    /// Header row, trimmed
    pub headers: Vec<String>,
    /// Data rows, each normalized to the header width
    pub rows: Vec<Vec<String>>,
    /// Lines above the header row (export metadata)
    pub preamble: Vec<String>,
    /// Delimiter actually used
    pub delimiter: String,
    /// Problems encountered that did not stop parsing
    pub errors: Vec<ParseError>,
}

/// Kind of problem reported by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParseErrorKind {
    Parse,
    Encoding,
    Structure,
}

/// A recoverable problem noticed while reading the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseError {
    /// Data row the problem belongs to, when it belongs to one
    pub row_index: Option<usize>,
    pub message: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    fn new(row_index: Option<usize>, kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            row_index,
            message: message.into(),
            kind,
        }
    }
}

/// Reads an export into a header and width-normalized data rows.
pub fn parse_csv(content: &[u8], config: &ParseConfig) -> Result<ParsedCsvResult> {
    let mut errors = Vec::new();
    let content_str = decode_content(content, &mut errors);
    let delimiter = detect_delimiter(&content_str, config);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(config.quote_byte())
        .has_headers(false) // header row is located manually
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(content_str.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let row: Vec<String> = record
                    .iter()
                    .map(|s| s.trim_end_matches('\r').to_string())
                    .collect();
                if config.skip_empty() && row.iter().all(|cell| cell.trim().is_empty()) {
                    continue;
                }
                records.push(row);
            }
            Err(e) => errors.push(ParseError::new(
                Some(idx),
                ParseErrorKind::Parse,
                format!("Failed to parse line {}: {}", idx + 1, e),
            )),
        }
    }

    let header_index = config.header_index();
    if records.len() <= header_index {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Expected a header row at line {} but the file has {} non-empty rows",
            header_index + 1,
            records.len()
        ))));
    }

    let mut data_rows = records.split_off(header_index + 1);
    let headers: Vec<String> = records
        .pop()
        .unwrap_or_default()
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let preamble = records.into_iter().map(|row| row.join(",")).collect();

    let width = headers.len();
    for (idx, row) in data_rows.iter_mut().enumerate() {
        if row.len() > width {
            errors.push(ParseError::new(
                Some(idx),
                ParseErrorKind::Structure,
                format!(
                    "Data row {} carries {} cells but the header has {}; trailing cells dropped",
                    idx + 1,
                    row.len(),
                    width
                ),
            ));
            row.truncate(width);
        } else {
            row.resize(width, String::new());
        }
    }

    Ok(ParsedCsvResult {
        headers,
        rows: data_rows,
        preamble,
        delimiter: (delimiter as char).to_string(),
        errors,
    })
}

/// Decodes content bytes to a UTF-8 string, dropping a BOM if present.
fn decode_content(content: &[u8], errors: &mut Vec<ParseError>) -> String {
    let without_bom = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);
    match std::str::from_utf8(without_bom) {
        Ok(s) => s.to_string(),
        Err(e) => {
            errors.push(ParseError::new(
                None,
                ParseErrorKind::Encoding,
                format!(
                    "Export is not valid UTF-8 past byte {} ({}); invalid bytes replaced",
                    e.valid_up_to(),
                    e
                ),
            ));
            String::from_utf8_lossy(without_bom).into_owned()
        }
    }
}

/// Picks the configured delimiter, or the one with the most consistent column count.
fn detect_delimiter(content: &str, config: &ParseConfig) -> u8 {
    match config.effective_delimiter() {
        "auto" => {}
        "\\t" | "\t" => return b'\t',
        other => return other.bytes().next().unwrap_or(b','),
    }

    // The metadata line rarely matches the table, so score from the header onwards
    let lines: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .skip(config.header_index())
        .take(10)
        .collect();

    [b',', b';', b'\t']
        .into_iter()
        .map(|delim| (delim, score_delimiter(&lines, delim as char)))
        .fold((b',', 0), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        })
        .0
}

/// Scores a delimiter by counting lines that share the first line's delimiter count.
fn score_delimiter(lines: &[&str], delimiter: char) -> usize {
    let counts: Vec<usize> = lines.iter().map(|l| l.matches(delimiter).count()).collect();
    match counts.first() {
        Some(&first) if first > 0 => first * counts.iter().filter(|&&c| c == first).count(),
        _ => 0,
    }
}

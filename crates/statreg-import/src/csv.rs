//! # CSV Parsing into Register Drafts
//!
//! Turns an uploaded CSV file into the same wire drafts the mutation
//! path accepts, so imported rows pass through exactly the coercion a
//! one-at-a-time create would. Row-level failures are collected and
//! reported with their line numbers; only a file that cannot be read at
//! all is a hard error.

use std::collections::HashMap;

use serde::Serialize;

use statreg_registers::{AllotmentDraft, DirectorDraft, ShareholderDraft};

use crate::error::ImportError;

/// A parse failure for one CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// 1-based line number in the uploaded file (the header is line 1).
    pub line: u64,
    /// What went wrong with the row.
    pub message: String,
}

/// The outcome of parsing a CSV file: candidate drafts plus the rows
/// that failed.
#[derive(Debug, Clone)]
pub struct ParsedCsv<D> {
    /// Drafts parsed from valid rows, in file order.
    pub drafts: Vec<D>,
    /// Rows that failed to parse, in file order.
    pub errors: Vec<RowError>,
}

/// One CSV data row with access to its headers.
pub struct CsvRow<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a csv::StringRecord,
}

impl<'a> CsvRow<'a> {
    /// The trimmed value of a column, if the column exists and is non-empty.
    pub fn field(&self, name: &str) -> Option<&'a str> {
        let idx = *self.columns.get(name)?;
        let value = self.record.get(idx)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// The value of a required column, or a descriptive error message.
    pub fn require(&self, name: &str) -> Result<&'a str, String> {
        self.field(name)
            .ok_or_else(|| format!("column '{name}' is empty"))
    }
}

/// A register draft that can be built from a CSV row.
pub trait CsvDraft: Sized {
    /// The column headers this register's import requires.
    const REQUIRED_COLUMNS: &'static [&'static str];

    /// Build a draft from one data row. Returns a human-readable message
    /// on failure; full coercion still happens in the register's `create`.
    fn from_row(row: &CsvRow<'_>) -> Result<Self, String>;
}

impl CsvDraft for ShareholderDraft {
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["name", "share_class", "shares_held", "acquired_date"];

    fn from_row(row: &CsvRow<'_>) -> Result<Self, String> {
        Ok(Self {
            name: row.require("name")?.to_string(),
            share_class: row.require("share_class")?.to_string(),
            shares_held: row.require("shares_held")?.to_string(),
            acquired_date: row.require("acquired_date")?.to_string(),
        })
    }
}

impl CsvDraft for DirectorDraft {
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["name", "nationality", "appointment_date"];

    fn from_row(row: &CsvRow<'_>) -> Result<Self, String> {
        Ok(Self {
            name: row.require("name")?.to_string(),
            nationality: row.require("nationality")?.to_string(),
            occupation: row.field("occupation").map(str::to_string),
            appointment_date: row.require("appointment_date")?.to_string(),
        })
    }
}

impl CsvDraft for AllotmentDraft {
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "allottee",
        "share_class",
        "number_of_shares",
        "price_per_share",
        "currency",
        "allotment_date",
    ];

    fn from_row(row: &CsvRow<'_>) -> Result<Self, String> {
        Ok(Self {
            allottee: row.require("allottee")?.to_string(),
            share_class: row.require("share_class")?.to_string(),
            number_of_shares: row.require("number_of_shares")?.to_string(),
            price_per_share: row.require("price_per_share")?.to_string(),
            currency: row.require("currency")?.to_string(),
            allotment_date: row.require("allotment_date")?.to_string(),
        })
    }
}

/// Parse an uploaded CSV file into drafts.
///
/// A file whose header row cannot be read, or which is missing required
/// columns, fails outright. Individual bad rows are collected into
/// [`ParsedCsv::errors`] with their line numbers.
pub fn parse_csv<D: CsvDraft>(bytes: &[u8]) -> Result<ParsedCsv<D>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ImportError::Unreadable(e.to_string()))?
        .clone();

    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect();

    let missing: Vec<String> = D::REQUIRED_COLUMNS
        .iter()
        .filter(|c| !columns.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let mut drafts = Vec::new();
    let mut errors = Vec::new();

    // Data rows start on line 2; the header occupies line 1.
    for (index, result) in reader.records().enumerate() {
        let line = index as u64 + 2;
        match result {
            Err(e) => errors.push(RowError {
                line,
                message: e.to_string(),
            }),
            Ok(record) => {
                let row = CsvRow {
                    columns: &columns,
                    record: &record,
                };
                match D::from_row(&row) {
                    Ok(draft) => drafts.push(draft),
                    Err(message) => errors.push(RowError { line, message }),
                }
            }
        }
    }

    if drafts.is_empty() && errors.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    Ok(ParsedCsv { drafts, errors })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAREHOLDERS: &str = "\
name,share_class,shares_held,acquired_date
Ada Lovelace,Ordinary,500,2024-01-01
Grace Hopper,Ordinary,250,2024-02-01
";

    #[test]
    fn test_valid_rows_parse_in_order() {
        let parsed = parse_csv::<ShareholderDraft>(SHAREHOLDERS.as_bytes()).unwrap();
        assert_eq!(parsed.drafts.len(), 2);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.drafts[0].name, "Ada Lovelace");
        assert_eq!(parsed.drafts[1].shares_held, "250");
    }

    #[test]
    fn test_bad_row_is_reported_not_dropped() {
        let csv = "\
name,share_class,shares_held,acquired_date
Ada Lovelace,Ordinary,500,2024-01-01
,Ordinary,250,2024-02-01
";
        let parsed = parse_csv::<ShareholderDraft>(csv.as_bytes()).unwrap();
        assert_eq!(parsed.drafts.len(), 1);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 3);
        assert!(parsed.errors[0].message.contains("name"));
    }

    #[test]
    fn test_missing_columns_fail_outright() {
        let csv = "name,share_class\nAda,Ordinary\n";
        let err = parse_csv::<ShareholderDraft>(csv.as_bytes()).unwrap_err();
        match err {
            ImportError::MissingColumns(cols) => {
                assert!(cols.contains(&"shares_held".to_string()));
                assert!(cols.contains(&"acquired_date".to_string()));
            }
            other => panic!("expected MissingColumns, got: {other:?}"),
        }
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let csv = "\
Name,Share_Class,Shares_Held,Acquired_Date
Ada Lovelace,Ordinary,500,2024-01-01
";
        let parsed = parse_csv::<ShareholderDraft>(csv.as_bytes()).unwrap();
        assert_eq!(parsed.drafts.len(), 1);
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let csv = "name,share_class,shares_held,acquired_date\n";
        assert_eq!(
            parse_csv::<ShareholderDraft>(csv.as_bytes()).unwrap_err(),
            ImportError::EmptyFile
        );
    }

    #[test]
    fn test_optional_director_occupation() {
        let csv = "\
name,nationality,appointment_date,occupation
Margaret Hamilton,American,2024-01-15,Engineer
Annie Easley,American,2024-02-15,
";
        let parsed = parse_csv::<DirectorDraft>(csv.as_bytes()).unwrap();
        assert_eq!(parsed.drafts.len(), 2);
        assert_eq!(parsed.drafts[0].occupation.as_deref(), Some("Engineer"));
        assert_eq!(parsed.drafts[1].occupation, None);
    }
}

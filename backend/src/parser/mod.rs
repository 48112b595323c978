//! Semicolon-delimited file parser.
//!
//! Reads a file with a header row into typed records. Decoding a row has three
//! outcomes:
//!
//! - accepted: every required field is present and every value coerces
//! - skipped: a required field is absent or blank; the row is logged and
//!   returned in [`Parsed::skipped`]
//! - fatal: a complete row holds a value of the wrong type; the whole parse
//!   fails with [`CsvError::InvalidField`]
//!
//! Files are read fully into memory. UTF-8 is tried first, other encodings
//! are detected with `chardet`.

mod records;

pub use records::PurchaseRow;

use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::error::{CsvError, CsvResult, FieldError};
use crate::models::{Customer, PurchaseIndex};

/// Field delimiter of both input files.
pub const DELIMITER: u8 = b';';

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

// =============================================================================
// Rows
// =============================================================================

/// One data row keyed by header name.
///
/// A header column the row has no value for is absent. Absent and empty
/// values are told apart only in diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    line: u64,
    fields: Vec<(String, Option<String>)>,
}

impl RawRow {
    pub fn new(line: u64, headers: &[String], record: &csv::StringRecord) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).map(str::to_string)))
            .collect();
        Self { line, fields }
    }

    /// Build a row from literal pairs; a `None` value marks an absent column.
    pub fn from_pairs(line: u64, pairs: &[(&str, Option<&str>)]) -> Self {
        let fields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect();
        Self { line, fields }
    }

    /// 1-based line number in the source file.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Raw value of a column, `None` if the column is absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Raw value of a column, empty if absent.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Trimmed value of a column, empty if absent.
    pub fn trimmed(&self, key: &str) -> &str {
        self.value(key).trim()
    }

    /// Required keys that are absent or blank, in the order given.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|key| self.trimmed(key).is_empty())
            .collect()
    }

    /// The row as a JSON object, absent columns as `null`.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        for (key, value) in &self.fields {
            let value = match value {
                Some(v) => Value::String(v.clone()),
                None => Value::Null,
            };
            obj.insert(key.clone(), value);
        }
        Value::Object(obj)
    }
}

impl std::fmt::Display for RawRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// A row that was left out because required fields were missing.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
    pub missing_fields: Vec<String>,
    /// The row as read, for diagnostics.
    pub raw: Value,
}

/// Outcome of decoding one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome<T> {
    Accepted(T),
    Skipped(SkippedRow),
}

/// A record type that can be decoded from a header-keyed row.
pub trait Record: Sized {
    /// Name of the source file kind used in diagnostics.
    const LABEL: &'static str;

    /// Columns that must be present and non-blank.
    const REQUIRED: &'static [&'static str];

    /// Build the record from a row that passed the presence checks.
    fn decode(row: &RawRow) -> Result<Self, FieldError>;
}

/// Apply the presence checks, then decode.
pub fn decode_row<R: Record>(row: &RawRow) -> Result<RowOutcome<R>, FieldError> {
    let missing = row.missing(R::REQUIRED);
    if !missing.is_empty() {
        return Ok(RowOutcome::Skipped(SkippedRow {
            line: row.line(),
            reason: format!("Missing: {}", missing.join(", ")),
            missing_fields: missing.into_iter().map(String::from).collect(),
            raw: row.to_json(),
        }));
    }
    R::decode(row).map(RowOutcome::Accepted)
}

/// Records decoded from a file, plus the rows that were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub records: T,
    pub skipped: Vec<SkippedRow>,
}

impl<T> Parsed<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            records: f(self.records),
            skipped: self.skipped,
        }
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes with a named encoding.
///
/// Unknown labels fall back to Windows-1252, which maps every byte.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let codec = encoding_rs::Encoding::for_label(encoding.as_bytes())
        .unwrap_or(encoding_rs::WINDOWS_1252);
    let (text, _, had_errors) = codec.decode(bytes);
    if had_errors {
        return Err(CsvError::Encoding(format!(
            "content is not valid {}",
            codec.name()
        )));
    }
    Ok(text.into_owned())
}

/// Decode bytes, trying UTF-8 before detection. Returns the text and the
/// encoding used.
pub fn decode_bytes_auto(bytes: &[u8]) -> CsvResult<(String, String)> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok((text.to_string(), "utf-8".to_string()));
    }
    let encoding = detect_encoding(bytes);
    let text = decode_content(bytes, &encoding)?;
    Ok((text, encoding))
}

// =============================================================================
// Reading
// =============================================================================

/// Decode every data row of `content` as `R`.
pub fn read_records<R: Record>(content: &str) -> CsvResult<Parsed<Vec<R>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let row = RawRow::new(line, &headers, &record);

        match decode_row::<R>(&row)? {
            RowOutcome::Accepted(rec) => records.push(rec),
            RowOutcome::Skipped(skip) => {
                warn!(line, row = %row, "Invalid row in {} file ({})", R::LABEL, skip.reason);
                skipped.push(skip);
            }
        }
    }

    Ok(Parsed { records, skipped })
}

/// Read `path` and decode every data row as `R`.
pub fn read_records_from_path<R: Record>(path: &Path) -> CsvResult<Parsed<Vec<R>>> {
    let result = std::fs::read(path)
        .map_err(|source| CsvError::Io {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|bytes| decode_bytes_auto(&bytes))
        .and_then(|(content, encoding)| {
            debug!(file = %path.display(), %encoding, "Decoded {} file", R::LABEL);
            read_records::<R>(&content)
        });

    match &result {
        Ok(parsed) => info!(
            accepted = parsed.records.len(),
            skipped = parsed.skipped.len(),
            "Successfully parsed {} from {}.",
            R::LABEL,
            path.display()
        ),
        Err(e) => error!(kind = e.kind(), "Error parsing {} file: {}", R::LABEL, e),
    }

    result
}

/// Parse the customers file.
pub fn parse_customers(path: impl AsRef<Path>) -> CsvResult<Parsed<Vec<Customer>>> {
    read_records_from_path::<Customer>(path.as_ref())
}

/// Parse the purchases file into an index keyed by customer id.
pub fn parse_purchases(path: impl AsRef<Path>) -> CsvResult<Parsed<PurchaseIndex>> {
    read_records_from_path::<PurchaseRow>(path.as_ref()).map(|parsed| parsed.map(index_rows))
}

/// Parse customers from in-memory text.
pub fn parse_customers_str(content: &str) -> CsvResult<Parsed<Vec<Customer>>> {
    read_records::<Customer>(content)
}

/// Parse purchases from in-memory text.
pub fn parse_purchases_str(content: &str) -> CsvResult<Parsed<PurchaseIndex>> {
    read_records::<PurchaseRow>(content).map(|parsed| parsed.map(index_rows))
}

fn index_rows(rows: Vec<PurchaseRow>) -> PurchaseIndex {
    rows.into_iter()
        .map(|row| (row.customer_id, row.purchase))
        .collect()
}

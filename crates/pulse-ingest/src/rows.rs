//! Upload payload parsing: CSV/JSON bytes to key/value rows.
//!
//! This is the only fallible step of ingestion. Everything downstream of a
//! successfully parsed row list degrades malformed fields to defaults.

use serde_json::{Map, Value};

use crate::error::IngestError;

/// One parsed upload row: arbitrary string keys, scalar/array values.
pub type RawRow = Map<String, Value>;

/// Supported upload formats, sniffed from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// Determine the format from a file name. Case-insensitive on the
    /// extension; `None` for anything that is not `.csv` or `.json`.
    #[must_use]
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = name.rsplit('.').next()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse an upload payload into rows.
///
/// JSON documents must be an array of objects (a bare object is accepted as
/// a one-row batch). CSV is header-addressed; all CSV values are strings.
///
/// # Errors
///
/// Returns [`IngestError::InvalidFormat`] for malformed documents or row
/// elements that are not objects. The whole batch fails; there is no
/// partial result.
pub fn parse_rows(bytes: &[u8], format: SourceFormat) -> Result<Vec<RawRow>, IngestError> {
    let text = String::from_utf8_lossy(bytes);
    match format {
        SourceFormat::Json => parse_json_rows(&text),
        SourceFormat::Csv => parse_csv_rows(&text),
    }
}

fn parse_json_rows(text: &str) -> Result<Vec<RawRow>, IngestError> {
    let document: Value = serde_json::from_str(text)
        .map_err(|e| IngestError::InvalidFormat(format!("malformed JSON document: {e}")))?;

    let elements = match document {
        Value::Array(items) => items,
        Value::Object(_) => vec![document],
        _ => {
            return Err(IngestError::InvalidFormat(
                "JSON payload must be an object or an array of objects".to_string(),
            ))
        }
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(idx, element)| match element {
            Value::Object(row) => Ok(row),
            other => Err(IngestError::InvalidFormat(format!(
                "row {idx} is not an object (found {})",
                type_name(&other)
            ))),
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse CSV text into header-keyed rows.
///
/// Handles quoted fields, doubled-quote escapes, and newlines inside quotes.
/// Short records leave their trailing columns absent; extra fields beyond
/// the header are dropped.
fn parse_csv_rows(text: &str) -> Result<Vec<RawRow>, IngestError> {
    let mut records = split_csv_records(text)?;
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let headers = records.remove(0);
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::InvalidFormat(
            "CSV header row is empty".to_string(),
        ));
    }

    let rows = records
        .into_iter()
        .filter(|fields| !(fields.len() == 1 && fields[0].is_empty()))
        .map(|fields| {
            let mut row = RawRow::new();
            for (header, value) in headers.iter().zip(fields) {
                row.insert(header.clone(), Value::String(value));
            }
            row
        })
        .collect();

    Ok(rows)
}

/// Split CSV text into records of fields with a quote-aware state machine.
fn split_csv_records(text: &str) -> Result<Vec<Vec<String>>, IngestError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => {
                fields.push(std::mem::take(&mut field));
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                fields.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut fields));
            }
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut fields));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(IngestError::InvalidFormat(
            "CSV document ends inside a quoted field".to_string(),
        ));
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(fields);
    }

    Ok(records)
}

//! Loading raw transaction records from disk
//!
//! Produces the untyped `serde_json::Value` the normalizer consumes. JSON
//! files are taken as-is (array or `{ "transactions": [...] }` envelope);
//! CSV exports become an array of objects keyed by header name.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;

/// Input file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Guess from the file extension; anything but `.csv` is JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// Load raw records from a JSON or CSV file
pub fn load_records(path: &Path) -> Result<Value> {
    let format = InputFormat::from_path(path);
    debug!("Loading {:?} records from {}", format, path.display());
    let reader = BufReader::new(File::open(path)?);
    match format {
        InputFormat::Json => parse_records_json(reader),
        InputFormat::Csv => parse_records_csv(reader),
    }
}

/// Parse a JSON document without interpreting it
pub fn parse_records_json<R: Read>(reader: R) -> Result<Value> {
    Ok(serde_json::from_reader(reader)?)
}

/// Parse CSV into an array of objects using headers as keys
pub fn parse_records_csv<R: Read>(reader: R) -> Result<Value> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut records = Vec::new();

    for result in rdr.records() {
        let record = result?;
        records.push(record_to_json(&headers, &record));
    }

    debug!("Parsed {} CSV records", records.len());
    Ok(Value::Array(records))
}

/// Convert a CSV record to a JSON object. Empty cells are left out so the
/// normalizer sees them as missing rather than malformed.
fn record_to_json(headers: &StringRecord, record: &StringRecord) -> Value {
    let mut map = Map::new();
    for (i, header) in headers.iter().enumerate() {
        if let Some(value) = record.get(i).filter(|v| !v.is_empty()) {
            map.insert(header.to_string(), Value::String(value.to_string()));
        }
    }
    Value::Object(map)
}

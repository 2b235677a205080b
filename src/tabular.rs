//! CSV ingest and export for record sets.
//!
//! Comma-delimited with one header row of attribute names. Values are
//! stringified with a stable, locale-independent format, so exported bytes
//! re-parse to the same records up to float formatting precision.

use crate::error::Result;
use crate::types::{RecordSet, Value};
use csv::{ReaderBuilder, WriterBuilder};
use std::io;
use tracing::info;

/// Parse a comma-delimited table with a header row into a record set.
///
/// Every field goes through [`Value::parse`]; unrecognized columns pass
/// through untouched.
pub fn read_records<R: io::Read>(reader: R) -> Result<RecordSet> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut records = RecordSet::new(columns);

    for row in csv_reader.records() {
        let row = row?;
        records.push_row(row.iter().map(Value::parse).collect())?;
    }

    info!(
        records = records.len(),
        columns = records.columns().len(),
        "Parsed CSV input"
    );
    Ok(records)
}

/// Serialize a record set to CSV bytes.
///
/// Exports whatever it is given; no filtering or aggregation happens here.
pub fn write_records(records: &RecordSet) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(records.columns())?;
    for row in records.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e).into())
}

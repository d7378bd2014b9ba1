//! Telemetry input parsing
//!
//! Reads telemetry records from a JSON array or from NDJSON (one record per
//! line, blank lines skipped).

use crate::error::CoreError;
use crate::telemetry::types::TelemetryRecord;

/// Parse a JSON array of telemetry records
pub fn parse_array(json: &str) -> Result<Vec<TelemetryRecord>, CoreError> {
    let records: Vec<TelemetryRecord> = serde_json::from_str(json)?;
    Ok(records)
}

/// Parse newline-delimited JSON telemetry records
pub fn parse_ndjson(ndjson: &str) -> Result<Vec<TelemetryRecord>, CoreError> {
    let mut records = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record = serde_json::from_str::<TelemetryRecord>(trimmed).map_err(|e| {
            CoreError::ParseError(format!("Failed to parse line {}: {}", line_num + 1, e))
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Parse a single record
pub fn parse_record(json: &str) -> Result<TelemetryRecord, CoreError> {
    Ok(serde_json::from_str(json)?)
}

//! Telemetry Parser
//!
//! Turns the pseudo-file's `"<Key>: <Value>[<unit>]"` lines into a
//! [`TelemetryRecord`]. Lines that are not exactly one `": "`-separated pair
//! are skipped.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::record::{MetricValue, TelemetryRecord};
use crate::logic::error::{PipelineError, PipelineResult};

/// Key carrying the directly observed clock frequency
pub const FREQUENCY_KEY: &str = "CPU Frequency";

/// Unit suffixes removed from every value
const UNIT_SUFFIXES: &[&str] = &["kB", "MHz", "°C"];

/// Removed only from the frequency metric
const FREQUENCY_UNIT: &str = "kHz";

/// Strip known units from a raw value
pub fn strip_units(key: &str, value: &str) -> String {
    let mut cleaned = value.to_string();
    for unit in UNIT_SUFFIXES {
        cleaned = cleaned.replace(unit, "");
    }
    if key.contains(FREQUENCY_KEY) {
        cleaned = cleaned.replace(FREQUENCY_UNIT, "");
    }
    cleaned.trim().to_string()
}

/// Parse one line into a key/value pair
pub fn parse_line(line: &str) -> Option<(String, MetricValue)> {
    let parts: Vec<&str> = line.trim().split(": ").collect();
    if parts.len() != 2 {
        return None;
    }

    let key = parts[0].trim();
    if key.is_empty() {
        return None;
    }

    let value = strip_units(key, parts[1]);
    Some((key.to_string(), MetricValue::coerce(&value)))
}

/// Parse the full contents of the pseudo-file
pub fn parse_telemetry(contents: &str) -> TelemetryRecord {
    contents.lines().filter_map(parse_line).collect()
}

/// Read and parse the telemetry source
///
/// A missing file or a file with no parseable metrics is
/// `SourceUnavailable`; callers abort the current cycle only.
pub fn read_telemetry(path: &Path) -> PipelineResult<TelemetryRecord> {
    let contents = fs::read_to_string(path).map_err(|e| PipelineError::SourceUnavailable {
        path: path.to_path_buf(),
        reason: match e.kind() {
            ErrorKind::NotFound => "file not found; is the kernel module loaded?".to_string(),
            _ => e.to_string(),
        },
    })?;

    let record = parse_telemetry(&contents);
    if record.is_empty() {
        return Err(PipelineError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: "no metrics could be read".to_string(),
        });
    }

    log::debug!("Read {} metrics from {}", record.len(), path.display());
    Ok(record)
}

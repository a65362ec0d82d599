//! Telemetry Module
//!
//! Reads the kernel module's pseudo-file and turns it into a
//! [`TelemetryRecord`] of metric name to value.
//!
//! ## Structure
//! - `record.rs` - TelemetryRecord / MetricValue
//! - `parser.rs` - line parsing, unit stripping, source reading

pub mod record;
pub mod parser;


pub use record::{MetricValue, TelemetryRecord};
pub use parser::{parse_line, parse_telemetry, read_telemetry, FREQUENCY_KEY};

//! Telemetry Record - one snapshot of "Key: Value" metrics

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single metric value after unit stripping
///
/// Values that fail numeric coercion are kept as raw text; the schema
/// reports them as `NonNumericValue` only when it tries to use them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    /// Numeric parse, falling back to raw text
    pub fn coerce(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(v) => MetricValue::Number(v),
            Err(_) => MetricValue::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(v) => Some(*v),
            MetricValue::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(v) => write!(f, "{}", v),
            MetricValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Metric name -> value, produced fresh per read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    metrics: BTreeMap<String, MetricValue>,
}

impl TelemetryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MetricValue) {
        self.metrics.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.metrics.get(key)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.metrics.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, MetricValue)> for TelemetryRecord {
    fn from_iter<I: IntoIterator<Item = (String, MetricValue)>>(iter: I) -> Self {
        Self { metrics: iter.into_iter().collect() }
    }
}

//! Feature Vector - schema projection of a record or CSV row
//!
//! Every lookup goes through [`FeatureSchema::project`]: keys are read in
//! schema order, a missing key is `MissingFeature`, a non-numeric or non-finite
//! value is `NonNumericValue`. Nothing is zero-filled.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::layout::FeatureSchema;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::telemetry::{MetricValue, TelemetryRecord};

// ============================================================================
// FEATURE SOURCE
// ============================================================================

/// Anything that can be looked up by metric name
pub trait FeatureSource {
    fn metric(&self, name: &str) -> Option<MetricValue>;
}

impl FeatureSource for TelemetryRecord {
    fn metric(&self, name: &str) -> Option<MetricValue> {
        self.get(name).cloned()
    }
}

impl FeatureSource for HashMap<String, f64> {
    fn metric(&self, name: &str) -> Option<MetricValue> {
        self.get(name).map(|v| MetricValue::Number(*v))
    }
}

impl FeatureSource for HashMap<String, String> {
    fn metric(&self, name: &str) -> Option<MetricValue> {
        self.get(name).map(|v| MetricValue::coerce(v.trim()))
    }
}

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Projected feature values, tagged with the hash of the schema that built them
///
/// Ephemeral: rebuilt per prediction, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub layout_hash: u32,
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self, schema: &FeatureSchema) -> serde_json::Value {
        serde_json::json!({
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": schema.names().iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.clone(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

impl FeatureSchema {
    /// Look up each schema key in order
    pub fn project<S: FeatureSource + ?Sized>(&self, source: &S) -> PipelineResult<FeatureVector> {
        let mut values = Vec::with_capacity(self.len());

        for name in self.names() {
            match source.metric(name) {
                None => return Err(PipelineError::MissingFeature(name.clone())),
                Some(MetricValue::Text(raw)) => {
                    return Err(PipelineError::NonNumericValue { key: name.clone(), raw })
                }
                Some(MetricValue::Number(v)) if !v.is_finite() => {
                    return Err(PipelineError::NonNumericValue { key: name.clone(), raw: v.to_string() })
                }
                Some(MetricValue::Number(v)) => values.push(v),
            }
        }

        Ok(FeatureVector { layout_hash: self.hash(), values })
    }
}

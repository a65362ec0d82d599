//! Training CSV reader
//!
//! Header names are trimmed before matching; every non-label column becomes
//! a feature, in table order. Duplicate header names are rejected.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use ndarray::{Array1, Array2};

use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::FeatureSchema;

/// Feature matrix and label vector split by schema
#[derive(Debug, Clone)]
pub struct TrainingTable {
    pub columns: Vec<String>,
    pub schema: FeatureSchema,
    pub features: Array2<f64>,
    pub labels: Array1<f64>,
}

impl TrainingTable {
    pub fn rows(&self) -> usize {
        self.labels.len()
    }
}

/// Load the training CSV and split off `label`
pub fn load_training_table(path: &Path, label: &str) -> PipelineResult<TrainingTable> {
    let file = File::open(path).map_err(|e| PipelineError::DatasetUnavailable {
        path: path.to_path_buf(),
        reason: match e.kind() {
            ErrorKind::NotFound => "file not found".to_string(),
            _ => e.to_string(),
        },
    })?;

    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);

    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(PipelineError::DatasetUnavailable {
            path: path.to_path_buf(),
            reason: "file is empty".to_string(),
        });
    }

    for (idx, name) in columns.iter().enumerate() {
        if columns[..idx].contains(name) {
            return Err(PipelineError::DuplicateColumn(name.clone()));
        }
    }

    let label_idx = columns
        .iter()
        .position(|c| c == label)
        .ok_or_else(|| PipelineError::LabelColumnMissing {
            label: label.to_string(),
            available: columns.clone(),
        })?;

    let schema = FeatureSchema::from_columns(&columns, label);
    let width = schema.len();
    let mut features: Vec<f64> = Vec::new();
    let mut labels: Vec<f64> = Vec::new();

    for record in reader.records() {
        let record = record?;
        for (idx, field) in record.iter().enumerate() {
            let value = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| PipelineError::NonNumericValue {
                    key: columns.get(idx).cloned().unwrap_or_default(),
                    raw: field.to_string(),
                })?;
            if idx == label_idx {
                labels.push(value);
            } else {
                features.push(value);
            }
        }
    }

    if labels.is_empty() {
        return Err(PipelineError::DatasetUnavailable {
            path: path.to_path_buf(),
            reason: "no data rows".to_string(),
        });
    }

    let rows = labels.len();
    let features_len = features.len();
    let features = Array2::from_shape_vec((rows, width), features)
        .map_err(|_| PipelineError::ShapeMismatch { expected: width, actual: features_len / rows })?;

    log::info!(
        "Loaded {} rows x {} features from {}",
        rows,
        width,
        path.display()
    );

    Ok(TrainingTable {
        columns,
        schema,
        features,
        labels: Array1::from(labels),
    })
}

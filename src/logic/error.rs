//! Pipeline error taxonomy
//!
//! Every failure a flow can hit is one of these variants. Flows return them
//! to the binary boundary, which logs and exits with [`PipelineError::exit_code`].

use std::path::PathBuf;

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Telemetry pseudo-file missing, unreadable or empty
    #[error("telemetry source unavailable at {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// Training CSV missing or empty
    #[error("training dataset unavailable at {path}: {reason}")]
    DatasetUnavailable { path: PathBuf, reason: String },

    #[error("label column '{label}' not found; available columns: {available:?}")]
    LabelColumnMissing { label: String, available: Vec<String> },

    #[error("required feature '{0}' is missing")]
    MissingFeature(String),

    #[error("value of '{key}' is not numeric: '{raw}'")]
    NonNumericValue { key: String, raw: String },

    #[error("artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("inconsistent artifacts: {0}")]
    ArtifactInconsistent(String),

    /// Training-time schema differs from the declared inference schema
    #[error("feature schema mismatch: expected {expected:?}, found {found:?}")]
    SchemaMismatch { expected: Vec<String>, found: Vec<String> },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("shape mismatch: expected width {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Model or inverse scaling produced NaN or infinity
    #[error("non-finite {stage} value: {value}")]
    NonFiniteOutput { stage: &'static str, value: f64 },

    #[error("duplicate column '{0}' in training dataset")]
    DuplicateColumn(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PipelineError {
    /// Distinct process exit code per failure kind
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::SourceUnavailable { .. } => 10,
            PipelineError::DatasetUnavailable { .. } => 11,
            PipelineError::LabelColumnMissing { .. } => 12,
            PipelineError::MissingFeature(_) => 13,
            PipelineError::NonNumericValue { .. } => 14,
            PipelineError::ArtifactNotFound(_) => 15,
            PipelineError::ArtifactInconsistent(_) => 16,
            PipelineError::SchemaMismatch { .. } => 17,
            PipelineError::InvalidConfig(_) => 18,
            PipelineError::InsufficientData(_) => 19,
            PipelineError::ShapeMismatch { .. } => 20,
            PipelineError::Io(_) => 21,
            PipelineError::Serialization(_) => 22,
            PipelineError::Csv(_) => 23,
            PipelineError::NonFiniteOutput { .. } => 24,
            PipelineError::DuplicateColumn(_) => 25,
        }
    }

    /// Failures that only affect the current cycle; a later poll may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::SourceUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = vec![
            PipelineError::SourceUnavailable { path: PathBuf::from("x"), reason: String::new() },
            PipelineError::DatasetUnavailable { path: PathBuf::from("x"), reason: String::new() },
            PipelineError::LabelColumnMissing { label: "l".into(), available: vec![] },
            PipelineError::MissingFeature("f".into()),
            PipelineError::NonNumericValue { key: "k".into(), raw: "r".into() },
            PipelineError::ArtifactNotFound(PathBuf::from("x")),
            PipelineError::ArtifactInconsistent("x".into()),
            PipelineError::SchemaMismatch { expected: vec![], found: vec![] },
            PipelineError::InvalidConfig("x".into()),
            PipelineError::InsufficientData("x".into()),
            PipelineError::ShapeMismatch { expected: 1, actual: 2 },
            PipelineError::Io(std::io::Error::new(std::io::ErrorKind::Other, "x")),
            PipelineError::NonFiniteOutput { stage: "model", value: f64::NAN },
            PipelineError::DuplicateColumn("x".into()),
        ];

        let codes: HashSet<i32> = errors.iter().map(|e| e.exit_code()).collect();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&0));
    }

    #[test]
    fn test_label_missing_lists_columns() {
        let err = PipelineError::LabelColumnMissing {
            label: "CPU Frequency".into(),
            available: vec!["a".into(), "b".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("CPU Frequency"));
        assert!(msg.contains("\"a\""));
    }

    #[test]
    fn test_only_source_unavailable_is_retryable() {
        let source = PipelineError::SourceUnavailable { path: PathBuf::from("/proc/x"), reason: "gone".into() };
        assert!(source.is_retryable());
        assert!(!PipelineError::MissingFeature("x".into()).is_retryable());
    }
}

//! CPU Frequency Predictor
//!
//! Learns CPU clock frequency from kernel telemetry counters and predicts it
//! from a live telemetry read. The `train`, `predict` and `collect` binaries
//! are thin wrappers over [`logic::pipeline`].

pub mod constants;
pub mod logic;

pub use logic::config::{CollectConfig, PipelineConfig, TrainingConfig};
pub use logic::error::{PipelineError, PipelineResult};
pub use logic::pipeline::{collect, predict, train, Prediction, PredictionReport, Predictor, TrainingReport};

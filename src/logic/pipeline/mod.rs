//! Pipeline - the train, predict and collect flows
//!
//! Each flow takes an explicit [`PipelineConfig`] and returns a report or a
//! [`PipelineError`]; binaries decide how to surface the error.
//!
//! [`PipelineConfig`]: crate::logic::config::PipelineConfig
//! [`PipelineError`]: crate::logic::error::PipelineError

pub mod train;
pub mod predict;
pub mod collect;


pub use train::{train, train_with, SamplePrediction, TrainingReport};
pub use predict::{predict, Prediction, PredictionReport, Predictor};
pub use collect::collect;

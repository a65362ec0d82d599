//! Model Module - regression model and training
//!
//! The scaler, schema and persistence contracts only see [`Regressor`]:
//! "map a scaled feature vector to a scaled scalar, trainable from
//! (inputs, labels) pairs". `Mlp` is the shipped implementation.

pub mod network;
pub mod optimizer;
pub mod trainer;

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::logic::error::PipelineResult;

// Re-export common types
pub use network::{Activation, Mlp, MlpSpec};
pub use trainer::{fit_with_early_stopping, partition, EarlyStopping, Partition, TrainingHistory};

// ============================================================================
// REGRESSOR TRAIT
// ============================================================================

pub trait Regressor {
    /// Feature count the model was built for
    fn input_width(&self) -> usize;

    /// One shuffled mini-batch pass over the data; returns mean training loss
    fn fit_epoch(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        batch_size: usize,
        rng: &mut StdRng,
    ) -> f64;

    /// Forward pass only, one output per row
    fn predict(&self, x: ArrayView2<f64>) -> Array1<f64>;

    /// Persisted form (architecture + weights)
    fn to_artifact(&self) -> ModelArtifact;

    /// Mean squared error against `y`
    fn evaluate(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> f64 {
        mean_squared_error(self.predict(x).view(), y)
    }
}

pub fn mean_squared_error(predicted: ArrayView1<f64>, actual: ArrayView1<f64>) -> f64 {
    if predicted.is_empty() {
        return 0.0;
    }
    let diff = &predicted - &actual;
    diff.mapv(|d| d * d).sum() / predicted.len() as f64
}

/// Negative clock frequency is physically meaningless
///
/// Applied after inverse scaling, never before.
pub fn clamp_frequency(value: f64) -> f64 {
    value.max(0.0)
}

// ============================================================================
// MODEL ARTIFACT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "architecture", rename_all = "snake_case")]
pub enum ModelArtifact {
    Mlp(MlpSpec),
}

impl ModelArtifact {
    pub fn input_width(&self) -> usize {
        match self {
            ModelArtifact::Mlp(spec) => spec.input_width,
        }
    }

    pub fn output_width(&self) -> usize {
        match self {
            ModelArtifact::Mlp(spec) => spec.output_width(),
        }
    }

    /// Instantiate a model for inference
    pub fn build(&self) -> PipelineResult<Box<dyn Regressor>> {
        match self {
            ModelArtifact::Mlp(spec) => Ok(Box::new(Mlp::from_spec(spec)?)),
        }
    }
}

//! Feed-forward regression network
//!
//! `input(N) → dense(64, ReLU) → dense(32, ReLU) → dense(1, linear)` by
//! default; hidden widths come from [`TrainingConfig::hidden_layers`].
//!
//! [`TrainingConfig::hidden_layers`]: crate::logic::config::TrainingConfig

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::optimizer::Adam;
use super::{ModelArtifact, Regressor};
use crate::logic::error::{PipelineError, PipelineResult};

// ============================================================================
// ACTIVATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Linear,
}

impl Activation {
    fn apply(self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::Relu => z.mapv(|v| v.max(0.0)),
            Activation::Linear => z.clone(),
        }
    }

    fn derivative(self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::Relu => z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Linear => Array2::ones(z.raw_dim()),
        }
    }
}

// ============================================================================
// DENSE LAYER
// ============================================================================

#[derive(Debug, Clone)]
pub struct DenseLayer {
    /// (inputs, outputs)
    pub weights: Array2<f64>,
    pub bias: Array1<f64>,
    pub activation: Activation,
}

/// Parameter gradients for one layer
#[derive(Debug, Clone)]
pub struct LayerGradients {
    pub weights: Array2<f64>,
    pub bias: Array1<f64>,
}

impl DenseLayer {
    /// Glorot-uniform weights, zero bias
    pub fn glorot(inputs: usize, outputs: usize, activation: Activation, rng: &mut StdRng) -> Self {
        let limit = (6.0 / (inputs + outputs) as f64).sqrt();
        Self {
            weights: Array2::from_shape_fn((inputs, outputs), |_| rng.gen_range(-limit..limit)),
            bias: Array1::zeros(outputs),
            activation,
        }
    }

    pub fn inputs(&self) -> usize {
        self.weights.nrows()
    }

    pub fn outputs(&self) -> usize {
        self.weights.ncols()
    }

    /// Returns (pre-activation, activation)
    fn forward(&self, x: ArrayView2<f64>) -> (Array2<f64>, Array2<f64>) {
        let z = x.dot(&self.weights) + &self.bias;
        let a = self.activation.apply(&z);
        (z, a)
    }
}

// ============================================================================
// PERSISTED FORM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub inputs: usize,
    pub outputs: usize,
    pub activation: Activation,
    /// Row-major (inputs, outputs)
    pub weights: Vec<f64>,
    pub bias: Vec<f64>,
}

/// Architecture plus learned weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpSpec {
    pub input_width: usize,
    /// Adam step size the weights were trained with
    pub learning_rate: f64,
    pub layers: Vec<LayerSpec>,
}

impl MlpSpec {
    pub fn output_width(&self) -> usize {
        self.layers.last().map(|l| l.outputs).unwrap_or(0)
    }
}

// ============================================================================
// MLP
// ============================================================================

#[derive(Debug, Clone)]
pub struct Mlp {
    layers: Vec<DenseLayer>,
    optimizer: Adam,
}

impl Mlp {
    pub fn new(input_width: usize, hidden: &[usize], learning_rate: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut layers = Vec::with_capacity(hidden.len() + 1);
        let mut inputs = input_width;

        for &width in hidden {
            layers.push(DenseLayer::glorot(inputs, width, Activation::Relu, &mut rng));
            inputs = width;
        }
        layers.push(DenseLayer::glorot(inputs, 1, Activation::Linear, &mut rng));

        let optimizer = Adam::new(&layers, learning_rate);
        Self { layers, optimizer }
    }

    /// Rebuild from persisted weights; optimizer moments start from zero
    pub fn from_spec(spec: &MlpSpec) -> PipelineResult<Self> {
        let mut layers = Vec::with_capacity(spec.layers.len());
        let mut expected_inputs = spec.input_width;

        for (idx, layer) in spec.layers.iter().enumerate() {
            if layer.inputs != expected_inputs {
                return Err(PipelineError::ArtifactInconsistent(format!(
                    "layer {} expects {} inputs, previous layer produces {}",
                    idx, layer.inputs, expected_inputs
                )));
            }
            if layer.bias.len() != layer.outputs {
                return Err(PipelineError::ArtifactInconsistent(format!(
                    "layer {} bias has {} values for {} outputs",
                    idx,
                    layer.bias.len(),
                    layer.outputs
                )));
            }
            let weights = Array2::from_shape_vec((layer.inputs, layer.outputs), layer.weights.clone())
                .map_err(|e| PipelineError::ArtifactInconsistent(format!("layer {} weights: {}", idx, e)))?;

            layers.push(DenseLayer {
                weights,
                bias: Array1::from(layer.bias.clone()),
                activation: layer.activation,
            });
            expected_inputs = layer.outputs;
        }

        if layers.is_empty() || expected_inputs != 1 {
            return Err(PipelineError::ArtifactInconsistent(format!(
                "model must end in a single output, got {} layers ending in width {}",
                layers.len(),
                expected_inputs
            )));
        }

        if !(spec.learning_rate > 0.0 && spec.learning_rate.is_finite()) {
            return Err(PipelineError::ArtifactInconsistent(format!(
                "learning rate must be positive, got {}",
                spec.learning_rate
            )));
        }

        let optimizer = Adam::new(&layers, spec.learning_rate);
        Ok(Self { layers, optimizer })
    }

    pub fn to_spec(&self) -> MlpSpec {
        MlpSpec {
            input_width: self.input_width(),
            learning_rate: self.optimizer.lr(),
            layers: self
                .layers
                .iter()
                .map(|l| LayerSpec {
                    inputs: l.inputs(),
                    outputs: l.outputs(),
                    activation: l.activation,
                    weights: l.weights.iter().copied().collect(),
                    bias: l.bias.to_vec(),
                })
                .collect(),
        }
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    /// One gradient step on a mini-batch; returns the batch MSE
    fn train_batch(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> f64 {
        let n = x.nrows() as f64;

        let mut inputs: Vec<Array2<f64>> = Vec::with_capacity(self.layers.len());
        let mut pre_activations: Vec<Array2<f64>> = Vec::with_capacity(self.layers.len());
        let mut activation = x.to_owned();
        for layer in &self.layers {
            let (z, a) = layer.forward(activation.view());
            inputs.push(activation);
            pre_activations.push(z);
            activation = a;
        }

        let target = y.insert_axis(Axis(1));
        let diff = &activation - &target;
        let loss = diff.mapv(|d| d * d).sum() / n;

        // dL/da for mean squared error
        let mut grad = diff * (2.0 / n);
        let mut grads: Vec<LayerGradients> = Vec::with_capacity(self.layers.len());
        for idx in (0..self.layers.len()).rev() {
            let layer = &self.layers[idx];
            let delta = grad * layer.activation.derivative(&pre_activations[idx]);
            let weights = inputs[idx].t().dot(&delta);
            let bias = delta.sum_axis(Axis(0));
            grad = delta.dot(&layer.weights.t());
            grads.push(LayerGradients { weights, bias });
        }
        grads.reverse();

        self.optimizer.step(&mut self.layers, &grads);
        loss
    }
}

impl Regressor for Mlp {
    fn input_width(&self) -> usize {
        self.layers.first().map(DenseLayer::inputs).unwrap_or(0)
    }

    fn fit_epoch(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        batch_size: usize,
        rng: &mut StdRng,
    ) -> f64 {
        let mut order: Vec<usize> = (0..x.nrows()).collect();
        order.shuffle(rng);

        let mut weighted_loss = 0.0;
        for batch in order.chunks(batch_size.max(1)) {
            let xb = x.select(Axis(0), batch);
            let yb = y.select(Axis(0), batch);
            weighted_loss += self.train_batch(xb.view(), yb.view()) * batch.len() as f64;
        }

        if order.is_empty() {
            0.0
        } else {
            weighted_loss / order.len() as f64
        }
    }

    fn predict(&self, x: ArrayView2<f64>) -> Array1<f64> {
        let mut activation = x.to_owned();
        for layer in &self.layers {
            activation = layer.forward(activation.view()).1;
        }
        activation.column(0).to_owned()
    }

    fn to_artifact(&self) -> ModelArtifact {
        ModelArtifact::Mlp(self.to_spec())
    }
}

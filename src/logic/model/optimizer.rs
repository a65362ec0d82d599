//! Adam optimizer over dense-layer parameters

use ndarray::{Array1, Array2, Zip};

use super::network::{DenseLayer, LayerGradients};

/// Adam (Kingma & Ba) with bias-corrected moment estimates
#[derive(Debug, Clone)]
pub struct Adam {
    lr: f64,
    beta1: f64,
    beta2: f64,
    eps: f64,
    /// Current timestep for bias correction
    t: i32,
    m_w: Vec<Array2<f64>>,
    v_w: Vec<Array2<f64>>,
    m_b: Vec<Array1<f64>>,
    v_b: Vec<Array1<f64>>,
}

impl Adam {
    /// Default: β₁=0.9, β₂=0.999, ε=1e-7
    pub fn new(layers: &[DenseLayer], lr: f64) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-7,
            t: 0,
            m_w: layers.iter().map(|l| Array2::zeros(l.weights.raw_dim())).collect(),
            v_w: layers.iter().map(|l| Array2::zeros(l.weights.raw_dim())).collect(),
            m_b: layers.iter().map(|l| Array1::zeros(l.bias.raw_dim())).collect(),
            v_b: layers.iter().map(|l| Array1::zeros(l.bias.raw_dim())).collect(),
        }
    }

    pub fn lr(&self) -> f64 {
        self.lr
    }

    /// Apply one update; `grads[i]` belongs to `layers[i]`
    pub fn step(&mut self, layers: &mut [DenseLayer], grads: &[LayerGradients]) {
        self.t += 1;
        let bias_correction1 = 1.0 - self.beta1.powi(self.t);
        let bias_correction2 = 1.0 - self.beta2.powi(self.t);
        let (lr, beta1, beta2, eps) = (self.lr, self.beta1, self.beta2, self.eps);

        let update = move |p: &mut f64, m: &mut f64, v: &mut f64, g: &f64| {
            *m = beta1 * *m + (1.0 - beta1) * g;
            *v = beta2 * *v + (1.0 - beta2) * g * g;
            let m_hat = *m / bias_correction1;
            let v_hat = *v / bias_correction2;
            *p -= lr * m_hat / (v_hat.sqrt() + eps);
        };

        for (idx, (layer, grad)) in layers.iter_mut().zip(grads).enumerate() {
            Zip::from(&mut layer.weights)
                .and(&mut self.m_w[idx])
                .and(&mut self.v_w[idx])
                .and(&grad.weights)
                .for_each(update);
            Zip::from(&mut layer.bias)
                .and(&mut self.m_b[idx])
                .and(&mut self.v_b[idx])
                .and(&grad.bias)
                .for_each(update);
        }
    }
}

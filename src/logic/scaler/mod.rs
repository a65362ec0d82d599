//! Robust Scaler - median / interquartile-range affine transform
//!
//! `scaled = (raw - center) / scale` per dimension, with `center` the median
//! and `scale` the 75th minus 25th percentile of the training data.
//! Fit once at training time; inference only ever reuses the persisted state.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::logic::error::{PipelineError, PipelineResult};


/// Lower and upper quantiles (percent) of the scale range
pub const QUANTILE_RANGE: (f64, f64) = (25.0, 75.0);

/// Scales at or below this are treated as degenerate
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

// ============================================================================
// SCALER STATE
// ============================================================================

/// Persisted per-dimension parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    pub center: Vec<f64>,
    /// Never zero: constant dimensions are stored as 1.0 (centering only)
    pub scale: Vec<f64>,
}

impl ScalerState {
    pub fn width(&self) -> usize {
        self.center.len()
    }

    /// Parameters are finite, equal length and scales non-zero
    pub fn is_valid(&self) -> bool {
        !self.center.is_empty()
            && self.center.len() == self.scale.len()
            && self.center.iter().all(|c| c.is_finite())
            && self.scale.iter().all(|s| s.is_finite() && *s > 0.0)
    }

    fn check_width(&self, actual: usize) -> PipelineResult<()> {
        if actual != self.width() {
            return Err(PipelineError::ShapeMismatch { expected: self.width(), actual });
        }
        Ok(())
    }

    pub fn transform(&self, raw: &[f64]) -> PipelineResult<Vec<f64>> {
        self.check_width(raw.len())?;
        Ok(raw
            .iter()
            .zip(self.center.iter().zip(&self.scale))
            .map(|(x, (c, s))| (x - c) / s)
            .collect())
    }

    pub fn inverse_transform(&self, scaled: &[f64]) -> PipelineResult<Vec<f64>> {
        self.check_width(scaled.len())?;
        Ok(scaled
            .iter()
            .zip(self.center.iter().zip(&self.scale))
            .map(|(x, (c, s))| x * s + c)
            .collect())
    }

    /// Row-wise transform of an `(n, width)` matrix
    pub fn transform_matrix(&self, raw: ArrayView2<f64>) -> PipelineResult<Array2<f64>> {
        self.check_width(raw.ncols())?;
        let center = ArrayView1::from(&self.center[..]);
        let scale = ArrayView1::from(&self.scale[..]);
        Ok((&raw - &center) / &scale)
    }

    pub fn inverse_transform_matrix(&self, scaled: ArrayView2<f64>) -> PipelineResult<Array2<f64>> {
        self.check_width(scaled.ncols())?;
        let center = ArrayView1::from(&self.center[..]);
        let scale = ArrayView1::from(&self.scale[..]);
        Ok(&scaled * &scale + &center)
    }

    /// Transform a single column (label scaler)
    pub fn transform_column(&self, raw: ArrayView1<f64>) -> PipelineResult<Array1<f64>> {
        self.check_width(1)?;
        Ok(raw.mapv(|x| (x - self.center[0]) / self.scale[0]))
    }

    pub fn inverse_transform_column(&self, scaled: ArrayView1<f64>) -> PipelineResult<Array1<f64>> {
        self.check_width(1)?;
        Ok(scaled.mapv(|x| x * self.scale[0] + self.center[0]))
    }
}

// ============================================================================
// FITTING
// ============================================================================

pub struct RobustScaler;

impl RobustScaler {
    /// Fit one state per column of `data`
    pub fn fit(data: ArrayView2<f64>) -> PipelineResult<ScalerState> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(PipelineError::InsufficientData(format!(
                "cannot fit scaler on a {}x{} matrix",
                data.nrows(),
                data.ncols()
            )));
        }

        let mut center = Vec::with_capacity(data.ncols());
        let mut scale = Vec::with_capacity(data.ncols());

        for (idx, column) in data.axis_iter(Axis(1)).enumerate() {
            let mut sorted: Vec<f64> = column.to_vec();
            if sorted.iter().any(|v| !v.is_finite()) {
                return Err(PipelineError::InsufficientData(format!(
                    "column {} contains non-finite values",
                    idx
                )));
            }
            sorted.sort_by(|a, b| a.total_cmp(b));

            let median = percentile(&sorted, 50.0);
            let iqr = percentile(&sorted, QUANTILE_RANGE.1) - percentile(&sorted, QUANTILE_RANGE.0);

            if iqr <= MIN_SCALE {
                log::debug!("Scaler column {} is degenerate (IQR = {}), centering only", idx, iqr);
            }

            center.push(median);
            scale.push(if iqr <= MIN_SCALE { 1.0 } else { iqr });
        }

        Ok(ScalerState { center, scale })
    }

    /// Fit a single-column state (label reshaped to a column vector)
    pub fn fit_column(data: ArrayView1<f64>) -> PipelineResult<ScalerState> {
        let column = data.insert_axis(Axis(1));
        Self::fit(column)
    }
}

/// Linear-interpolated percentile of sorted data, `q` in [0, 100]
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = (q / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

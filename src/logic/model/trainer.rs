//! Training loop - partitioning and early stopping

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::Regressor;
use crate::logic::config::TrainingConfig;
use crate::logic::error::{PipelineError, PipelineResult};

// ============================================================================
// PARTITION
// ============================================================================

/// Train / validation / test split of scaled data
#[derive(Debug, Clone)]
pub struct Partition {
    pub x_train: Array2<f64>,
    pub y_train: Array1<f64>,
    pub x_val: Array2<f64>,
    pub y_val: Array1<f64>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<f64>,
}

/// Shuffle rows with the configured seed, hold out the test fraction, then
/// carve validation from the tail of the training rows.
pub fn partition(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    config: &TrainingConfig,
) -> PipelineResult<Partition> {
    let n = x.nrows();
    if n != y.len() {
        return Err(PipelineError::ShapeMismatch { expected: n, actual: y.len() });
    }
    if n < 3 {
        return Err(PipelineError::InsufficientData(format!(
            "need at least 3 rows to split train/validation/test, got {}",
            n
        )));
    }

    let n_test = (n as f64 * config.test_fraction).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    let split_at = (n_train as f64 * (1.0 - config.validation_fraction)).floor() as usize;
    let n_val = n_train - split_at;

    if n_test == 0 || split_at == 0 || n_val == 0 {
        return Err(PipelineError::InsufficientData(format!(
            "{} rows give train={}, validation={}, test={}",
            n, split_at, n_val, n_test
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(config.seed);
    order.shuffle(&mut rng);

    let (train_idx, test_idx) = order.split_at(n_train);
    let (fit_idx, val_idx) = train_idx.split_at(split_at);

    Ok(Partition {
        x_train: x.select(Axis(0), fit_idx),
        y_train: y.select(Axis(0), fit_idx),
        x_val: x.select(Axis(0), val_idx),
        y_val: y.select(Axis(0), val_idx),
        x_test: x.select(Axis(0), test_idx),
        y_test: y.select(Axis(0), test_idx),
    })
}

// ============================================================================
// EARLY STOPPING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Improved,
    Waiting,
    Stop,
}

/// Validation-loss monitor with a patience window
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience: usize,
    best: f64,
    wait: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self { patience, best: f64::INFINITY, wait: 0 }
    }

    pub fn best(&self) -> f64 {
        self.best
    }

    pub fn update(&mut self, val_loss: f64) -> Progress {
        if val_loss < self.best {
            self.best = val_loss;
            self.wait = 0;
            return Progress::Improved;
        }
        self.wait += 1;
        if self.wait >= self.patience {
            Progress::Stop
        } else {
            Progress::Waiting
        }
    }
}

// ============================================================================
// TRAINING
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub train_loss: Vec<f64>,
    pub val_loss: Vec<f64>,
    /// Zero-based epoch whose weights were kept; `None` when no epoch
    /// improved on the initial weights
    pub best_epoch: Option<usize>,
    pub best_val_loss: f64,
    pub stopped_early: bool,
}

impl TrainingHistory {
    pub fn epochs_run(&self) -> usize {
        self.train_loss.len()
    }
}

/// Train until the epoch budget or patience runs out, then restore the
/// best-seen weights.
pub fn fit_with_early_stopping<R: Regressor + Clone>(
    model: &mut R,
    partition: &Partition,
    config: &TrainingConfig,
) -> PipelineResult<TrainingHistory> {
    config.validate()?;
    if partition.x_train.ncols() != model.input_width() {
        return Err(PipelineError::ShapeMismatch {
            expected: model.input_width(),
            actual: partition.x_train.ncols(),
        });
    }

    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    let mut monitor = EarlyStopping::new(config.patience);
    let mut history = TrainingHistory::default();
    let mut best_model = model.clone();

    for epoch in 0..config.max_epochs {
        let train_loss = model.fit_epoch(
            partition.x_train.view(),
            partition.y_train.view(),
            config.batch_size,
            &mut rng,
        );
        let val_loss = model.evaluate(partition.x_val.view(), partition.y_val.view());
        history.train_loss.push(train_loss);
        history.val_loss.push(val_loss);

        log::debug!(
            "Epoch {}/{} - loss: {:.6} - val_loss: {:.6}",
            epoch + 1,
            config.max_epochs,
            train_loss,
            val_loss
        );

        match monitor.update(val_loss) {
            Progress::Improved => {
                best_model = model.clone();
                history.best_epoch = Some(epoch);
            }
            Progress::Waiting => {}
            Progress::Stop => {
                log::info!(
                    "Early stopping at epoch {} (best epoch {:?}, val_loss {:.6})",
                    epoch + 1,
                    history.best_epoch.map(|e| e + 1),
                    monitor.best()
                );
                history.stopped_early = true;
                break;
            }
        }
    }

    history.best_val_loss = monitor.best();
    if history.best_epoch.is_none() {
        log::warn!("Validation loss never improved; keeping the initial weights");
    }
    *model = best_model;
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::ModelArtifact;
    use ndarray::Array1;

    /// Predicts a constant that moves along a scripted path each epoch
    #[derive(Debug, Clone)]
    struct Scripted {
        path: Vec<f64>,
        epoch: usize,
        value: f64,
    }

    impl Regressor for Scripted {
        fn input_width(&self) -> usize {
            1
        }

        fn fit_epoch(&mut self, _x: ArrayView2<f64>, _y: ArrayView1<f64>, _b: usize, _r: &mut StdRng) -> f64 {
            self.value = self.path[self.epoch.min(self.path.len() - 1)];
            self.epoch += 1;
            0.0
        }

        fn predict(&self, x: ArrayView2<f64>) -> Array1<f64> {
            Array1::from_elem(x.nrows(), self.value)
        }

        fn to_artifact(&self) -> ModelArtifact {
            unimplemented!("not persisted")
        }
    }

    fn zero_partition() -> Partition {
        let x = Array2::zeros((10, 1));
        let y = Array1::zeros(10);
        partition(x.view(), y.view(), &TrainingConfig::default()).unwrap()
    }

    #[test]
    fn test_partition_sizes() {
        let x = Array2::from_shape_fn((100, 2), |(i, j)| (i * 2 + j) as f64);
        let y = Array1::from_shape_fn(100, |i| i as f64);
        let p = partition(x.view(), y.view(), &TrainingConfig::default()).unwrap();

        assert_eq!(p.x_test.nrows(), 20);
        assert_eq!(p.x_train.nrows(), 64);
        assert_eq!(p.x_val.nrows(), 16);
        assert_eq!(p.y_train.len(), 64);

        // Rows stay paired with their labels
        for (row, label) in p.x_train.rows().into_iter().zip(p.y_train.iter()) {
            assert_eq!(row[0], label * 2.0);
        }
    }

    #[test]
    fn test_partition_is_deterministic() {
        let x = Array2::from_shape_fn((30, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(30, |i| i as f64);
        let a = partition(x.view(), y.view(), &TrainingConfig::default()).unwrap();
        let b = partition(x.view(), y.view(), &TrainingConfig::default()).unwrap();
        assert_eq!(a.y_test, b.y_test);
    }

    #[test]
    fn test_partition_rejects_tiny_dataset() {
        let x = Array2::zeros((2, 1));
        let y = Array1::zeros(2);
        assert!(matches!(
            partition(x.view(), y.view(), &TrainingConfig::default()),
            Err(PipelineError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_early_stopping_monitor() {
        let mut monitor = EarlyStopping::new(3);
        assert_eq!(monitor.update(1.0), Progress::Improved);
        assert_eq!(monitor.update(1.0), Progress::Waiting);
        assert_eq!(monitor.update(2.0), Progress::Waiting);
        assert_eq!(monitor.update(0.5), Progress::Improved);
        assert_eq!(monitor.update(0.6), Progress::Waiting);
        assert_eq!(monitor.update(0.7), Progress::Waiting);
        assert_eq!(monitor.update(0.8), Progress::Stop);
    }

    #[test]
    fn test_stops_and_restores_best_weights() {
        // Labels are all zero, so val loss = value^2; best at epoch 1 (value 0.1)
        let mut model = Scripted { path: vec![1.0, 0.1, 0.5, 0.6, 0.7, 0.8, 0.9], epoch: 0, value: 5.0 };
        let p = zero_partition();

        let history = fit_with_early_stopping(&mut model, &p, &TrainingConfig::default()).unwrap();

        assert!(history.stopped_early);
        assert_eq!(history.epochs_run(), 5);
        assert_eq!(history.best_epoch, Some(1));
        assert!((history.best_val_loss - 0.01).abs() < 1e-12);
        assert_eq!(model.value, 0.1);
    }

    #[test]
    fn test_runs_full_budget_while_improving() {
        let path: Vec<f64> = (0..20).map(|i| 1.0 / (i + 1) as f64).collect();
        let mut model = Scripted { path, epoch: 0, value: 5.0 };
        let config = TrainingConfig { max_epochs: 6, ..TrainingConfig::default() };

        let history = fit_with_early_stopping(&mut model, &zero_partition(), &config).unwrap();

        assert!(!history.stopped_early);
        assert_eq!(history.epochs_run(), 6);
        assert_eq!(history.best_epoch, Some(5));
    }

    #[test]
    fn test_diverged_run_reports_no_best_epoch() {
        let mut model = Scripted { path: vec![f64::NAN; 10], epoch: 0, value: 5.0 };

        let history = fit_with_early_stopping(&mut model, &zero_partition(), &TrainingConfig::default()).unwrap();

        assert!(history.stopped_early);
        assert_eq!(history.best_epoch, None);
        assert!(history.best_val_loss.is_infinite());
        assert_eq!(history.epochs_run(), 3);
        // Initial weights restored
        assert_eq!(model.value, 5.0);
    }
}

//! Training flow: CSV → fitted scalers → trained model → persisted triplet

use ndarray::{ArrayView2, Axis};
use serde::Serialize;

use crate::logic::artifacts::{ArtifactStore, ArtifactTriplet};
use crate::logic::config::PipelineConfig;
use crate::logic::dataset::load_training_table;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::FeatureSchema;
use crate::logic::model::{clamp_frequency, fit_with_early_stopping, partition, Mlp, Regressor, TrainingHistory};
use crate::logic::scaler::RobustScaler;

/// Sample predictions reported after the post-save check
const SANITY_SAMPLES: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct SamplePrediction {
    pub predicted: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub run_id: String,
    pub feature_names: Vec<String>,
    pub rows: usize,
    pub history: TrainingHistory,
    /// MSE on the held-out partition, scaled space
    pub test_loss: f64,
    pub label_center: f64,
    pub label_scale: f64,
    /// Physical units, predictions clamped
    pub samples: Vec<SamplePrediction>,
}

/// Train the default network
pub fn train(config: &PipelineConfig) -> PipelineResult<TrainingReport> {
    let training = &config.training;
    train_with(config, |width| {
        Mlp::new(width, &training.hidden_layers, training.learning_rate, training.seed)
    })
}

/// Train any regressor built by `build` from the feature count
pub fn train_with<R, F>(config: &PipelineConfig, build: F) -> PipelineResult<TrainingReport>
where
    R: Regressor + Clone,
    F: FnOnce(usize) -> R,
{
    config.training.validate()?;

    log::info!("Loading training data from {}", config.csv_path.display());
    let table = load_training_table(&config.csv_path, &config.label_column)?;
    let schema: FeatureSchema = table.schema.clone();
    if schema.is_empty() {
        return Err(PipelineError::InsufficientData(format!(
            "no feature columns besides '{}'",
            config.label_column
        )));
    }

    log::info!("Columns: {:?}", table.columns);
    log::info!("Feature schema: {} features, layout {:08x}", schema.len(), schema.hash());
    log::debug!("Sample features: {:?}", table.features.slice(ndarray::s![..table.rows().min(5), ..]));
    log::debug!("Sample labels: {:?}", table.labels.slice(ndarray::s![..table.rows().min(5)]));

    let input_scaler = RobustScaler::fit(table.features.view())?;
    let label_scaler = RobustScaler::fit_column(table.labels.view())?;
    let x = input_scaler.transform_matrix(table.features.view())?;
    let y = label_scaler.transform_column(table.labels.view())?;

    let split = partition(x.view(), y.view(), &config.training)?;
    log::info!(
        "Split: train={}, validation={}, test={}",
        split.x_train.nrows(),
        split.x_val.nrows(),
        split.x_test.nrows()
    );
    log_input_range(split.x_train.view());

    let mut model = build(schema.len());
    let history = fit_with_early_stopping(&mut model, &split, &config.training)?;
    log::info!("Training losses: {:?}", history.train_loss);

    let test_loss = model.evaluate(split.x_test.view(), split.y_test.view());
    log::info!("Test loss: {:.6}", test_loss);

    let triplet = ArtifactTriplet::new(schema.clone(), model.to_artifact(), input_scaler, label_scaler);
    let store = ArtifactStore::new(&config.artifact_dir);
    store.save(&triplet)?;

    // Post-save check: predictions go through the label scaler read back from disk
    let reloaded = store.load()?;
    if reloaded.run_id != triplet.run_id {
        return Err(PipelineError::ArtifactInconsistent(format!(
            "reloaded run {} after saving run {}",
            reloaded.run_id, triplet.run_id
        )));
    }
    let label = &reloaded.label_scaler;
    log::info!("Label scaler: center={:?}, scale={:?}", label.center, label.scale);

    let take = SANITY_SAMPLES.min(split.x_test.nrows());
    let x_sample = split.x_test.slice(ndarray::s![..take, ..]);
    let y_sample = split.y_test.slice(ndarray::s![..take]);
    let predicted = label.inverse_transform_column(model.predict(x_sample).view())?;
    let actual = label.inverse_transform_column(y_sample)?;

    let samples: Vec<SamplePrediction> = predicted
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| SamplePrediction { predicted: clamp_frequency(*p), actual: *a })
        .collect();
    for sample in &samples {
        log::info!("Predicted {:.2} MHz, actual {:.2} MHz", sample.predicted, sample.actual);
    }

    Ok(TrainingReport {
        run_id: triplet.run_id,
        feature_names: schema.names().to_vec(),
        rows: table.rows(),
        history,
        test_loss,
        label_center: label.center[0],
        label_scale: label.scale[0],
        samples,
    })
}

/// Surface extreme outliers left after scaling
fn log_input_range(x: ArrayView2<f64>) {
    let min: Vec<f64> = x.fold_axis(Axis(0), f64::INFINITY, |acc, v| acc.min(*v)).to_vec();
    let max: Vec<f64> = x.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, v| acc.max(*v)).to_vec();
    log::debug!("Scaled training input min: {:?}", min);
    log::debug!("Scaled training input max: {:?}", max);
}

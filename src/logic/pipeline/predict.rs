//! Inference flow: live telemetry → clamped frequency estimate

use ndarray::Array2;
use serde::Serialize;

use crate::logic::artifacts::{validate_triplet, ArtifactStore, ArtifactTriplet};
use crate::logic::config::PipelineConfig;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::{FeatureSchema, FeatureSource, FeatureVector};
use crate::logic::model::{clamp_frequency, Regressor};
use crate::logic::telemetry::{read_telemetry, MetricValue, FREQUENCY_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Model output before inverse scaling
    pub scaled: f64,
    /// Inverse-scaled, before clamping
    pub raw: f64,
    /// Reported value, never negative
    pub frequency_mhz: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub run_id: String,
    pub prediction: Prediction,
    /// Directly observed value, for human comparison only
    pub observed_frequency: Option<MetricValue>,
}

/// Loaded triplet ready to answer predictions
pub struct Predictor {
    triplet: ArtifactTriplet,
    model: Box<dyn Regressor>,
}

impl Predictor {
    /// Refuses a triplet whose training schema differs from `declared`
    pub fn new(triplet: ArtifactTriplet, declared: &FeatureSchema) -> PipelineResult<Self> {
        validate_triplet(&triplet)?;
        declared.ensure_matches(&triplet.schema)?;
        let model = triplet.model.build()?;
        Ok(Self { triplet, model })
    }

    pub fn load(store: &ArtifactStore, declared: &FeatureSchema) -> PipelineResult<Self> {
        Self::new(store.load()?, declared)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.triplet.schema
    }

    pub fn run_id(&self) -> &str {
        &self.triplet.run_id
    }

    pub fn predict_record<S: FeatureSource + ?Sized>(&self, source: &S) -> PipelineResult<Prediction> {
        let vector = self.schema().project(source)?;
        self.predict_vector(&vector)
    }

    pub fn predict_vector(&self, vector: &FeatureVector) -> PipelineResult<Prediction> {
        if vector.layout_hash != self.schema().hash() {
            return Err(PipelineError::ArtifactInconsistent(format!(
                "feature vector layout {:08x} does not match model layout {:08x}",
                vector.layout_hash,
                self.schema().hash()
            )));
        }

        let scaled_input = self.triplet.input_scaler.transform(vector.as_slice())?;
        log::debug!("Scaled input: {:?}", scaled_input);

        let batch = Array2::from_shape_vec((1, scaled_input.len()), scaled_input)
            .map_err(|_| PipelineError::ShapeMismatch { expected: self.schema().len(), actual: vector.len() })?;
        let scaled = self.model.predict(batch.view())[0];
        if !scaled.is_finite() {
            return Err(PipelineError::NonFiniteOutput { stage: "model", value: scaled });
        }

        let raw = self.triplet.label_scaler.inverse_transform(&[scaled])?[0];
        if !raw.is_finite() {
            return Err(PipelineError::NonFiniteOutput { stage: "inverse-scaled", value: raw });
        }
        Ok(Prediction { scaled, raw, frequency_mhz: clamp_frequency(raw) })
    }
}

/// One prediction cycle over the current telemetry
pub fn predict(config: &PipelineConfig) -> PipelineResult<PredictionReport> {
    let record = read_telemetry(&config.telemetry_path)?;
    log::debug!("Telemetry: {:?}", record);

    let declared = FeatureSchema::telemetry();
    let vector = declared.project(&record)?;
    log::debug!("Input before scaling: {}", vector.to_log_entry(&declared));

    let predictor = Predictor::load(&ArtifactStore::new(&config.artifact_dir), &declared)?;
    let prediction = predictor.predict_vector(&vector)?;

    let observed_frequency = record.get(FREQUENCY_KEY).cloned();
    log::info!("Predicted CPU frequency: {:.2} MHz", prediction.frequency_mhz);
    match &observed_frequency {
        Some(value) => log::info!("Observed CPU frequency: {} MHz", value),
        None => log::info!("Observed CPU frequency: not available"),
    }

    Ok(PredictionReport {
        run_id: predictor.run_id().to_string(),
        prediction,
        observed_frequency,
    })
}

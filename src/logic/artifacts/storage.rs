use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::{ArtifactEnvelope, ArtifactKind, ArtifactTriplet};
use super::validate::{payload_checksum, validate_envelope, validate_same_run, validate_triplet};
use crate::constants::{ARTIFACT_FORMAT_VERSION, MODEL_FILE, SCALER_X_FILE, SCALER_Y_FILE};
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::model::ModelArtifact;
use crate::logic::scaler::ScalerState;

/// Model and both scalers under one directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn input_scaler_path(&self) -> PathBuf {
        self.dir.join(SCALER_X_FILE)
    }

    pub fn label_scaler_path(&self) -> PathBuf {
        self.dir.join(SCALER_Y_FILE)
    }

    /// Persist the triplet; overwrites a previous run
    pub fn save(&self, triplet: &ArtifactTriplet) -> PipelineResult<()> {
        validate_triplet(triplet)?;
        fs::create_dir_all(&self.dir)?;

        self.write_envelope(&self.model_path(), ArtifactKind::Model, triplet, &triplet.model)?;
        self.write_envelope(&self.input_scaler_path(), ArtifactKind::InputScaler, triplet, &triplet.input_scaler)?;
        self.write_envelope(&self.label_scaler_path(), ArtifactKind::LabelScaler, triplet, &triplet.label_scaler)?;

        log::info!(
            "Saved artifacts for run {} to {} (layout {:08x})",
            triplet.run_id,
            self.dir.display(),
            triplet.schema.hash()
        );
        Ok(())
    }

    /// Load a complete, mutually consistent triplet or fail
    pub fn load(&self) -> PipelineResult<ArtifactTriplet> {
        let model: ArtifactEnvelope<ModelArtifact> = read_envelope(&self.model_path())?;
        let input: ArtifactEnvelope<ScalerState> = read_envelope(&self.input_scaler_path())?;
        let label: ArtifactEnvelope<ScalerState> = read_envelope(&self.label_scaler_path())?;

        validate_envelope(&model, ArtifactKind::Model)?;
        validate_envelope(&input, ArtifactKind::InputScaler)?;
        validate_envelope(&label, ArtifactKind::LabelScaler)?;
        validate_same_run(&model, &input, &label)?;

        let triplet = ArtifactTriplet {
            run_id: model.run_id,
            created_at: model.created_at,
            schema: model.layout.schema(),
            model: model.payload,
            input_scaler: input.payload,
            label_scaler: label.payload,
        };
        validate_triplet(&triplet)?;

        log::debug!("Loaded artifacts for run {} from {}", triplet.run_id, self.dir.display());
        Ok(triplet)
    }

    /// Write to a temporary sibling, then rename into place
    fn write_envelope<T: Serialize>(
        &self,
        path: &Path,
        kind: ArtifactKind,
        triplet: &ArtifactTriplet,
        payload: &T,
    ) -> PipelineResult<()> {
        let envelope = ArtifactEnvelope {
            format_version: ARTIFACT_FORMAT_VERSION,
            kind,
            run_id: triplet.run_id.clone(),
            created_at: triplet.created_at,
            layout: triplet.schema.info(),
            checksum: payload_checksum(payload)?,
            payload,
        };

        let json = serde_json::to_vec_pretty(&envelope)?;
        let tmp = path.with_extension(format!("json.tmp-{}", triplet.run_id));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn read_envelope<T: DeserializeOwned>(path: &Path) -> PipelineResult<ArtifactEnvelope<T>> {
    let data = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PipelineError::ArtifactNotFound(path.to_path_buf()),
        _ => PipelineError::Io(e),
    })?;

    serde_json::from_slice(&data).map_err(|e| {
        PipelineError::ArtifactInconsistent(format!("{}: {}", path.display(), e))
    })
}

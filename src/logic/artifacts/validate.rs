use super::types::{ArtifactEnvelope, ArtifactKind, ArtifactTriplet};
use crate::constants::ARTIFACT_FORMAT_VERSION;
use crate::logic::error::{PipelineError, PipelineResult};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 (hex) of a payload's JSON form
pub fn payload_checksum<T: Serialize>(payload: &T) -> PipelineResult<String> {
    let bytes = serde_json::to_vec(payload)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Validate a single envelope: version, kind, layout and checksum
pub fn validate_envelope<T: Serialize>(
    envelope: &ArtifactEnvelope<T>,
    expected_kind: ArtifactKind,
) -> PipelineResult<()> {
    if envelope.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(PipelineError::ArtifactInconsistent(format!(
            "{:?}: format version {} (expected {})",
            expected_kind, envelope.format_version, ARTIFACT_FORMAT_VERSION
        )));
    }
    if envelope.kind != expected_kind {
        return Err(PipelineError::ArtifactInconsistent(format!(
            "expected {:?} artifact, found {:?}",
            expected_kind, envelope.kind
        )));
    }
    if !envelope.layout.is_self_consistent() {
        return Err(PipelineError::ArtifactInconsistent(format!(
            "{:?}: recorded layout hash/count do not match its feature names",
            expected_kind
        )));
    }
    let checksum = payload_checksum(&envelope.payload)?;
    if checksum != envelope.checksum {
        return Err(PipelineError::ArtifactInconsistent(format!(
            "{:?}: checksum mismatch (stored {}, computed {})",
            expected_kind, envelope.checksum, checksum
        )));
    }
    Ok(())
}

/// All three envelopes come from the same run and agree on the layout
pub fn validate_same_run<A, B, C>(
    model: &ArtifactEnvelope<A>,
    input: &ArtifactEnvelope<B>,
    label: &ArtifactEnvelope<C>,
) -> PipelineResult<()> {
    if model.run_id != input.run_id || model.run_id != label.run_id {
        return Err(PipelineError::ArtifactInconsistent(format!(
            "artifacts from different training runs: model {}, input scaler {}, label scaler {}",
            model.run_id, input.run_id, label.run_id
        )));
    }
    if model.layout != input.layout || model.layout != label.layout {
        return Err(PipelineError::ArtifactInconsistent(
            "artifacts disagree on the feature layout".to_string(),
        ));
    }
    Ok(())
}

/// Widths of model, scalers and schema line up
pub fn validate_triplet(triplet: &ArtifactTriplet) -> PipelineResult<()> {
    let width = triplet.schema.len();

    if width == 0 {
        return Err(PipelineError::ArtifactInconsistent("empty feature schema".to_string()));
    }
    if !triplet.input_scaler.is_valid() || !triplet.label_scaler.is_valid() {
        return Err(PipelineError::ArtifactInconsistent(
            "scaler parameters must be finite with non-zero scale".to_string(),
        ));
    }
    if triplet.input_scaler.width() != width {
        return Err(PipelineError::ArtifactInconsistent(format!(
            "input scaler has {} dimensions, schema has {} features",
            triplet.input_scaler.width(),
            width
        )));
    }
    if triplet.label_scaler.width() != 1 {
        return Err(PipelineError::ArtifactInconsistent(format!(
            "label scaler has {} dimensions, expected 1",
            triplet.label_scaler.width()
        )));
    }
    if triplet.model.input_width() != width {
        return Err(PipelineError::ArtifactInconsistent(format!(
            "model expects {} inputs, schema has {} features",
            triplet.model.input_width(),
            width
        )));
    }
    if triplet.model.output_width() != 1 {
        return Err(PipelineError::ArtifactInconsistent(format!(
            "model has {} outputs, expected 1",
            triplet.model.output_width()
        )));
    }
    Ok(())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureSchema, LayoutInfo};
use crate::logic::model::ModelArtifact;
use crate::logic::scaler::ScalerState;

// ============================================================================
// ARTIFACT KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Model,
    InputScaler,
    LabelScaler,
}

// ============================================================================
// VERSIONED ENVELOPE
// ============================================================================

/// On-disk form of every artifact file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEnvelope<T> {
    pub format_version: u32,
    pub kind: ArtifactKind,
    /// Shared by the three files of one training run
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    /// Training-time feature schema
    pub layout: LayoutInfo,
    /// SHA-256 (hex) of the serialized payload
    pub checksum: String,
    pub payload: T,
}

// ============================================================================
// ARTIFACT TRIPLET
// ============================================================================

/// Model plus both scalers from one training run
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactTriplet {
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    pub schema: FeatureSchema,
    pub model: ModelArtifact,
    pub input_scaler: ScalerState,
    pub label_scaler: ScalerState,
}

impl ArtifactTriplet {
    /// Bundle the outputs of a fresh training run under a new run id
    pub fn new(
        schema: FeatureSchema,
        model: ModelArtifact,
        input_scaler: ScalerState,
        label_scaler: ScalerState,
    ) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            schema,
            model,
            input_scaler,
            label_scaler,
        }
    }
}

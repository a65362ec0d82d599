//! Artifact Store - versioned persistence of the model/scaler triplet
//!
//! Each of the three files carries the format version, run id, training
//! feature layout and a payload checksum, so a triplet mixed from different
//! runs (or a corrupted file) is rejected as `ArtifactInconsistent` instead
//! of surfacing as a silent shape mismatch.

pub mod types;
pub mod validate;
pub mod storage;

#[cfg(test)]
mod tests;

pub use types::{ArtifactEnvelope, ArtifactKind, ArtifactTriplet};
pub use storage::ArtifactStore;
pub use validate::validate_triplet;

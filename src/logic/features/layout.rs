//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema**
//!
//! ## Rules (never break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The schema used to fit the scalers is persisted with every artifact and
//! compared against [`FeatureSchema::telemetry`] before any prediction.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::logic::error::{PipelineError, PipelineResult};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const TELEMETRY_LAYOUT: &[&str] = &[
    // === CPU time (0-2) ===
    "CPU User",
    "CPU System",
    "CPU Idle",

    // === Memory (3-6) ===
    "Memory Total",
    "Memory Free",
    "Swap Total",
    "Swap Free",

    // === I/O counters (7-10) ===
    "Disk Read",
    "Disk Write",
    "Network RX",
    "Network TX",

    // === Load averages (11-13) ===
    "Load 1min",
    "Load 5min",
    "Load 15min",

    // === Thermal (14) ===
    "CPU Temperature",
];

/// Total number of declared features
/// Must match TELEMETRY_LAYOUT.len()
pub const FEATURE_COUNT: usize = 15;

// ============================================================================
// FEATURE SCHEMA
// ============================================================================

/// Ordered list of feature names defining vector layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { names: names.into_iter().map(Into::into).collect() }
    }

    /// The declared inference-time schema
    pub fn telemetry() -> Self {
        Self::new(TELEMETRY_LAYOUT.iter().copied())
    }

    /// Training-time schema: every column except the label, in table order
    pub fn from_columns(columns: &[String], label: &str) -> Self {
        Self::new(columns.iter().filter(|c| c.as_str() != label).cloned())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Get feature index by name (O(n) but features are few)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// CRC32 over version and ordered names
    pub fn hash(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&[FEATURE_VERSION]);
        for name in &self.names {
            hasher.update(name.as_bytes());
            hasher.update(&[0]); // Separator
        }
        hasher.finalize()
    }

    pub fn info(&self) -> LayoutInfo {
        LayoutInfo {
            version: FEATURE_VERSION,
            hash: self.hash(),
            feature_count: self.len(),
            feature_names: self.names.clone(),
        }
    }

    /// Fail with `SchemaMismatch` unless `other` has the same names in the same order
    pub fn ensure_matches(&self, other: &FeatureSchema) -> PipelineResult<()> {
        if self != other {
            return Err(PipelineError::SchemaMismatch {
                expected: self.names.clone(),
                found: other.names.clone(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Serializable layout description stored with every artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn schema(&self) -> FeatureSchema {
        FeatureSchema::new(self.feature_names.iter().cloned())
    }

    /// Recorded version, hash and count agree with the recorded names
    pub fn is_self_consistent(&self) -> bool {
        let schema = self.schema();
        self.version == FEATURE_VERSION
            && self.feature_count == schema.len()
            && self.hash == schema.hash()
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Features Module - Feature Schema Engine
//!
//! The ordered feature schema is the contract between training and
//! inference. `layout.rs` declares it, `vector.rs` projects records through it.

pub mod layout;
pub mod vector;


// Re-export common types
pub use layout::{FeatureSchema, LayoutInfo, FEATURE_COUNT, FEATURE_VERSION, TELEMETRY_LAYOUT};
pub use vector::{FeatureSource, FeatureVector};

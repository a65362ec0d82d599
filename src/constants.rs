//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment variables override these at startup through
//! [`crate::logic::config::PipelineConfig::from_env`].

use std::path::PathBuf;

/// Default telemetry pseudo-file exposed by the kernel module
pub const DEFAULT_TELEMETRY_PATH: &str = "/proc/read_system_data";

/// Default training CSV
pub const DEFAULT_CSV_PATH: &str = "./system_data_all.csv";

/// Label column in the training CSV
pub const LABEL_COLUMN: &str = "CPU Frequency";

/// Artifact file names
pub const MODEL_FILE: &str = "model.json";
pub const SCALER_X_FILE: &str = "scaler_x.json";
pub const SCALER_Y_FILE: &str = "scaler_y.json";

/// Artifact envelope format version
/// MUST be incremented when the on-disk layout changes
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Training defaults
pub const DEFAULT_HIDDEN_LAYERS: [usize; 2] = [64, 32];
pub const DEFAULT_LEARNING_RATE: f64 = 0.001;
pub const DEFAULT_MAX_EPOCHS: usize = 15;
pub const DEFAULT_BATCH_SIZE: usize = 16;
pub const DEFAULT_PATIENCE: usize = 3;
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
pub const DEFAULT_VALIDATION_FRACTION: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// Collection defaults
pub const DEFAULT_COLLECT_SAMPLES: usize = 10_000;
pub const DEFAULT_COLLECT_INTERVAL_SECS: u64 = 1;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "cpufreq-predictor";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Default artifact directory under the user's local data dir
pub fn default_artifact_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("artifacts")
}

/// Read a path from environment or use default
pub fn env_path(key: &str, default: impl Into<PathBuf>) -> PathBuf {
    std::env::var_os(key)
        .map(PathBuf::from)
        .unwrap_or_else(|| default.into())
}

/// Read a parseable value from environment or use default
pub fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

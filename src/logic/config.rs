//! Pipeline Configuration
//!
//! Explicit configuration passed into every flow. No process-wide toggles:
//! binaries build one `PipelineConfig` at startup and hand it down.

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{self, env_parse, env_path};
use super::error::{PipelineError, PipelineResult};

// ============================================================================
// TRAINING
// ============================================================================

/// Hyperparameters for one training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub hidden_layers: Vec<usize>,
    pub learning_rate: f64,
    pub max_epochs: usize,
    pub batch_size: usize,
    /// Epochs without validation improvement before stopping
    pub patience: usize,
    pub test_fraction: f64,
    /// Carved from the tail of the training partition
    pub validation_fraction: f64,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            hidden_layers: constants::DEFAULT_HIDDEN_LAYERS.to_vec(),
            learning_rate: constants::DEFAULT_LEARNING_RATE,
            max_epochs: constants::DEFAULT_MAX_EPOCHS,
            batch_size: constants::DEFAULT_BATCH_SIZE,
            patience: constants::DEFAULT_PATIENCE,
            test_fraction: constants::DEFAULT_TEST_FRACTION,
            validation_fraction: constants::DEFAULT_VALIDATION_FRACTION,
            seed: constants::DEFAULT_SEED,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> PipelineResult<()> {
        if self.max_epochs == 0 {
            return Err(PipelineError::InvalidConfig("max_epochs must be > 0".into()));
        }
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidConfig("batch_size must be > 0".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(PipelineError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        for (name, fraction) in [
            ("test_fraction", self.test_fraction),
            ("validation_fraction", self.validation_fraction),
        ] {
            if !(fraction > 0.0 && fraction < 1.0) {
                return Err(PipelineError::InvalidConfig(format!(
                    "{} must be in (0, 1), got {}",
                    name, fraction
                )));
            }
        }
        if self.hidden_layers.iter().any(|&w| w == 0) {
            return Err(PipelineError::InvalidConfig("hidden layer width must be > 0".into()));
        }
        Ok(())
    }
}

// ============================================================================
// COLLECTION
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CollectConfig {
    pub samples: usize,
    pub interval: Duration,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            samples: constants::DEFAULT_COLLECT_SAMPLES,
            interval: Duration::from_secs(constants::DEFAULT_COLLECT_INTERVAL_SECS),
        }
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Paths and settings shared by the train, predict and collect flows
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub csv_path: PathBuf,
    pub telemetry_path: PathBuf,
    pub artifact_dir: PathBuf,
    pub label_column: String,
    pub training: TrainingConfig,
    pub collect: CollectConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(constants::DEFAULT_CSV_PATH),
            telemetry_path: PathBuf::from(constants::DEFAULT_TELEMETRY_PATH),
            artifact_dir: constants::default_artifact_dir(),
            label_column: constants::LABEL_COLUMN.to_string(),
            training: TrainingConfig::default(),
            collect: CollectConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let training = TrainingConfig {
            learning_rate: env_parse("CPUFREQ_LEARNING_RATE", defaults.training.learning_rate),
            max_epochs: env_parse("CPUFREQ_MAX_EPOCHS", defaults.training.max_epochs),
            patience: env_parse("CPUFREQ_PATIENCE", defaults.training.patience),
            seed: env_parse("CPUFREQ_SEED", defaults.training.seed),
            ..defaults.training
        };

        let collect = CollectConfig {
            samples: env_parse("CPUFREQ_COLLECT_SAMPLES", defaults.collect.samples),
            interval: Duration::from_secs(env_parse(
                "CPUFREQ_COLLECT_INTERVAL_SECS",
                defaults.collect.interval.as_secs(),
            )),
        };

        Self {
            csv_path: env_path("CPUFREQ_CSV_PATH", defaults.csv_path),
            telemetry_path: env_path("CPUFREQ_TELEMETRY_PATH", defaults.telemetry_path),
            artifact_dir: env_path("CPUFREQ_ARTIFACT_DIR", defaults.artifact_dir),
            label_column: defaults.label_column,
            training,
            collect,
        }
    }

    /// Config rooted in a single directory (used by tests and tooling)
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            csv_path: dir.join("system_data_all.csv"),
            telemetry_path: dir.join("read_system_data"),
            artifact_dir: dir.join("artifacts"),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_training_config_is_valid() {
        let config = TrainingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hidden_layers, vec![64, 32]);
        assert_eq!(config.patience, 3);
        assert_eq!(config.max_epochs, 15);
    }

    #[test]
    fn test_reject_bad_fractions() {
        let config = TrainingConfig { test_fraction: 1.0, ..TrainingConfig::default() };
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));

        let config = TrainingConfig { validation_fraction: 0.0, ..TrainingConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_zero_epochs_and_batch() {
        let config = TrainingConfig { max_epochs: 0, ..TrainingConfig::default() };
        assert!(config.validate().is_err());

        let config = TrainingConfig { batch_size: 0, ..TrainingConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_in_dir_paths() {
        let config = PipelineConfig::in_dir("/tmp/run");
        assert_eq!(config.artifact_dir, PathBuf::from("/tmp/run/artifacts"));
        assert_eq!(config.label_column, "CPU Frequency");
    }
}

//! Collection flow: sample telemetry into the training CSV

use std::thread;

use crate::logic::config::PipelineConfig;
use crate::logic::dataset::{DatasetRecord, DatasetWriter};
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::telemetry::read_telemetry;

/// Append `config.collect.samples` rows; returns rows written
pub fn collect(config: &PipelineConfig) -> PipelineResult<usize> {
    let settings = &config.collect;
    let mut writer = DatasetWriter::open(&config.csv_path)?;

    for i in 0..settings.samples {
        let record = read_telemetry(&config.telemetry_path)?;

        match DatasetRecord::from_source(&record) {
            Ok(row) => {
                writer.append(&row)?;
                log::debug!("Collected sample {}/{}", i + 1, settings.samples);
            }
            Err(e @ PipelineError::MissingFeature(_)) | Err(e @ PipelineError::NonNumericValue { .. }) => {
                log::warn!("Skipping sample {}: {}", i + 1, e);
            }
            Err(e) => return Err(e),
        }

        if i + 1 < settings.samples && !settings.interval.is_zero() {
            thread::sleep(settings.interval);
        }
    }

    log::info!(
        "Collected {} samples into {}",
        writer.rows_written(),
        writer.path().display()
    );
    Ok(writer.rows_written())
}

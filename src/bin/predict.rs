//! Run one prediction cycle over the current telemetry

use cpufreq_predictor::constants::APP_VERSION;
use cpufreq_predictor::{predict, PipelineConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting cpufreq-predictor predict v{}", APP_VERSION);

    let config = PipelineConfig::from_env();

    match predict(&config) {
        Ok(report) => println!("{:.2} MHz", report.prediction.frequency_mhz),
        Err(e) => {
            if e.is_retryable() {
                log::warn!("Prediction skipped: {}", e);
            } else {
                log::error!("Prediction failed: {}", e);
            }
            std::process::exit(e.exit_code());
        }
    }
}

//! Sample telemetry into the training CSV

use cpufreq_predictor::constants::APP_VERSION;
use cpufreq_predictor::{collect, PipelineConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting cpufreq-predictor collect v{}", APP_VERSION);

    let config = PipelineConfig::from_env();
    log::info!(
        "Collecting {} samples every {:?} from {}",
        config.collect.samples,
        config.collect.interval,
        config.telemetry_path.display()
    );

    if let Err(e) = collect(&config) {
        log::error!("Collection stopped: {}", e);
        std::process::exit(e.exit_code());
    }
}

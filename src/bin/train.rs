//! Train the frequency model from the collected CSV

use cpufreq_predictor::constants::APP_VERSION;
use cpufreq_predictor::{train, PipelineConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting cpufreq-predictor train v{}", APP_VERSION);

    let config = PipelineConfig::from_env();
    log::debug!("Config: {:?}", config);

    match train(&config) {
        Ok(report) => {
            let best = report
                .history
                .best_epoch
                .map_or_else(|| "none".to_string(), |e| (e + 1).to_string());
            log::info!(
                "Run {} trained on {} rows in {} epochs (best epoch {}), test loss {:.6}",
                report.run_id,
                report.rows,
                report.history.epochs_run(),
                best,
                report.test_loss
            );
            log::info!("Artifacts saved to {}", config.artifact_dir.display());
        }
        Err(e) => {
            log::error!("Training failed: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

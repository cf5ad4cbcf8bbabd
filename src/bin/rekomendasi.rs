use anyhow::Result;
use prediksi_rust::{config, logging, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let log_level = logging::resolve_log_level(&config.logs.level);
    if let Err(e) = logging::init(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    info!(
        "Starting recommendation service with log level: {}",
        log_level
    );
    info!(
        "Training on dataset: {}",
        config.recommendation.dataset_path.display()
    );

    server::run_recommendation(config).await?;

    Ok(())
}

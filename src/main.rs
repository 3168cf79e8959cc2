//! Reservation engine entry point.
//!
//! Reads configuration from a TOML file (~/.config/reserva/config.toml by
//! default, overridable via RESERVA_CONFIG).

use reserva::config::AppConfig;
use reserva::{default_config_path, server};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("RESERVA_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());

    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!(path = %config_path.display(), "Configuration loaded");
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!(error = %e, "Config unusable, falling back to defaults");
            AppConfig::default()
        }
    };

    info!("Starting Reserva reservation engine...");
    server::run(config).await
}

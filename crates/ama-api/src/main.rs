//! AMA server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p ama-api --bin ama-server
//! ```
//!
//! Configuration is loaded from the TOML file named by `AMA_CONFIG_FILE`,
//! or from environment variables otherwise.

use ama_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.server.address(),
        storage = ?config.storage.backend,
        "Configuration loaded"
    );

    if let Err(e) = ama_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

fn load_config() -> Result<AppConfig, ama_common::ConfigError> {
    match std::env::var("AMA_CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path),
        Err(_) => AppConfig::from_env(),
    }
}

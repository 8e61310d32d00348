mod app;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::{prelude::*, EnvFilter};

use estoque_core::{
    config::{self, AppConfig},
    inventory::Inventory,
};

fn main() -> Result<()> {
    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config)?;

    let inventory = Inventory::new(config.zero_policy());
    let mut app = app::EstoqueApp::new(config, inventory);
    app.run()
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let log_path = match &config.log_file {
        Some(path) => path.clone(),
        None => default_log_path()?,
    };
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let env_filter = EnvFilter::from_default_env();

    // The terminal runs in raw mode, so logs go to a file only.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}

fn default_log_path() -> Result<PathBuf> {
    Ok(std::env::current_dir()?.join("logs").join("estoque.log"))
}

use crate::config::AppConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. Events go to the log file so they never
/// draw over the terminal UI; `RUST_LOG` takes precedence over `--debug`.
pub fn init_logging(config: &AppConfig) -> Result<()> {
    if let Some(parent) = config.log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .wrap_err_with(|| format!("Failed to open log file {}", config.log_file.display()))?;

    let default_level = if config.debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("geomapval={default_level},warn")));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to install tracing subscriber: {e}"))?;

    tracing::info!(api_url = %config.api_url, "logging initialised");
    Ok(())
}

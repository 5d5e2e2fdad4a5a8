use color_eyre::eyre::{eyre, WrapErr};
use dotenv::dotenv;
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: Url,
    pub timeout: Duration,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    pub debug: bool,
}

/// Initializes the application configuration
pub fn init_app_config() -> color_eyre::eyre::Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    let raw_url = env::var("GEOMAPVAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let api_url = parse_api_url(&raw_url)?;

    let timeout = match env::var("GEOMAPVAL_TIMEOUT_SECS") {
        Ok(value) => Duration::from_secs(
            value
                .trim()
                .parse()
                .wrap_err_with(|| format!("GEOMAPVAL_TIMEOUT_SECS is not a number: {value}"))?,
        ),
        Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    };

    let export_dir =
        env::var("GEOMAPVAL_EXPORT_DIR").map_or_else(|_| PathBuf::from("./exports"), PathBuf::from);
    let log_file =
        env::var("GEOMAPVAL_LOG_FILE").map_or_else(|_| PathBuf::from("geomapval.log"), PathBuf::from);
    let debug = env::var("DEBUG").is_ok_and(|value| !value.is_empty() && value != "0");

    Ok(AppConfig {
        api_url,
        timeout,
        export_dir,
        log_file,
        debug,
    })
}

/// Parses the backend base URL. A trailing slash is added so endpoint paths
/// join under it.
pub fn parse_api_url(raw: &str) -> color_eyre::eyre::Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(eyre!("API URL is empty"));
    }

    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&with_slash).wrap_err_with(|| format!("Invalid API URL: {trimmed}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(eyre!("API URL must use http or https: {trimmed}"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_gets_a_trailing_slash() -> color_eyre::eyre::Result<()> {
        let url = parse_api_url("http://localhost:5000")?;
        assert_eq!(url.as_str(), "http://localhost:5000/");
        Ok(())
    }

    #[test]
    fn api_url_rejects_other_schemes_and_blanks() {
        assert!(parse_api_url("ftp://localhost").is_err());
        assert!(parse_api_url("   ").is_err());
        assert!(parse_api_url("not a url").is_err());
    }
}

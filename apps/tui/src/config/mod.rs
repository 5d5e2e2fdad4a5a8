// Config module for geomapval
// Environment-driven settings, optionally loaded from a .env file

pub mod settings;

pub use settings::{init_app_config, AppConfig};

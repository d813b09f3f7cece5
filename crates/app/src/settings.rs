//! Runtime configuration. Values come from an optional `settings.toml`
//! next to the binary, overridden by `COLLETTA_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the year documents.
    pub data_dir: String,
    pub bind: String,
    pub port: u16,
    pub admin_password: String,
    /// Log level fed to the env filter.
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            bind: "127.0.0.1".to_string(),
            port: 3000,
            admin_password: "admin123".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("COLLETTA"))
            .build()?;

        settings.try_deserialize()
    }
}

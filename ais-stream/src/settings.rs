use crate::error::{
    Result,
    error::{MissingSettingSnafu, SettingsSnafu},
};
use config::{Config, File};
use serde::Deserialize;
use snafu::{OptionExt, ResultExt};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "config/ais-stream.yml";
pub const ENV_PREFIX: &str = "AIS_STREAM";

#[derive(Deserialize)]
pub struct Settings {
    /// Only required when streaming.
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_endpoint() -> String {
    "wss://stream.aisstream.io/v0/stream".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Layers `config_file` (or [DEFAULT_CONFIG_FILE] when present) under environment
    /// variables such as `AIS_STREAM_API_KEY`.
    pub fn new(config_file: Option<&Path>) -> Result<Settings> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context(SettingsSnafu)?
            .try_deserialize()
            .context(SettingsSnafu)
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .context(MissingSettingSnafu { key: "api_key" })
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("log_level", &self.log_level)
            .finish()
    }
}

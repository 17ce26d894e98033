//! Client configuration: an optional RON file, then command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use compressor_engine::ServiceSettings;
use engine_logging::engine_info;
use serde::Deserialize;

use super::cli::Cli;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub download_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_ms: 600_000,
            connect_timeout_ms: 10_000,
            download_dir: PathBuf::from("./compressed"),
            log_file: PathBuf::from("./compressor.log"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid server url {url:?}: {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },
}

/// Load the config file if one was given; defaults otherwise.
pub fn load(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(ClientConfig::default());
    };
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    engine_info!("Loaded config from {:?}", path);
    Ok(config)
}

fn parse(content: &str) -> Result<ClientConfig, ron::error::SpannedError> {
    ron::from_str(content)
}

impl ClientConfig {
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(server) = &cli.server {
            self.base_url = server.clone();
        }
        if let Some(dir) = &cli.download_dir {
            self.download_dir = dir.clone();
        }
        self
    }

    pub fn service_settings(&self) -> Result<ServiceSettings, ConfigError> {
        let mut settings =
            ServiceSettings::with_base_url(&self.base_url).map_err(|source| ConfigError::Url {
                url: self.base_url.clone(),
                source,
            })?;
        settings.request_timeout = Duration::from_millis(self.request_timeout_ms);
        settings.connect_timeout = Duration::from_millis(self.connect_timeout_ms);
        Ok(settings)
    }
}

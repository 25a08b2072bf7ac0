use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::feed::SPACEX_API_URL;

const CONFIG_FILE: &str = "launch-registry.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub targets_file: Option<String>,
    #[serde(default)]
    pub feed_url: Option<String>,
    #[serde(default)]
    pub feed_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub data_dir: Utf8PathBuf,
    pub targets_file: Utf8PathBuf,
    pub feed_url: String,
    pub feed_timeout: Duration,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolves the effective configuration. An explicit path must exist;
    /// with no path, `launch-registry.json` in the working directory is
    /// used when present, built-in defaults otherwise.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, RegistryError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Self::resolve_config(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| RegistryError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| RegistryError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, RegistryError> {
        let data_dir = match config.data_dir {
            Some(dir) => Utf8PathBuf::from(dir),
            None => default_data_dir()?,
        };
        let targets_file = match config.targets_file {
            Some(path) => Utf8PathBuf::from(path),
            None => data_dir.join("targets.json"),
        };

        Ok(ResolvedConfig {
            targets_file,
            data_dir,
            feed_url: config
                .feed_url
                .unwrap_or_else(|| SPACEX_API_URL.to_string()),
            feed_timeout: Duration::from_secs(config.feed_timeout_secs.unwrap_or(30)),
        })
    }
}

fn default_data_dir() -> Result<Utf8PathBuf, RegistryError> {
    BaseDirs::new()
        .and_then(|dirs| {
            Utf8PathBuf::from_path_buf(
                dirs.home_dir()
                    .join(".local")
                    .join("share")
                    .join("launch-registry"),
            )
            .ok()
        })
        .ok_or_else(|| RegistryError::Filesystem("unable to resolve data directory".to_string()))
}

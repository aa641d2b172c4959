//! # configs
//!
//! Layered settings: built-in defaults, then an optional `swish.toml`, then
//! `SWISH__<SECTION>__<KEY>` environment variables (after `.env` is loaded).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "SWISH";
pub const DEFAULT_FILE: &str = "swish.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Data file for the `file` backend
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MintSettings {
    /// Simulated confirmation delay
    pub latency_ms: u64,
    pub timeout_ms: u64,
    /// Decimal CORE amounts, parsed by the caller
    pub min_price: String,
    pub max_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkSettings {
    pub chain_id: u64,
    pub chain_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub storage: StorageSettings,
    pub mint: MintSettings,
    pub network: NetworkSettings,
    pub log: LogSettings,
}

const DEFAULTS: &str = r#"
[storage]
backend = "file"
path = "data/swish.json"

[mint]
latency_ms = 2000
timeout_ms = 30000
min_price = "0.01"
max_price = "10"

[network]
chain_id = 1114
chain_name = "Core Testnet"

[log]
level = "info"
json = false
"#;

impl Settings {
    /// Loads `.env`, then layers `swish.toml` from the working directory.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from(Path::new(DEFAULT_FILE), false)
    }

    /// Layers defaults, `path`, then the environment. A missing file is an
    /// error only when `required`.
    pub fn load_from(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(DEFAULTS, FileFormat::Toml))
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mint.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "mint.timeout_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.storage.backend == StorageBackend::File && self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                key: "storage.path",
                reason: "required for the file backend".into(),
            });
        }
        Ok(())
    }
}

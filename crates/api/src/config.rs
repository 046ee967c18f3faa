//! Application Configuration
//!
//! Layered as built-in defaults, then an optional TOML file, then
//! `CANYON_MED__*` environment variables (`CANYON_MED__ENGINE__THREADS=4`).

use config::{Config, ConfigError, Environment, File};
use inference_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use weight_store::{DirectoryWeightStore, FileLayout, Property};

/// File looked up in the working directory when no path is given
const DEFAULT_CONFIG_NAME: &str = "canyon-med";

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the CANYON-MED weight tables
    pub weights_dir: PathBuf,
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
    /// Per-property file layout overrides
    #[serde(default)]
    pub layouts: BTreeMap<Property, FileLayout>,
}

impl AppConfig {
    /// Load configuration; an explicit `path` must exist
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        Config::builder()
            .set_default("weights_dir", "CANYON-MED_weights")?
            .set_default("server.addr", "0.0.0.0:8080")?
            .set_default("engine.std_dev", "population")?
            .set_default("engine.threads", 1)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("CANYON_MED")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Weight store for the configured directory and layouts
    pub fn weight_store(&self) -> DirectoryWeightStore {
        self.layouts
            .iter()
            .fold(DirectoryWeightStore::new(&self.weights_dir), |store, (&property, layout)| {
                store.with_layout(property, layout.clone())
            })
    }
}

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use picking_planner::CollectOptions;
use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variables prefixed with this override file values,
/// e.g. `PICKING__SERVER__PORT=8080`.
const ENV_PREFIX: &str = "PICKING";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub lookup: LookupSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where product positions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// JSON dataset file loaded once at startup.
    Dataset,
    /// Remote catalog service queried per product.
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookupSettings {
    pub backend: Backend,
    pub dataset_path: PathBuf,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub max_concurrency: usize,
}

impl LookupSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            lookup_timeout: self.timeout(),
            max_concurrency: self.max_concurrency,
        }
    }
}

/// Load settings from `path` (optional) layered under `PICKING__*` environment variables.
pub fn load_config(path: &str) -> Result<Settings, ConfigError> {
    build(path, None)
}

/// `env` replaces the process environment when given.
fn build(path: &str, env: Option<HashMap<String, String>>) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("lookup.backend", "dataset")?
        .set_default("lookup.dataset_path", "data/data.json")?
        .set_default("lookup.timeout_ms", 2000)?
        .set_default("lookup.max_concurrency", 8)?
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env),
        )
        .build()
        .and_then(|config| config.try_deserialize::<Settings>());

    match settings {
        Ok(settings) => {
            info!(
                address = %settings.server.address(),
                backend = ?settings.lookup.backend,
                "Successfully loaded configuration"
            );
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

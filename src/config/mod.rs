// config/mod.rs — server configuration.
//
// Merged from three layers, highest priority first:
//   1. CLI / env — passed as `Some(value)` from clap
//   2. TOML file at `{data_dir}/config.toml`
//   3. Built-in defaults

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 4320;
const DEFAULT_USER_ID: &str = "1";

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(".taskd"))
        .unwrap_or_else(|| PathBuf::from(".taskd"))
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Bind address for the REST server (default: "127.0.0.1").
    pub bind_address: String,
    /// Data directory for the SQLite database and config.toml.
    pub data_dir: PathBuf,
    /// Log filter (trace, debug, info, warn, error).
    pub log: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
    /// Store backing: "memory" (default, ephemeral) | "sqlite" (durable).
    pub store: String,
    /// "development" (default) | "production". The SQLite schema is only
    /// auto-created outside production.
    pub environment: String,
    /// Log SQLite queries slower than this many milliseconds (0 = disabled).
    pub slow_query_threshold_ms: u64,
    /// Bearer token required on the task routes.
    /// None = authentication disabled (local-only, trusted loopback use).
    pub api_token: Option<String>,
    /// Requester identity used when a create payload names no owner.
    pub default_user_id: String,
}

/// Shape of `{data_dir}/config.toml`. All fields optional.
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    port: Option<u16>,
    bind_address: Option<String>,
    log: Option<String>,
    log_format: Option<String>,
    store: Option<String>,
    environment: Option<String>,
    slow_query_threshold_ms: Option<u64>,
    api_token: Option<String>,
    default_user_id: Option<String>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&contents) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("ignoring malformed config file {}: {e}", path.display());
            None
        }
    }
}

impl ServerConfig {
    /// Build config from CLI/env args + optional TOML file.
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        store: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());
        let store = store.or(toml.store).unwrap_or_else(|| "memory".to_string());

        let bind_address = bind_address
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let log_format = std::env::var("TASKD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let environment = std::env::var("TASKD_ENV")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.environment)
            .unwrap_or_else(|| "development".to_string());

        let api_token = std::env::var("TASKD_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or(toml.api_token);

        let default_user_id = toml
            .default_user_id
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

        let slow_query_threshold_ms = toml.slow_query_threshold_ms.unwrap_or(0);

        Self {
            port,
            bind_address,
            data_dir,
            log,
            log_format,
            store,
            environment,
            slow_query_threshold_ms,
            api_token,
            default_user_id,
        }
    }
}

//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `TRUSTFLOW_*` environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chain::{Address, RpcConfig};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network and contract configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Address of the campaign factory contract
    #[serde(default)]
    pub factory_address: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_confirmation_timeout")]
    pub confirmation_timeout_secs: u64,
}

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_chain_id() -> u64 {
    7001
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_poll_interval() -> u64 {
    2000
}

fn default_confirmation_timeout() -> u64 {
    120
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            chain_id: default_chain_id(),
            factory_address: String::new(),
            request_timeout_ms: default_request_timeout(),
            max_retries: default_max_retries(),
            poll_interval_ms: default_poll_interval(),
            confirmation_timeout_secs: default_confirmation_timeout(),
        }
    }
}

impl ChainConfig {
    /// Parsed factory address
    pub fn factory(&self) -> Result<Address, ConfigError> {
        if self.factory_address.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "chain.factory_address is not set".to_string(),
            ));
        }
        let address: Address = self.factory_address.parse().map_err(|e| {
            ConfigError::Invalid(format!(
                "chain.factory_address {:?}: {}",
                self.factory_address, e
            ))
        })?;
        if address.is_zero() {
            return Err(ConfigError::Invalid(
                "chain.factory_address is the zero address".to_string(),
            ));
        }
        Ok(address)
    }

    pub fn rpc(&self) -> RpcConfig {
        RpcConfig {
            url: self.rpc_url.clone(),
            request_timeout_ms: self.request_timeout_ms,
            max_retries: self.max_retries,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }
}

/// Read cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u64 {
    30
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8084".to_string(),
        "http://127.0.0.1:8084".to_string(),
    ]
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("trustflow").join("config.toml")),
            Some(PathBuf::from("/etc/trustflow/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Check the settings the server cannot start without
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chain.factory()?;
        if self.chain.rpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid("chain.rpc_url is empty".to_string()));
        }
        if self.chain.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "chain.poll_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `TRUSTFLOW_*` overrides read through `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Chain overrides
        if let Some(url) = lookup("TRUSTFLOW_RPC_URL") {
            self.chain.rpc_url = url;
        }
        if let Some(id) = lookup("TRUSTFLOW_CHAIN_ID").and_then(|v| v.parse().ok()) {
            self.chain.chain_id = id;
        }
        if let Some(factory) = lookup("TRUSTFLOW_FACTORY_ADDRESS") {
            self.chain.factory_address = factory;
        }

        // Cache overrides
        if let Some(enabled) = lookup("TRUSTFLOW_CACHE_ENABLED").and_then(|v| v.parse().ok()) {
            self.cache.enabled = enabled;
        }
        if let Some(ttl) = lookup("TRUSTFLOW_CACHE_TTL_SECS").and_then(|v| v.parse().ok()) {
            self.cache.ttl_secs = ttl;
        }

        // API overrides
        if let Some(host) = lookup("TRUSTFLOW_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("TRUSTFLOW_API_PORT").and_then(|v| v.parse().ok()) {
            self.api.port = port;
        }

        // Logging overrides
        if let Some(level) = lookup("TRUSTFLOW_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("TRUSTFLOW_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# TrustFlow Configuration
#
# Environment variables override these settings:
# - TRUSTFLOW_RPC_URL
# - TRUSTFLOW_CHAIN_ID
# - TRUSTFLOW_FACTORY_ADDRESS
# - TRUSTFLOW_CACHE_ENABLED
# - TRUSTFLOW_CACHE_TTL_SECS
# - TRUSTFLOW_API_HOST
# - TRUSTFLOW_API_PORT
# - TRUSTFLOW_LOG_LEVEL
# - TRUSTFLOW_LOG_FORMAT

[chain]
# JSON-RPC endpoint of the network
rpc_url = "http://localhost:8545"

# Expected chain id; the server refuses to start on a mismatch
chain_id = 7001

# Campaign factory contract
factory_address = ""

# Per-request timeout (ms) and retries for reads
request_timeout_ms = 10000
max_retries = 3

# Receipt polling
poll_interval_ms = 2000
confirmation_timeout_secs = 120

[cache]
# Cache contract reads between transactions
enabled = true

# Seconds a cached read stays fresh
ttl_secs = 30

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8082

# Allowed CORS origins
cors_origins = ["http://localhost:8084", "http://127.0.0.1:8084"]

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

//! Bootstrap configuration loading
//!
//! The client needs very little configuration: where to POST, which
//! user agent to send and how loud to log. Each value is resolved in
//! priority order:
//!
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error; the client starts on defaults
//! and logs a warning. A config file that exists but does not parse is an
//! error, since silently ignoring it would send data somewhere unexpected.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Create-user endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "https://fullstack-test-navy.vercel.app/api/users/create";

/// Environment variable overriding the endpoint
pub const ENDPOINT_ENV: &str = "SIGNUP_ENDPOINT";

/// Environment variable naming the TOML config file
pub const CONFIG_PATH_ENV: &str = "SIGNUP_CONFIG";

const APP_DIR_NAME: &str = "signup-form";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Bootstrap configuration loaded from TOML file
///
/// Every key is optional; absent keys fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Full URL of the create-user endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    /// User-Agent header sent with the request
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values compiled into the binary
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub endpoint: String,
    pub user_agent: String,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: format!("{}/{}", APP_DIR_NAME, env!("CARGO_PKG_VERSION")),
            log_level: default_log_level(),
        }
    }
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine,
    Environment,
    ConfigFile,
    Default,
}

/// Fully resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub endpoint_source: ConfigSource,
    pub user_agent: String,
    pub log_level: String,
    /// Config file that was actually read, if any
    pub config_file: Option<PathBuf>,
}

/// Resolves [`ClientConfig`] from command line, environment, file and defaults
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_endpoint: Option<String>,
    cli_config_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoint given on the command line
    pub fn with_cli_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.cli_endpoint = endpoint.filter(|e| !e.trim().is_empty());
        self
    }

    /// Config file path given on the command line
    pub fn with_cli_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.cli_config_path = path;
        self
    }

    /// Config file to read: command line, then environment, then the
    /// per-user config directory
    pub fn config_file_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_config_path {
            return Some(path.clone());
        }
        if let Some(path) = non_empty_env(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        default_config_path()
    }

    /// Resolve every value in priority order
    pub fn resolve(&self) -> Result<ClientConfig> {
        let defaults = CompiledDefaults::new();

        let (toml_config, config_file) = match self.config_file_path() {
            Some(path) => match load_toml_config(&path)? {
                Some(config) => (config, Some(path)),
                None => (TomlConfig::default(), None),
            },
            None => {
                warn!("Could not determine config directory, using built-in defaults");
                (TomlConfig::default(), None)
            }
        };

        let (endpoint, endpoint_source) = if let Some(endpoint) = &self.cli_endpoint {
            (endpoint.clone(), ConfigSource::CommandLine)
        } else if let Some(endpoint) = non_empty_env(ENDPOINT_ENV) {
            (endpoint, ConfigSource::Environment)
        } else if let Some(endpoint) = toml_config.endpoint.clone().filter(|e| !e.trim().is_empty()) {
            (endpoint, ConfigSource::ConfigFile)
        } else {
            (defaults.endpoint.clone(), ConfigSource::Default)
        };

        info!(endpoint = %endpoint, source = ?endpoint_source, "Resolved create-user endpoint");

        Ok(ClientConfig {
            endpoint,
            endpoint_source,
            user_agent: toml_config.user_agent.unwrap_or(defaults.user_agent),
            log_level: toml_config.logging.level,
            config_file,
        })
    }
}

/// Per-user config file location (`<config_dir>/signup-form/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load a TOML config file
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        warn!("Config file not found: {}, using built-in defaults", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    debug!("Loaded config file {}", path.display());
    Ok(Some(config))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

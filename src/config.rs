use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use checkin_core::DEFAULT_BACKEND_URL;

pub const DEFAULT_LOG_LEVEL: &str = "checkin=warn,checkin_core=warn";

const ENV_BACKEND_URL: &str = "CHECKIN_BACKEND_URL";
const ENV_DATA_DIR: &str = "CHECKIN_DATA_DIR";
const ENV_IMPORT_CONCURRENCY: &str = "CHECKIN_IMPORT_CONCURRENCY";
const ENV_REQUEST_TIMEOUT: &str = "CHECKIN_REQUEST_TIMEOUT";

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    fn set(&mut self, value: T, source: ConfigSource) {
        self.value = value;
        self.source = source;
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the attendee backend
    pub backend_url: ConfigValue<String>,
    /// Directory holding the local roster mirror
    pub data_dir: ConfigValue<PathBuf>,
    /// Roster rows submitted in parallel during import
    pub import_concurrency: ConfigValue<usize>,
    /// Per-request HTTP timeout in seconds, at least 1
    pub request_timeout_secs: ConfigValue<u64>,
    /// Log filter used when RUST_LOG is unset
    pub log_level: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    backend_url: Option<String>,
    data_dir: Option<PathBuf>,
    import_concurrency: Option<usize>,
    request_timeout_secs: Option<u64>,
    log_level: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::defaults();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config.apply_file(&path, file_config);
            config.config_file = Some(path);
        }

        config.apply_env()?;
        Ok(config)
    }

    fn defaults() -> Self {
        Self {
            backend_url: ConfigValue::new(DEFAULT_BACKEND_URL.to_string(), ConfigSource::Default),
            data_dir: ConfigValue::new(Self::default_data_dir(), ConfigSource::Default),
            import_concurrency: ConfigValue::new(1, ConfigSource::Default),
            request_timeout_secs: ConfigValue::new(30, ConfigSource::Default),
            log_level: ConfigValue::new(DEFAULT_LOG_LEVEL.to_string(), ConfigSource::Default),
            config_file: None,
        }
    }

    fn apply_file(&mut self, path: &std::path::Path, file: ConfigFile) {
        if let Some(url) = file.backend_url {
            self.backend_url.set(url, ConfigSource::File);
        }
        if let Some(dir) = file.data_dir {
            // Resolve relative paths against config file's directory
            let resolved = if dir.is_relative() {
                path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
            } else {
                dir
            };
            self.data_dir.set(resolved, ConfigSource::File);
        }
        if let Some(n) = file.import_concurrency {
            self.import_concurrency.set(n.max(1), ConfigSource::File);
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout_secs.set(secs.max(1), ConfigSource::File);
        }
        if let Some(level) = file.log_level {
            self.log_level.set(level, ConfigSource::File);
        }
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var(ENV_BACKEND_URL) {
            self.backend_url.set(url, ConfigSource::Environment);
        }
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            self.data_dir.set(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(raw) = std::env::var(ENV_IMPORT_CONCURRENCY) {
            let n: usize = parse_env(ENV_IMPORT_CONCURRENCY, &raw)?;
            self.import_concurrency.set(n.max(1), ConfigSource::Environment);
        }
        if let Ok(raw) = std::env::var(ENV_REQUEST_TIMEOUT) {
            let secs: u64 = parse_env(ENV_REQUEST_TIMEOUT, &raw)?;
            self.request_timeout_secs.set(secs.max(1), ConfigSource::Environment);
        }
        Ok(())
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/checkin/
    /// - macOS: ~/Library/Application Support/checkin/
    /// - Windows: %APPDATA%/checkin/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("checkin")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/checkin/
    /// - macOS: ~/Library/Application Support/checkin/
    /// - Windows: %APPDATA%/checkin/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("checkin")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv(var, raw.to_string()))
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidEnv(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidEnv(var, value) => {
                write!(f, "Invalid value for {}: '{}'", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

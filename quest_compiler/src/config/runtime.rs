// RUNTIME PREFERENCES (environment defaults, optional TOML file, CLI overrides)

use super::constants::{batch, fetch};
use crate::logging::codes::{self, Code};
use crate::logging::events::LogLevel;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable names for configuration
pub mod env_vars {
    pub const LOG_LEVEL: &str = "QUEST_LOG_LEVEL";
    pub const STRUCTURED_LOGS: &str = "QUEST_STRUCTURED_LOGS";
    pub const SOURCE_BASE_URL: &str = "QUEST_SOURCE_BASE_URL";
    pub const FETCH_TIMEOUT_SECS: &str = "QUEST_FETCH_TIMEOUT_SECS";
    pub const MAX_THREADS: &str = "QUEST_MAX_THREADS";
    pub const OUTPUT_DIR: &str = "QUEST_OUTPUT_DIR";
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Where log events are sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogBackend {
    /// Human-readable lines on stdout/stderr
    Console,
    /// One JSON object per line
    Structured,
    /// The `log` crate facade (only with the `logging` feature)
    Facade,
}

#[derive(Debug, Clone)]
pub struct LoggingPreferences {
    pub min_log_level: LogLevel,
    pub backend: LogBackend,
    /// Whether events carry the quest currently being processed
    pub include_input_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        let structured = env_parse::<bool>(env_vars::STRUCTURED_LOGS).unwrap_or(false);

        Self {
            min_log_level: env::var(env_vars::LOG_LEVEL)
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Info),
            backend: if structured {
                LogBackend::Structured
            } else {
                LogBackend::Console
            },
            include_input_context: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchPreferences {
    pub source_base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub max_source_bytes: u64,
}

impl Default for FetchPreferences {
    fn default() -> Self {
        Self {
            source_base_url: env::var(env_vars::SOURCE_BASE_URL)
                .unwrap_or_else(|_| fetch::DEFAULT_SOURCE_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                env_parse(env_vars::FETCH_TIMEOUT_SECS).unwrap_or(fetch::DEFAULT_FETCH_TIMEOUT_SECS),
            ),
            user_agent: fetch::USER_AGENT.to_string(),
            max_source_bytes: fetch::MAX_SOURCE_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchPreferences {
    pub output_dir: PathBuf,
    pub max_threads: usize,
    pub write_report: bool,
}

impl Default for BatchPreferences {
    fn default() -> Self {
        Self {
            output_dir: env::var(env_vars::OUTPUT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(batch::DEFAULT_OUTPUT_DIR)),
            max_threads: env_parse(env_vars::MAX_THREADS).unwrap_or(1),
            write_report: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl ConfigError {
    pub fn error_code(&self) -> Code {
        codes::system::CONFIGURATION_ERROR
    }
}

/// On-disk shape of the optional TOML config file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    logging: LoggingSection,
    fetch: FetchSection,
    batch: BatchSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LoggingSection {
    level: Option<String>,
    structured: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FetchSection {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    max_source_bytes: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BatchSection {
    output_dir: Option<PathBuf>,
    max_threads: Option<usize>,
    write_report: Option<bool>,
}

/// Complete runtime configuration for a scraper run
///
/// Built once by [`QuestScraperConfig::load`] and passed down explicitly.
/// Layering, lowest to highest: compiled defaults, `QUEST_*` environment
/// variables, the TOML file, then whatever the caller overrides afterwards.
#[derive(Debug, Clone, Default)]
pub struct QuestScraperConfig {
    pub logging: LoggingPreferences,
    pub fetch: FetchPreferences,
    pub batch: BatchPreferences,
}

impl QuestScraperConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = path {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            config.apply_toml(path, &text)?;
        }

        Ok(config)
    }

    fn apply_toml(&mut self, path: &Path, text: &str) -> Result<(), ConfigError> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(level) = file.logging.level {
            self.logging.min_log_level =
                LogLevel::parse(&level).ok_or_else(|| ConfigError::InvalidValue {
                    key: "logging.level",
                    reason: format!("unknown level '{}'", level),
                })?;
        }
        if let Some(structured) = file.logging.structured {
            self.logging.backend = if structured {
                LogBackend::Structured
            } else {
                LogBackend::Console
            };
        }

        if let Some(base_url) = file.fetch.base_url {
            self.fetch.source_base_url = base_url;
        }
        if let Some(secs) = file.fetch.timeout_secs {
            self.fetch.timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = file.fetch.max_source_bytes {
            self.fetch.max_source_bytes = bytes;
        }

        if let Some(dir) = file.batch.output_dir {
            self.batch.output_dir = dir;
        }
        if let Some(threads) = file.batch.max_threads {
            self.batch.max_threads = threads;
        }
        if let Some(write_report) = file.batch.write_report {
            self.batch.write_report = write_report;
        }

        Ok(())
    }

    /// Check values that would otherwise fail late inside the batch
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.fetch.source_base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "fetch.base_url",
                reason: "must not be empty".to_string(),
            });
        }

        if self.fetch.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "fetch.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.fetch.max_source_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fetch.max_source_bytes",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.batch.max_threads == 0 || self.batch.max_threads > batch::MAX_WORKER_THREADS {
            return Err(ConfigError::InvalidValue {
                key: "batch.max_threads",
                reason: format!(
                    "{} is outside 1..={}",
                    self.batch.max_threads,
                    batch::MAX_WORKER_THREADS
                ),
            });
        }

        Ok(())
    }
}

//! Configuration for the quest extractor
//!
//! `constants` holds compiled defaults and limits; `runtime` layers environment
//! variables and an optional TOML file on top of them.

pub mod constants;
pub mod runtime;

pub use runtime::{
    BatchPreferences, ConfigError, FetchPreferences, LogBackend, LoggingPreferences,
    QuestScraperConfig,
};

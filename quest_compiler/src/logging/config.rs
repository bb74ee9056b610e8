//! Configuration access for logging
//!
//! Buffer limits are compile-time constants; level and backend come from runtime
//! preferences, which can be installed once before the global logger starts.

use crate::config::constants::logging::{
    LOG_BUFFER_SIZE, MAX_LOG_EVENTS_PER_INPUT, MAX_LOG_MESSAGE_LENGTH,
};
use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

pub use crate::config::runtime::LogBackend;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences. Must happen before `init_global_logging`.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())
}

fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences().min_log_level
}

pub fn backend() -> LogBackend {
    get_runtime_preferences().backend
}

pub fn include_input_context() -> bool {
    get_runtime_preferences().include_input_context
}

pub fn get_event_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_events_per_input() -> usize {
    MAX_LOG_EVENTS_PER_INPUT
}

pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Validate current configuration settings
pub fn validate_config() -> Result<(), String> {
    if LOG_BUFFER_SIZE < 100 {
        return Err(format!("Log buffer size too small: {}", LOG_BUFFER_SIZE));
    }

    if MAX_LOG_EVENTS_PER_INPUT > LOG_BUFFER_SIZE {
        return Err("Max log events per input exceeds total buffer size".to_string());
    }

    Ok(())
}

/// Get configuration summary for diagnostics
pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();

    format!(
        "Logging Configuration:\n\
         - Log buffer size: {}\n\
         - Max events per input: {}\n\
         - Max message length: {}\n\
         - Min log level: {:?}\n\
         - Backend: {:?}\n\
         - Include input context: {}",
        LOG_BUFFER_SIZE,
        MAX_LOG_EVENTS_PER_INPUT,
        MAX_LOG_MESSAGE_LENGTH,
        preferences.min_log_level,
        preferences.backend,
        preferences.include_input_context,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(validate_config().is_ok());
    }

    #[test]
    fn test_summary_mentions_limits() {
        let summary = get_config_summary();
        assert!(summary.contains("Log buffer size"));
        assert!(summary.contains("Backend"));
    }
}

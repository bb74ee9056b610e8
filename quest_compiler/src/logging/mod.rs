//! Global logging module for the quest extractor
//!
//! Provides thread-safe global logging with per-quest context for batch runs,
//! cargo-style error reporting, and the `log_*!` macro interface.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{ErrorCollector, InputProcessingContext, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
#[cfg(feature = "logging")]
pub use service::LogFacadeLogger;
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<Arc<ErrorCollector>> = OnceLock::new();

thread_local! {
    static INPUT_CONTEXT: RefCell<Option<InputProcessingContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system from the installed runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    GLOBAL_ERROR_COLLECTOR
        .set(Arc::new(ErrorCollector::new()))
        .map_err(|_| "Global error collector already initialized")?;

    for code in ["ERR001", "E101", "E201", "E301", "E401"] {
        if codes::get_description(code) == "Unknown error" {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;

    GLOBAL_ERROR_COLLECTOR
        .set(Arc::new(ErrorCollector::new()))
        .map_err(|_| "Global error collector already initialized")?;

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some() && GLOBAL_ERROR_COLLECTOR.get().is_some()
}

// ============================================================================
// GLOBAL ACCESS
// ============================================================================

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR
        .get()
        .map(|collector| collector.as_ref())
}

// ============================================================================
// INPUT CONTEXT MANAGEMENT
// ============================================================================

/// Set the quest being processed on the current thread
pub fn set_input_context(input_name: &str, input_id: usize) {
    let context = InputProcessingContext::new(input_name, input_id);

    if let Some(collector) = try_get_global_error_collector() {
        collector.record_input_context(context.clone());
    }

    INPUT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

pub fn clear_input_context() {
    INPUT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with the quest context set, clearing it afterwards
pub fn with_input_context<F, R>(input_name: &str, input_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_input_context(input_name, input_id);
    let result = f();
    clear_input_context();
    result
}

pub fn get_current_input_context() -> Option<InputProcessingContext> {
    INPUT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn build_event(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    let max_len = config::get_max_log_message_length();
    if event.message.chars().count() > max_len {
        event.message = event.message.chars().take(max_len).collect::<String>() + "...";
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if config::include_input_context() {
        if let Some(input_ctx) = get_current_input_context() {
            event = event.with_context("quest", &input_ctx.input_name);
            event = event.with_context("input_id", &input_ctx.input_id.to_string());
        }
    }

    event
}

fn dispatch(event: LogEvent, collect: bool) {
    if collect {
        if let Some(input_ctx) = get_current_input_context() {
            if let Some(collector) = try_get_global_error_collector() {
                collector.record_event(&input_ctx.input_name, event.clone());
            }
        }
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Used by `log_error!`
pub fn log_error_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(build_event(LogEvent::error(code, message), context), true);
}

/// Used by `log_warning!`
pub fn log_warning_with_context(code: Option<Code>, message: &str, context: Vec<(&str, &str)>) {
    let event = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };
    dispatch(build_event(event, context), true);
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(build_event(LogEvent::success(code, message), context), false);
}

/// Used by `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(build_event(LogEvent::info(message), context), false);
}

/// Used by `log_debug!`
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(build_event(LogEvent::debug(message), context), false);
}

// ============================================================================
// BATCH REPORTING
// ============================================================================

pub fn get_processing_summary() -> ProcessingSummary {
    try_get_global_error_collector()
        .map(|collector| collector.get_summary())
        .unwrap_or_default()
}

pub fn get_input_errors(input_name: &str) -> Vec<LogEvent> {
    try_get_global_error_collector()
        .map(|collector| collector.get_input_errors(input_name))
        .unwrap_or_default()
}

/// Print the grouped error/warning report to stderr
pub fn print_cargo_style_summary() {
    if let Some(collector) = try_get_global_error_collector() {
        eprintln!("{}", collector::format_cargo_style_errors(collector));
    }
}

/// Error logging that falls back to stderr when logging is not initialized
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] {} - {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_context_management() {
        assert!(get_current_input_context().is_none());

        set_input_context("Imp Catcher", 3);
        let context = get_current_input_context().unwrap();
        assert_eq!(context.input_name, "Imp Catcher");
        assert_eq!(context.input_id, 3);

        clear_input_context();
        assert!(get_current_input_context().is_none());
    }

    #[test]
    fn test_with_input_context_clears_afterwards() {
        let result = with_input_context("Cook's Assistant", 0, || {
            assert_eq!(
                get_current_input_context().map(|c| c.input_name),
                Some("Cook's Assistant".to_string())
            );
            7
        });

        assert_eq!(result, 7);
        assert!(get_current_input_context().is_none());
    }

    #[test]
    fn test_build_event_attaches_quest() {
        let event = with_input_context("Imp Catcher", 1, || {
            build_event(LogEvent::info("hello"), vec![("member", "getPanels")])
        });

        assert_eq!(event.context.get("quest").map(String::as_str), Some("Imp Catcher"));
        assert_eq!(event.context.get("member").map(String::as_str), Some("getPanels"));
    }

    #[test]
    fn test_long_messages_truncated() {
        let long = "x".repeat(config::get_max_log_message_length() + 50);
        let event = build_event(LogEvent::info(&long), vec![]);
        assert!(event.message.ends_with("..."));
        assert_eq!(
            event.message.chars().count(),
            config::get_max_log_message_length() + 3
        );
    }

    #[test]
    fn test_safe_logging_without_init() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }
}

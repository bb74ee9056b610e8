//! Event collector for batch quest processing with cargo-style output
//!
//! Groups error and warning events by the quest they were raised for so a batch
//! run can end with one readable report instead of interleaved worker output.

use super::config;
use super::events::LogEvent;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

// ============================================================================
// INPUT PROCESSING CONTEXT
// ============================================================================

/// Context information for one quest being processed
#[derive(Debug, Clone)]
pub struct InputProcessingContext {
    pub input_name: String,
    pub input_id: usize,
    pub start_time: Instant,
}

impl InputProcessingContext {
    pub fn new(input_name: impl Into<String>, input_id: usize) -> Self {
        Self {
            input_name: input_name.into(),
            input_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

// ============================================================================
// PROCESSING SUMMARY
// ============================================================================

/// Summary of collected events
#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_inputs: usize,
    pub inputs_with_errors: usize,
    pub inputs_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

// ============================================================================
// EVENT COLLECTOR
// ============================================================================

/// Thread-safe event collector keyed by quest name
pub struct ErrorCollector {
    input_events: Mutex<BTreeMap<String, Vec<LogEvent>>>,
    input_contexts: Mutex<BTreeMap<String, InputProcessingContext>>,
    processing_start: Instant,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            input_events: Mutex::new(BTreeMap::new()),
            input_contexts: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    fn events(&self) -> MutexGuard<'_, BTreeMap<String, Vec<LogEvent>>> {
        self.input_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn contexts(&self) -> MutexGuard<'_, BTreeMap<String, InputProcessingContext>> {
        self.input_contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an event for a specific quest
    pub fn record_event(&self, input_name: &str, event: LogEvent) {
        let max_events = config::get_max_events_per_input();
        let mut events = self.events();
        let input_events = events.entry(input_name.to_string()).or_default();

        if input_events.len() < max_events {
            input_events.push(event);
        } else if input_events.len() == max_events {
            input_events.push(LogEvent::warning(&format!(
                "Too many events for quest (limit: {})",
                max_events
            )));
        }
    }

    pub fn record_input_context(&self, context: InputProcessingContext) {
        self.contexts()
            .insert(context.input_name.clone(), context);
    }

    pub fn get_input_events(&self, input_name: &str) -> Vec<LogEvent> {
        self.events().get(input_name).cloned().unwrap_or_default()
    }

    pub fn get_input_errors(&self, input_name: &str) -> Vec<LogEvent> {
        self.events()
            .get(input_name)
            .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_all_input_events(&self) -> BTreeMap<String, Vec<LogEvent>> {
        self.events().clone()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = self.events();
        let contexts = self.contexts();

        let mut summary = ProcessingSummary {
            total_inputs: contexts.len().max(events.len()),
            total_processing_time: self.processing_start.elapsed(),
            ..ProcessingSummary::default()
        };

        for input_events in events.values() {
            let errors = input_events.iter().filter(|e| e.is_error()).count();
            let warnings = input_events.iter().filter(|e| e.is_warning()).count();

            if errors > 0 {
                summary.inputs_with_errors += 1;
            } else if warnings > 0 {
                summary.inputs_with_warnings += 1;
            }

            summary.total_errors += errors;
            summary.total_warnings += warnings;
        }

        summary
    }

    pub fn total_event_count(&self) -> usize {
        self.events().values().map(|v| v.len()).sum()
    }

    pub fn clear(&self) {
        self.events().clear();
        self.contexts().clear();
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Format collected errors and warnings grouped by quest
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();
    let all_events = collector.get_all_input_events();

    for (input_name, events) in &all_events {
        let error_events: Vec<_> = events.iter().filter(|e| e.is_error()).collect();
        let warning_events: Vec<_> = events.iter().filter(|e| e.is_warning()).collect();

        if error_events.is_empty() && warning_events.is_empty() {
            continue;
        }

        output.push_str(&format!("Extracting {}...\n", input_name));

        for event in error_events {
            output.push_str(&format!(
                "error[{}]: {}\n",
                event.code.as_str(),
                event.message
            ));
            output.push_str(&format!(
                "  = severity: {}, category: {}\n",
                event.severity(),
                event.category()
            ));
            push_context(&mut output, event);

            let action = event.recommended_action();
            if action != "No specific action available" {
                output.push_str(&format!("  = help: {}\n", action));
            }
        }

        for event in warning_events {
            output.push_str(&format!(
                "warning[{}]: {}\n",
                event.code.as_str(),
                event.message
            ));
            push_context(&mut output, event);
        }

        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.has_errors() || summary.has_warnings() {
        output.push_str(&format!(
            "{} error(s), {} warning(s) across {} quest(s)",
            summary.total_errors,
            summary.total_warnings,
            summary.inputs_with_errors + summary.inputs_with_warnings
        ));
    } else {
        output.push_str("No errors or warnings collected");
    }

    output
}

fn push_context(output: &mut String, event: &LogEvent) {
    let visible: Vec<_> = event
        .context
        .iter()
        .filter(|(key, _)| key.as_str() != "quest" && key.as_str() != "input_id")
        .collect();

    if !visible.is_empty() {
        output.push_str("  |\n");
        for (key, value) in visible {
            output.push_str(&format!("  = {}: {}\n", key, value));
        }
    }
}

//! Batch processing over the approved-input list
//!
//! Each input moves `Pending → Fetching → Extracting → Writing → Done`, or
//! stops at `Skipped` with the stage it failed in. A failing input never
//! affects the others. Sequential and bounded-parallel modes share the same
//! per-input routine; results are always reported in input order.

use crate::config::constants::batch::{BATCH_REPORT_FILE, MAX_WORKER_THREADS};
use crate::config::runtime::BatchPreferences;
use crate::fetch::SourceFetcher;
use crate::input_list::ApprovedInputs;
use crate::logging::{self, codes};
use crate::persistence::RecordWriter;
use crate::pipeline::{self, Stage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub output_dir: PathBuf,
    pub max_threads: usize,
    /// Write `_batch_report.json` next to the records
    pub write_report: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from(&BatchPreferences::default())
    }
}

impl From<&BatchPreferences> for BatchConfig {
    fn from(preferences: &BatchPreferences) -> Self {
        Self {
            output_dir: preferences.output_dir.clone(),
            max_threads: preferences.max_threads,
            write_report: preferences.write_report,
        }
    }
}

/// Where one input is in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum InputState {
    Pending,
    Fetching,
    Extracting,
    Writing,
    Done,
    Skipped { stage: Stage },
}

impl InputState {
    /// Entering `stage`
    fn entering(stage: Stage) -> Self {
        match stage {
            Stage::Fetching => InputState::Fetching,
            Stage::Extracting => InputState::Extracting,
            Stage::Writing => InputState::Writing,
        }
    }

    /// Stage in progress, if any
    fn stage(&self) -> Option<Stage> {
        match self {
            InputState::Fetching => Some(Stage::Fetching),
            InputState::Extracting => Some(Stage::Extracting),
            InputState::Writing => Some(Stage::Writing),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, InputState::Done)
    }
}

/// Final state of one approved input
#[derive(Debug, Clone, Serialize)]
pub struct InputOutcome {
    pub input_id: usize,
    pub name: String,
    #[serde(flatten)]
    pub state: InputState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InputOutcome {
    fn skipped(input_id: usize, name: &str, stage: Stage, code: logging::Code, error: String) -> Self {
        Self {
            input_id,
            name: name.to_string(),
            state: InputState::Skipped { stage },
            key: None,
            output_path: None,
            error_code: Some(code.as_str()),
            error: Some(error),
        }
    }
}

#[derive(Debug)]
pub struct BatchResults {
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<InputOutcome>,
    pub processing_duration: Duration,
    pub threads_used: usize,
}

impl BatchResults {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.state.is_done()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &InputOutcome> {
        self.outcomes.iter().filter(|o| !o.state.is_done())
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch complete: {} quests attempted, {} written, {} skipped, {:.2}s total",
            self.outcomes.len(),
            self.success_count(),
            self.skipped_count(),
            self.processing_duration.as_secs_f64()
        )
    }

    pub fn report(&self) -> BatchReport<'_> {
        BatchReport {
            started_at: self.started_at,
            duration_ms: self.processing_duration.as_millis(),
            threads: self.threads_used,
            attempted: self.outcomes.len(),
            written: self.success_count(),
            skipped: self.skipped_count(),
            outcomes: &self.outcomes,
        }
    }
}

/// Serialized form of a batch run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport<'a> {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u128,
    pub threads: usize,
    pub attempted: usize,
    pub written: usize,
    pub skipped: usize,
    pub outcomes: &'a [InputOutcome],
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Invalid thread count: {requested} (allowed 1..={max})")]
    InvalidThreadCount { requested: usize, max: usize },
}

impl BatchError {
    pub fn error_code(&self) -> logging::Code {
        codes::system::CONFIGURATION_ERROR
    }
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

/// Attempt every approved input exactly once
pub fn run_batch(
    inputs: &ApprovedInputs,
    fetcher: &dyn SourceFetcher,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    if config.max_threads == 0 || config.max_threads > MAX_WORKER_THREADS {
        return Err(BatchError::InvalidThreadCount {
            requested: config.max_threads,
            max: MAX_WORKER_THREADS,
        });
    }

    let started_at = Utc::now();
    let start_time = Instant::now();
    let writer = RecordWriter::new(&config.output_dir);
    let threads = config.max_threads.min(inputs.len()).max(1);

    crate::log_info!("Starting batch",
        "quests" => inputs.len(),
        "threads" => threads,
        "output_dir" => config.output_dir.display()
    );

    let outcomes = if threads == 1 {
        process_sequential(inputs.names(), fetcher, &writer)
    } else {
        process_parallel(inputs.names(), fetcher, &writer, threads)
    };

    let results = BatchResults {
        started_at,
        outcomes,
        processing_duration: start_time.elapsed(),
        threads_used: threads,
    };

    if config.write_report {
        match writer.write_named(BATCH_REPORT_FILE, &results.report()) {
            Ok(path) => crate::log_info!("Batch report written", "path" => path.display()),
            Err(e) => crate::log_error!(e.error_code(), "Failed to write batch report",
                "error" => e
            ),
        }
    }

    crate::log_success!(codes::success::BATCH_COMPLETE, "Batch complete",
        "attempted" => results.outcomes.len(),
        "written" => results.success_count(),
        "skipped" => results.skipped_count(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    Ok(results)
}

fn process_sequential(
    names: &[String],
    fetcher: &dyn SourceFetcher,
    writer: &RecordWriter,
) -> Vec<InputOutcome> {
    names
        .iter()
        .enumerate()
        .map(|(input_id, name)| process_one(input_id, name, fetcher, writer))
        .collect()
}

/// Workers pull the next index from a shared counter until the list is drained
fn process_parallel(
    names: &[String],
    fetcher: &dyn SourceFetcher,
    writer: &RecordWriter,
    threads: usize,
) -> Vec<InputOutcome> {
    let next = AtomicUsize::new(0);
    let slots: Vec<Mutex<Option<InputOutcome>>> = names.iter().map(|_| Mutex::new(None)).collect();

    thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| loop {
                let input_id = next.fetch_add(1, Ordering::Relaxed);
                let Some(name) = names.get(input_id) else {
                    break;
                };

                let outcome = process_one(input_id, name, fetcher, writer);
                *slots[input_id].lock().unwrap_or_else(|e| e.into_inner()) = Some(outcome);
            });
        }
    });

    slots
        .into_iter()
        .zip(names)
        .enumerate()
        .map(|(input_id, (slot, name))| {
            slot.into_inner()
                .unwrap_or_else(|e| e.into_inner())
                .unwrap_or_else(|| {
                    InputOutcome::skipped(
                        input_id,
                        name,
                        Stage::Fetching,
                        codes::system::INTERNAL_ERROR,
                        "input was never processed".to_string(),
                    )
                })
        })
        .collect()
}

/// Run one input under its logging context; panics are contained here
fn process_one(
    input_id: usize,
    name: &str,
    fetcher: &dyn SourceFetcher,
    writer: &RecordWriter,
) -> InputOutcome {
    logging::with_input_context(name, input_id, || {
        let mut state = InputState::Pending;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pipeline::process_input(name, fetcher, writer, |stage| {
                state = InputState::entering(stage);
                crate::log_debug!("Stage started", "stage" => stage);
            })
        }));

        match outcome {
            Ok(Ok(result)) => {
                crate::log_info!("Quest written", "key" => &result.key);
                InputOutcome {
                    input_id,
                    name: name.to_string(),
                    state: InputState::Done,
                    key: Some(result.key),
                    output_path: result.output_path,
                    error_code: None,
                    error: None,
                }
            }
            Ok(Err(err)) => {
                crate::log_error!(err.error_code(), "Skipping quest",
                    "stage" => err.stage(),
                    "error" => &err
                );
                InputOutcome::skipped(input_id, name, err.stage(), err.error_code(), err.to_string())
            }
            Err(_) => {
                let stage = state.stage().unwrap_or(Stage::Fetching);
                crate::log_error!(codes::system::INTERNAL_ERROR, "Skipping quest after a panic",
                    "stage" => stage
                );
                InputOutcome::skipped(
                    input_id,
                    name,
                    stage,
                    codes::system::INTERNAL_ERROR,
                    format!("panicked while {}", stage),
                )
            }
        }
    })
}

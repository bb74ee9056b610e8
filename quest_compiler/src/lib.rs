//! Quest helper source extraction
//!
//! Locates well-known members in quest helper Java sources, extracts rewards,
//! requirements, steps and panels with small call-pattern recognisers, and
//! assembles one [`QuestRecord`] per quest. The batch driver fetches sources
//! through a [`SourceFetcher`] and writes records as JSON.

pub mod assembly;
pub mod batch;
pub mod config;
pub mod extractors;
pub mod fetch;
pub mod input_list;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod naming;
pub mod persistence;
pub mod pipeline;
pub mod record;
pub mod reference_resolution;
pub mod source;

// Re-export key types for library consumers
pub use batch::{run_batch, BatchConfig, BatchError, BatchResults, InputOutcome, InputState};
pub use config::QuestScraperConfig;
pub use fetch::{FetchError, LocalSourceFetcher, SourceFetcher};
pub use input_list::{ApprovedInputs, InputListError};
pub use persistence::{PersistError, RecordWriter};
pub use pipeline::{PipelineError, PipelineResult, Stage};
pub use record::QuestRecord;
pub use source::SourceUnit;

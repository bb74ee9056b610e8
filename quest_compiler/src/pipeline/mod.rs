//! Per-input pipeline: fetch, extract and assemble, write
//!
//! Every stage returns a `Result`; the batch driver records the stage at
//! which an input was skipped and moves on to the next one.

mod error;
mod result;

pub use error::PipelineError;
pub use result::PipelineResult;

use crate::assembly;
use crate::extractors;
use crate::fetch::SourceFetcher;
use crate::logging::codes;
use crate::naming;
use crate::persistence::RecordWriter;
use crate::source::SourceUnit;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Instant;

/// Pipeline stage an input is in, or was skipped at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Fetching,
    Extracting,
    Writing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Writing => "writing",
        })
    }
}

/// Fetch the source for a display name through its derived class name
pub fn fetch_source(
    display_name: &str,
    fetcher: &dyn SourceFetcher,
) -> Result<SourceUnit, PipelineError> {
    let class_name = naming::class_name_for(display_name);
    let location = fetcher.location(&class_name);

    crate::log_debug!("Fetching source", "class" => &class_name, "location" => &location);

    let text = fetcher
        .fetch(&class_name)
        .map_err(|source| PipelineError::Fetch {
            class_name: class_name.clone(),
            source,
        })?;

    crate::log_success!(codes::success::SOURCE_FETCHED, "Source fetched",
        "location" => &location,
        "bytes" => text.len()
    );

    Ok(SourceUnit::new(display_name, text))
}

/// Extract and assemble the record for one source.
///
/// A panic inside the extractors is contained and reported as an
/// extraction failure for this input only.
pub fn process_source(unit: &SourceUnit) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    let class_name = unit
        .declared_class_name()
        .map(str::to_string)
        .unwrap_or_else(|| {
            let derived = naming::class_name_for(unit.name());
            crate::log_debug!("No public class declaration; using derived class name",
                "class" => &derived
            );
            derived
        });
    let key = naming::output_key(&class_name);

    let (extraction, assembly) = panic::catch_unwind(AssertUnwindSafe(|| {
        let extraction = extractors::extract_all(unit);
        let assembly = assembly::assemble(unit.name(), &extraction);
        (extraction, assembly)
    }))
    .map_err(|payload| PipelineError::Extraction {
        message: panic_message(payload.as_ref()),
    })?;

    let result = PipelineResult {
        record: assembly.record,
        class_name,
        key,
        missing_members: extraction.missing_members,
        dangling_steps: assembly.dangling_steps.len(),
        unresolved_items: assembly.unresolved_items.len(),
        output_path: None,
        processing_duration: start_time.elapsed(),
    };

    result.log_success();
    Ok(result)
}

/// Write the record and remember where it went
pub fn persist(result: &mut PipelineResult, writer: &RecordWriter) -> Result<PathBuf, PipelineError> {
    let path = writer
        .write(&result.key, &result.record)
        .map_err(|source| PipelineError::Persist {
            key: result.key.clone(),
            source,
        })?;

    crate::log_success!(codes::success::RECORD_WRITTEN, "Record written",
        "path" => path.display()
    );

    result.output_path = Some(path.clone());
    Ok(path)
}

/// Run every stage for one input, reporting each stage as it starts
pub fn process_input(
    display_name: &str,
    fetcher: &dyn SourceFetcher,
    writer: &RecordWriter,
    mut on_stage: impl FnMut(Stage),
) -> Result<PipelineResult, PipelineError> {
    on_stage(Stage::Fetching);
    let unit = fetch_source(display_name, fetcher)?;

    on_stage(Stage::Extracting);
    let mut result = process_source(&unit)?;

    on_stage(Stage::Writing);
    persist(&mut result, writer)?;

    Ok(result)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "extractor panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use assert_matches::assert_matches;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct MapFetcher(HashMap<&'static str, &'static str>);

    impl SourceFetcher for MapFetcher {
        fn location(&self, class_name: &str) -> String {
            format!("memory://{}", class_name)
        }

        fn fetch(&self, class_name: &str) -> Result<String, FetchError> {
            self.0
                .get(class_name)
                .map(|text| text.to_string())
                .ok_or_else(|| FetchError::HttpStatus {
                    location: self.location(class_name),
                    status: 404,
                })
        }
    }

    const RUNE_MYSTERIES: &str = r#"
        public class RuneMysteriesHelper extends BasicQuestHelper {
            @Override
            public QuestPointReward getQuestPointReward() { return new QuestPointReward(1); }
        }
    "#;

    #[test]
    fn test_declared_class_name_sets_key() {
        let unit = SourceUnit::new("Rune Mysteries", RUNE_MYSTERIES);
        let result = process_source(&unit).unwrap();

        assert_eq!(result.class_name, "RuneMysteriesHelper");
        assert_eq!(result.key, "runemysterieshelper");
        assert_eq!(result.record.name, "Rune Mysteries");
        assert_eq!(result.record.quest_points, 1);
        assert!(result.output_path.is_none());
    }

    #[test]
    fn test_derived_class_name_fallback() {
        let unit = SourceUnit::new("Cook's Assistant", "class Hidden {}");
        let result = process_source(&unit).unwrap();
        assert_eq!(result.key, "cooksassistant");
        assert_eq!(result.record.quest_points, 0);
    }

    #[test]
    fn test_process_input_reports_stages() {
        let dir = TempDir::new().unwrap();
        let writer = RecordWriter::new(dir.path());
        let fetcher = MapFetcher(HashMap::from([("RuneMysteries", RUNE_MYSTERIES)]));

        let mut stages = Vec::new();
        let result = process_input("Rune Mysteries", &fetcher, &writer, |s| stages.push(s)).unwrap();

        assert_eq!(stages, vec![Stage::Fetching, Stage::Extracting, Stage::Writing]);
        assert_eq!(result.output_path, Some(dir.path().join("runemysterieshelper.json")));
    }

    #[test]
    fn test_fetch_failure_stops_at_fetching() {
        let dir = TempDir::new().unwrap();
        let writer = RecordWriter::new(dir.path());
        let fetcher = MapFetcher(HashMap::new());

        let mut stages = Vec::new();
        let err = process_input("Imp Catcher", &fetcher, &writer, |s| stages.push(s)).unwrap_err();

        assert_eq!(err.stage(), Stage::Fetching);
        assert_eq!(err.error_code(), codes::fetch::HTTP_STATUS);
        assert_matches!(err, PipelineError::Fetch { ref class_name, .. } if class_name == "ImpCatcher");
        assert_eq!(stages, vec![Stage::Fetching]);
    }

    #[test]
    fn test_write_failure_stops_at_writing() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("quests");
        std::fs::write(&blocker, "file").unwrap();

        let fetcher = MapFetcher(HashMap::from([("RuneMysteries", RUNE_MYSTERIES)]));
        let err = process_input("Rune Mysteries", &fetcher, &RecordWriter::new(&blocker), |_| {})
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Writing);
        assert_matches!(err, PipelineError::Persist { .. });
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "extractor panicked");
    }
}

use crate::record::QuestRecord;
use std::path::PathBuf;
use std::time::Duration;

/// One processed input: the record and what was dropped while building it
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub record: QuestRecord,
    /// Class name from the source declaration, or the derived one
    pub class_name: String,
    pub key: String,
    pub missing_members: Vec<&'static str>,
    pub dangling_steps: usize,
    pub unresolved_items: usize,
    /// Set once the record has been written
    pub output_path: Option<PathBuf>,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn log_success(&self) {
        crate::log_success!(
            crate::logging::codes::success::EXTRACTION_COMPLETE,
            "Quest extracted",
            "class" => &self.class_name,
            "key" => &self.key,
            "panels" => self.record.panels.len(),
            "steps" => self.record.step_count(),
            "item_requirements" => self.record.item_requirements.len(),
            "dropped_steps" => self.dangling_steps,
            "unresolved_items" => self.unresolved_items,
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}

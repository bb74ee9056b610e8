//! Record persistence: one pretty-printed JSON file per quest

use crate::logging::codes;
use crate::naming;
use crate::record::QuestRecord;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Cannot create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize {what}: {source}")]
    Serialization {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PersistError::OutputDirectory { .. } => codes::persistence::OUTPUT_DIRECTORY,
            PersistError::WriteFailed { .. } => codes::persistence::WRITE_FAILED,
            PersistError::Serialization { .. } => codes::persistence::SERIALIZATION_FAILED,
        }
    }
}

/// Writes records as `<output_dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct RecordWriter {
    output_dir: PathBuf,
}

impl RecordWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.output_dir.join(naming::record_file_name(key))
    }

    /// Create the output directory if needed
    pub fn ensure_output_dir(&self) -> Result<(), PersistError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| PersistError::OutputDirectory {
            path: self.output_dir.clone(),
            source,
        })
    }

    /// Serialize and write one record, replacing any previous file for the key
    pub fn write(&self, key: &str, record: &QuestRecord) -> Result<PathBuf, PersistError> {
        let path = self.record_path(key);
        self.write_json(&path, record, key)?;
        Ok(path)
    }

    /// Write any serializable value under `file_name` in the output directory
    pub fn write_named<T: Serialize>(&self, file_name: &str, value: &T) -> Result<PathBuf, PersistError> {
        let path = self.output_dir.join(file_name);
        self.write_json(&path, value, file_name)?;
        Ok(path)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T, what: &str) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(value).map_err(|source| PersistError::Serialization {
            what: what.to_string(),
            source,
        })?;

        self.ensure_output_dir()?;
        fs::write(path, json).map_err(|source| PersistError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    fn record(name: &str) -> QuestRecord {
        QuestRecord {
            name: name.to_string(),
            quest_points: 1,
            experience_rewards: vec![],
            lamp_reward: None,
            skill_requirements: vec![],
            quest_requirements: vec![],
            quest_point_requirement: None,
            item_requirements: vec!["Bucket".to_string()],
            panels: vec![],
        }
    }

    #[test]
    fn test_write_creates_directory_and_file() {
        let dir = TempDir::new().unwrap();
        let writer = RecordWriter::new(dir.path().join("nested").join("quests"));

        let path = writer.write("cooksassistant", &record("Cook's Assistant")).unwrap();
        assert_eq!(path, writer.output_dir().join("cooksassistant.json"));

        let written: QuestRecord = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, record("Cook's Assistant"));
    }

    #[test]
    fn test_rewrite_replaces_previous_record() {
        let dir = TempDir::new().unwrap();
        let writer = RecordWriter::new(dir.path());

        writer.write("impcatcher", &record("First")).unwrap();
        let path = writer.write("impcatcher", &record("Second")).unwrap();

        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("\"Second\""));
        assert!(!text.contains("\"First\""));
    }

    #[test]
    fn test_output_directory_blocked_by_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("quests");
        fs::write(&blocker, "not a directory").unwrap();

        let err = RecordWriter::new(&blocker).write("x", &record("X")).unwrap_err();
        assert_matches!(err, PersistError::OutputDirectory { .. });
        assert_eq!(err.error_code(), codes::persistence::OUTPUT_DIRECTORY);
    }

    #[test]
    fn test_write_named() {
        let dir = TempDir::new().unwrap();
        let writer = RecordWriter::new(dir.path());
        let path = writer
            .write_named("_batch_report.json", &serde_json::json!({"succeeded": 2}))
            .unwrap();
        assert!(fs::read_to_string(path).unwrap().contains("\"succeeded\": 2"));
    }
}

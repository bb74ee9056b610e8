//! Approved-input list: a JSON object of display name to `true`/`false`

use crate::logging::codes;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum InputListError {
    #[error("Cannot read input list {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed input list: {reason}")]
    Malformed { reason: String },
}

impl InputListError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            InputListError::Unreadable { .. } => codes::input_list::UNREADABLE,
            InputListError::Malformed { .. } => codes::input_list::MALFORMED,
        }
    }
}

/// Display names approved for processing, in list order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovedInputs {
    names: Vec<String>,
    /// Entries present in the list but set to `false`
    declined: usize,
}

impl ApprovedInputs {
    pub fn load(path: &Path) -> Result<Self, InputListError> {
        let text = fs::read_to_string(path).map_err(|source| InputListError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let inputs = Self::parse(&text)?;

        crate::log_success!(codes::success::INPUT_LIST_LOADED, "Input list loaded",
            "path" => path.display(),
            "approved" => inputs.len(),
            "declined" => inputs.declined
        );
        if inputs.is_empty() {
            crate::log_warning!(code = codes::input_list::EMPTY, "Input list approves no quests",
                "path" => path.display()
            );
        }

        Ok(inputs)
    }

    /// Parse the list; key order is kept and every value must be a boolean
    pub fn parse(text: &str) -> Result<Self, InputListError> {
        let entries: Map<String, Value> =
            serde_json::from_str(text).map_err(|e| InputListError::Malformed {
                reason: e.to_string(),
            })?;

        let mut inputs = ApprovedInputs::default();
        for (name, value) in entries {
            match value {
                Value::Bool(true) => inputs.names.push(name),
                Value::Bool(false) => inputs.declined += 1,
                other => {
                    return Err(InputListError::Malformed {
                        reason: format!("value for \"{}\" is {}, expected true or false", name, other),
                    })
                }
            }
        }

        Ok(inputs)
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            declined: 0,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn declined(&self) -> usize {
        self.declined
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

use super::Stage;
use crate::fetch::FetchError;
use crate::logging::{codes, Code};
use crate::persistence::PersistError;

/// Why one input was skipped
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Fetching {class_name} failed: {source}")]
    Fetch {
        class_name: String,
        #[source]
        source: FetchError,
    },

    #[error("Extraction aborted: {message}")]
    Extraction { message: String },

    #[error("Writing record {key} failed: {source}")]
    Persist {
        key: String,
        #[source]
        source: PersistError,
    },
}

impl PipelineError {
    /// Stage at which the input was skipped
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Fetch { .. } => Stage::Fetching,
            PipelineError::Extraction { .. } => Stage::Extracting,
            PipelineError::Persist { .. } => Stage::Writing,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::Fetch { source, .. } => source.error_code(),
            PipelineError::Extraction { .. } => codes::system::INTERNAL_ERROR,
            PipelineError::Persist { source, .. } => source.error_code(),
        }
    }
}

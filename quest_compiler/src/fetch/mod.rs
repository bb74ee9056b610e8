//! Source fetching
//!
//! [`SourceFetcher`] is the seam between the batch driver and wherever the
//! Java sources live. The HTTP implementation lives in the scraper crate;
//! [`LocalSourceFetcher`] reads a checkout using the same path derivation.

use crate::config::constants::fetch::MAX_SOURCE_SIZE;
use crate::logging::codes;
use crate::naming;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error fetching {location}: {message}")]
    Network { location: String, message: String },

    #[error("HTTP status {status} for {location}")]
    HttpStatus { location: String, status: u16 },

    #[error("Timed out fetching {location}")]
    Timeout { location: String },

    #[error("Source not found: {location}")]
    NotFound { location: String },

    #[error("Source too large: {size} bytes (max: {max_size})")]
    TooLarge { size: u64, max_size: u64 },

    #[error("Source is not valid UTF-8: {location}")]
    InvalidEncoding { location: String },

    #[error("I/O error reading {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FetchError::Network { .. } | FetchError::Io { .. } => codes::fetch::NETWORK_ERROR,
            FetchError::HttpStatus { .. } => codes::fetch::HTTP_STATUS,
            FetchError::Timeout { .. } => codes::fetch::TIMEOUT,
            FetchError::NotFound { .. } => codes::fetch::SOURCE_NOT_FOUND,
            FetchError::TooLarge { .. } => codes::fetch::SOURCE_TOO_LARGE,
            FetchError::InvalidEncoding { .. } => codes::fetch::INVALID_ENCODING,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

/// Retrieves the Java source for a derived class name
pub trait SourceFetcher: Send + Sync {
    /// Where the source for `class_name` is fetched from (URL or path)
    fn location(&self, class_name: &str) -> String;

    fn fetch(&self, class_name: &str) -> Result<String, FetchError>;
}

/// Reject sizes over `max_size`
pub fn check_source_size(size: u64, max_size: u64) -> Result<(), FetchError> {
    if size > max_size {
        return Err(FetchError::TooLarge { size, max_size });
    }
    Ok(())
}

/// Decode fetched bytes, enforcing the size limit first
pub fn decode_source(location: &str, bytes: Vec<u8>, max_size: u64) -> Result<String, FetchError> {
    check_source_size(bytes.len() as u64, max_size)?;
    String::from_utf8(bytes).map_err(|_| FetchError::InvalidEncoding {
        location: location.to_string(),
    })
}

/// Reads `<root>/<classname lowercased>/<ClassName>.java` from disk
#[derive(Debug, Clone)]
pub struct LocalSourceFetcher {
    root: PathBuf,
    max_source_bytes: u64,
}

impl LocalSourceFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_source_bytes: MAX_SOURCE_SIZE,
        }
    }

    pub fn with_max_source_bytes(mut self, max_source_bytes: u64) -> Self {
        self.max_source_bytes = max_source_bytes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, class_name: &str) -> PathBuf {
        self.root.join(naming::source_relative_path(class_name))
    }
}

impl SourceFetcher for LocalSourceFetcher {
    fn location(&self, class_name: &str) -> String {
        self.path_for(class_name).display().to_string()
    }

    fn fetch(&self, class_name: &str) -> Result<String, FetchError> {
        let path = self.path_for(class_name);
        let location = path.display().to_string();

        let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FetchError::NotFound {
                location: location.clone(),
            },
            _ => FetchError::Io {
                location: location.clone(),
                source: e,
            },
        })?;

        if !metadata.is_file() {
            return Err(FetchError::NotFound { location });
        }
        check_source_size(metadata.len(), self.max_source_bytes)?;

        let bytes = fs::read(&path).map_err(|source| FetchError::Io {
            location: location.clone(),
            source,
        })?;
        decode_source(&location, bytes, self.max_source_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    fn checkout_with(class_name: &str, text: &[u8]) -> TempDir {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(naming::source_relative_path(class_name));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        dir
    }

    #[test]
    fn test_local_fetch_uses_derived_path() {
        let dir = checkout_with("ImpCatcher", b"public class ImpCatcher {}");
        let fetcher = LocalSourceFetcher::new(dir.path());

        assert!(fetcher.location("ImpCatcher").ends_with("ImpCatcher.java"));
        assert_eq!(fetcher.fetch("ImpCatcher").unwrap(), "public class ImpCatcher {}");
    }

    #[test]
    fn test_local_fetch_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = LocalSourceFetcher::new(dir.path()).fetch("RuneMysteries").unwrap_err();

        assert_matches!(err, FetchError::NotFound { .. });
        assert_eq!(err.error_code(), codes::fetch::SOURCE_NOT_FOUND);
    }

    #[test]
    fn test_local_fetch_size_limit() {
        let dir = checkout_with("BigQuest", &[b'a'; 64]);
        let fetcher = LocalSourceFetcher::new(dir.path()).with_max_source_bytes(16);

        assert_matches!(
            fetcher.fetch("BigQuest"),
            Err(FetchError::TooLarge { size: 64, max_size: 16 })
        );
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let dir = checkout_with("Garbled", &[0xff, 0xfe, 0x00]);
        assert_matches!(
            LocalSourceFetcher::new(dir.path()).fetch("Garbled"),
            Err(FetchError::InvalidEncoding { .. })
        );
    }

    #[test]
    fn test_decode_source() {
        assert_eq!(decode_source("x", b"ok".to_vec(), 2).unwrap(), "ok");
        assert_matches!(decode_source("x", b"too long".to_vec(), 2), Err(FetchError::TooLarge { .. }));
    }
}

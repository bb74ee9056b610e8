//! # Quest Scraper
//!
//! HTTP source fetching for the quest extraction batch, plus the glue that
//! turns a loaded [`QuestScraperConfig`] into a fetcher and batch settings.

use quest_compiler::config::FetchPreferences;
use quest_compiler::fetch::{check_source_size, decode_source, FetchError, LocalSourceFetcher};
use quest_compiler::logging::{codes, Code};
use quest_compiler::{naming, BatchConfig, BatchError, InputListError, QuestScraperConfig, SourceFetcher};
use reqwest::blocking::Client;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error(transparent)]
    Config(#[from] quest_compiler::config::ConfigError),

    #[error(transparent)]
    InputList(#[from] InputListError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("Cannot build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Logging initialization failed: {0}")]
    Logging(String),
}

impl ScraperError {
    pub fn error_code(&self) -> Code {
        match self {
            ScraperError::Config(e) => e.error_code(),
            ScraperError::InputList(e) => e.error_code(),
            ScraperError::Batch(e) => e.error_code(),
            ScraperError::HttpClient(_) => codes::system::INITIALIZATION_FAILURE,
            ScraperError::Logging(_) => codes::system::INITIALIZATION_FAILURE,
        }
    }
}

/// Fetches `<base>/<classname lowercased>/<ClassName>.java` over HTTP GET
pub struct HttpSourceFetcher {
    client: Client,
    base_url: String,
    max_source_bytes: u64,
}

impl HttpSourceFetcher {
    pub fn new(preferences: &FetchPreferences) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(preferences.timeout)
            .user_agent(preferences.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: preferences.source_base_url.clone(),
            max_source_bytes: preferences.max_source_bytes,
        })
    }
}

impl SourceFetcher for HttpSourceFetcher {
    fn location(&self, class_name: &str) -> String {
        naming::source_url(&self.base_url, class_name)
    }

    fn fetch(&self, class_name: &str) -> Result<String, FetchError> {
        let url = self.location(class_name);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| classify_transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                location: url,
                status: status.as_u16(),
            });
        }

        if let Some(length) = response.content_length() {
            check_source_size(length, self.max_source_bytes)?;
        }

        let bytes = response
            .bytes()
            .map_err(|e| classify_transport_error(&url, e))?;
        decode_source(&url, bytes.to_vec(), self.max_source_bytes)
    }
}

fn classify_transport_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            location: url.to_string(),
        }
    } else {
        FetchError::Network {
            location: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// HTTP fetcher from the config, or a local checkout when `local_root` is set
pub fn build_fetcher(
    config: &QuestScraperConfig,
    local_root: Option<PathBuf>,
) -> Result<Box<dyn SourceFetcher>, ScraperError> {
    match local_root {
        Some(root) => Ok(Box::new(
            LocalSourceFetcher::new(root).with_max_source_bytes(config.fetch.max_source_bytes),
        )),
        None => Ok(Box::new(HttpSourceFetcher::new(&config.fetch)?)),
    }
}

pub fn batch_config(config: &QuestScraperConfig) -> BatchConfig {
    BatchConfig::from(&config.batch)
}

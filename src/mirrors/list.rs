//! Mirror list retrieval.
//!
//! # Responsibilities
//! - Fetch the list over HTTP(S) or read it from a `file://` URL
//! - Hand the text to the parser and return the candidates
//!
//! # Design Decisions
//! - Fetched on every request; the list is never cached
//! - A non-success status from the list server is an error, not an empty list

use std::time::Duration;

use url::Url;

use crate::config::MirrorListConfig;
use crate::mirrors::parse::parse_mirror_list;
use crate::race::Candidate;

/// Error type for mirror list retrieval.
#[derive(Debug, thiserror::Error)]
pub enum MirrorListError {
    #[error("invalid mirror list location: {0}")]
    Location(#[from] url::ParseError),
    #[error("unsupported mirror list scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("failed to fetch mirror list: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("mirror list server returned {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to read mirror list file: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of candidate mirrors.
#[derive(Debug, Clone)]
pub struct MirrorList {
    location: Url,
    client: reqwest::Client,
}

impl MirrorList {
    /// Create a provider from configuration.
    pub fn from_config(config: &MirrorListConfig) -> Result<Self, MirrorListError> {
        let location = Url::parse(config.list_url.trim())?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;
        Self::new(location, client)
    }

    pub fn new(location: Url, client: reqwest::Client) -> Result<Self, MirrorListError> {
        match location.scheme() {
            "http" | "https" | "file" => Ok(Self { location, client }),
            other => Err(MirrorListError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Retrieve and parse the current mirror list.
    pub async fn candidates(&self) -> Result<Vec<Candidate>, MirrorListError> {
        let text = self.fetch().await?;
        let candidates = parse_mirror_list(&text);
        tracing::debug!(
            location = %self.location,
            count = candidates.len(),
            "Mirror list loaded"
        );
        Ok(candidates)
    }

    async fn fetch(&self) -> Result<String, MirrorListError> {
        if self.location.scheme() == "file" {
            let path = self
                .location
                .to_file_path()
                .map_err(|_| MirrorListError::UnsupportedScheme("file".to_string()))?;
            return Ok(tokio::fs::read_to_string(path).await?);
        }

        let response = self.client.get(self.location.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MirrorListError::Status(status));
        }
        Ok(response.text().await?)
    }
}

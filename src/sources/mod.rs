//! Email discovery strategies with a trait-based fallback chain.
//!
//! This module defines the [`EmailSource`] trait implemented by each way of
//! finding a contact address for a GitHub user:
//!
//! - [`ProfilePageSource`]: scrapes the public profile page, first the
//!   structured `itemprop="email"` field, then any email-shaped text
//! - [`ReadmeSource`]: scans the README of the user's most-starred repository
//!
//! [`ExtractionChain`] tries sources in order and stops at the first success.
//! Sources return explicit [`SourceError`]s; the chain logs them and turns
//! "nothing found anywhere" into an absent result.

mod chain;
pub mod mock;
mod profile;
mod readme;

pub use chain::{ChainOutcome, Discovery, ExtractionChain, SourceFailure};
pub use mock::MockEmailSource;
pub use profile::ProfilePageSource;
pub use readme::ReadmeSource;

use crate::models::Email;
use async_trait::async_trait;

/// A strategy that tries to find a contact email for one user.
///
/// # Implementing a New Source
///
/// 1. Create a struct that implements `EmailSource`
/// 2. Return `SourceError::NotFound` when the source has no usable address
/// 3. Add it to an [`ExtractionChain`] in the position it should be tried
#[async_trait]
pub trait EmailSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "profile", "readme")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Look up a contact email for `username`
    async fn lookup(&self, username: &str) -> Result<Email, SourceError>;

    /// Like [`lookup`](Self::lookup), logging the failure instead of returning it
    async fn find(&self, username: &str) -> Option<Email> {
        match self.lookup(username).await {
            Ok(email) => Some(email),
            Err(e) if e.is_not_found() => {
                tracing::debug!("{} has no email for {}: {}", self.id(), username, e);
                None
            }
            Err(e) => {
                tracing::warn!("{} lookup failed for {}: {}", self.id(), username, e);
                None
            }
        }
    }
}

/// Errors that can occur when talking to GitHub or interpreting its data
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Connection failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status from upstream
    #[error("Upstream returned {status} for {url}")]
    Upstream { status: u16, url: String },

    /// Rate limit exhausted
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Malformed HTML, JSON, or base64
    #[error("Parse error: {0}")]
    Parse(String),

    /// The data does not exist (no repos, no README, no email)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unusable configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SourceError {
    /// Whether this error only means "no data", as opposed to a failed call
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<base64::DecodeError> for SourceError {
    fn from(err: base64::DecodeError) -> Self {
        SourceError::Parse(format!("base64: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::Upstream {
            status: 404,
            url: "https://api.github.com/users/ghost".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Upstream returned 404 for https://api.github.com/users/ghost"
        );
        assert!(!err.is_not_found());
        assert!(SourceError::NotFound("README".to_string()).is_not_found());
    }

    #[test]
    fn test_json_error_maps_to_parse() {
        let err: SourceError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, SourceError::Parse(msg) if msg.starts_with("JSON")));
    }

    #[tokio::test]
    async fn test_find_turns_errors_into_none() {
        let found = MockEmailSource::found("a", Email::parse("a@dev.io").unwrap());
        assert_eq!(found.find("x").await.map(|e| e.to_string()), Some("a@dev.io".to_string()));
        assert!(MockEmailSource::missing("b").find("x").await.is_none());
    }
}

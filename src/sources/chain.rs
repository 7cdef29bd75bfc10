//! Ordered first-success chain over email sources.

use std::sync::Arc;

use super::{EmailSource, ProfilePageSource, ReadmeSource, SourceError};
use crate::github::GitHubClient;
use crate::models::Email;

/// An email together with the source that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub email: Email,
    pub source: String,
}

/// A source that was tried and came back empty
#[derive(Debug)]
pub struct SourceFailure {
    pub source: String,
    pub error: SourceError,
}

/// Result of running the chain for one user
#[derive(Debug, Default)]
pub struct ChainOutcome {
    pub discovery: Option<Discovery>,
    /// Sources tried before the successful one (or all, if none succeeded)
    pub failures: Vec<SourceFailure>,
}

impl ChainOutcome {
    pub fn email(&self) -> Option<&Email> {
        self.discovery.as_ref().map(|d| &d.email)
    }

    pub fn into_email(self) -> Option<Email> {
        self.discovery.map(|d| d.email)
    }
}

/// Tries each source in order and stops at the first address found
#[derive(Debug, Clone, Default)]
pub struct ExtractionChain {
    sources: Vec<Arc<dyn EmailSource>>,
}

impl ExtractionChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile page first, then the top repository README
    pub fn github(client: GitHubClient) -> Self {
        Self::new()
            .with_source(Arc::new(ProfilePageSource::new(client.clone())))
            .with_source(Arc::new(ReadmeSource::new(client)))
    }

    /// Append a source to the end of the chain
    pub fn with_source(mut self, source: Arc<dyn EmailSource>) -> Self {
        self.push(source);
        self
    }

    /// Append a source to the end of the chain
    pub fn push(&mut self, source: Arc<dyn EmailSource>) {
        self.sources.push(source);
    }

    /// Source IDs in the order they are tried
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.id())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Run the chain, keeping the reason each skipped source failed
    pub async fn lookup(&self, username: &str) -> ChainOutcome {
        let mut outcome = ChainOutcome::default();

        for source in &self.sources {
            match source.lookup(username).await {
                Ok(email) => {
                    tracing::info!("Found email for {} via {}: {}", username, source.id(), email);
                    outcome.discovery = Some(Discovery {
                        email,
                        source: source.id().to_string(),
                    });
                    return outcome;
                }
                Err(error) => {
                    if error.is_not_found() {
                        tracing::debug!("{}: nothing for {}: {}", source.name(), username, error);
                    } else {
                        tracing::warn!("{} failed for {}: {}", source.name(), username, error);
                    }
                    outcome.failures.push(SourceFailure {
                        source: source.id().to_string(),
                        error,
                    });
                }
            }
        }

        outcome
    }

    /// First address any source finds, or `None`
    pub async fn extract_email(&self, username: &str) -> Option<Email> {
        self.lookup(username).await.into_email()
    }
}

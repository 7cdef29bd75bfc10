//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::models::Email;
use crate::sources::{EmailSource, SourceError};

/// A source that returns a fixed answer and counts how often it was asked.
#[derive(Debug)]
pub struct MockEmailSource {
    id: String,
    email: Option<Email>,
    calls: AtomicUsize,
}

impl MockEmailSource {
    /// A source that always finds `email`
    pub fn found(id: &str, email: Email) -> Self {
        Self {
            id: id.to_string(),
            email: Some(email),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source that never finds anything
    pub fn missing(id: &str) -> Self {
        Self {
            id: id.to_string(),
            email: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailSource for MockEmailSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn lookup(&self, username: &str) -> Result<Email, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.email
            .clone()
            .ok_or_else(|| SourceError::NotFound(format!("mock has nothing for {}", username)))
    }
}

//! Candidate developer model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Email, ScoreCard};

/// A searched-for user enriched with a contact email and a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateUser {
    /// GitHub login
    pub username: String,

    /// Zero-based position in the upstream search result
    pub rank: usize,

    /// Discovered contact email
    pub email: Option<Email>,

    /// Popularity score (0.0 when the counters were unavailable)
    pub score: f64,

    pub followers: u64,
    pub public_repos: u64,
    pub total_stars: u64,
    pub total_forks: u64,

    /// Search result item as returned upstream
    #[serde(default)]
    pub profile: Value,
}

impl CandidateUser {
    /// Create a candidate with no email and zero score
    pub fn new(username: impl Into<String>, rank: usize) -> Self {
        Self {
            username: username.into(),
            rank,
            email: None,
            score: 0.0,
            followers: 0,
            public_repos: 0,
            total_stars: 0,
            total_forks: 0,
            profile: Value::Null,
        }
    }

    /// Build from a raw search item; items without a `login` are skipped.
    pub fn from_search_item(rank: usize, item: Value) -> Option<Self> {
        let login = item.get("login")?.as_str()?.trim();
        if login.is_empty() {
            return None;
        }

        let mut candidate = Self::new(login, rank);
        candidate.profile = item;
        Some(candidate)
    }

    /// Set the contact email
    pub fn with_email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    /// Copy the score and its counters onto the candidate
    pub fn apply_score(&mut self, card: &ScoreCard) {
        self.score = card.score;
        let details = card.details.unwrap_or_default();
        self.followers = details.followers;
        self.public_repos = details.public_repos;
        self.total_stars = details.total_stars;
        self.total_forks = details.total_forks;
    }

    /// Profile link from the search item, if present
    pub fn html_url(&self) -> Option<&str> {
        self.profile.get("html_url").and_then(Value::as_str)
    }

    /// Avatar link from the search item, if present
    pub fn avatar_url(&self) -> Option<&str> {
        self.profile.get("avatar_url").and_then(Value::as_str)
    }
}

//! Popularity scoring from public GitHub counters.
//!
//! Stars and forks are summed over the first page of repositories only
//! (`scoring.repo_cap`, at most 100), so prolific users are under-counted.

use crate::config::Config;
use crate::github::{GitHubClient, RepoListing};
use crate::models::{ScoreCard, ScoreDetails};
use crate::sources::SourceError;

/// Fetches a user's counters and turns them into a [`ScoreCard`]
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    client: GitHubClient,
    repo_cap: u32,
}

impl ScoreCalculator {
    pub fn new(client: GitHubClient, repo_cap: u32) -> Self {
        Self { client, repo_cap }
    }

    pub fn from_config(client: GitHubClient, config: &Config) -> Self {
        Self::new(client, config.scoring.repo_cap)
    }

    /// Score a user, reporting why it could not be done
    pub async fn try_score(&self, username: &str) -> Result<ScoreCard, SourceError> {
        let user = self.client.user(username).await?;
        let repos = self
            .client
            .list_repos(username, RepoListing::first_page(self.repo_cap))
            .await?;

        if repos.is_empty() {
            return Err(SourceError::NotFound(format!("no repositories for {}", username)));
        }

        let total_stars = repos.iter().map(|r| r.stargazers_count).sum();
        let total_forks = repos.iter().map(|r| r.forks_count).sum();
        let details = ScoreDetails::new(user.followers, user.public_repos, total_stars, total_forks);

        tracing::debug!(
            "Scored {}: {} repos, {} followers, {} stars, {} forks",
            username,
            details.public_repos,
            details.followers,
            details.total_stars,
            details.total_forks
        );

        Ok(ScoreCard::from_details(details))
    }

    /// Score a user, falling back to a zero card on any failure
    pub async fn score_user(&self, username: &str) -> ScoreCard {
        match self.try_score(username).await {
            Ok(card) => card,
            Err(e) if e.is_not_found() => {
                tracing::debug!("No score data for {}: {}", username, e);
                ScoreCard::zero()
            }
            Err(e) => {
                tracing::warn!("Failed to score {}: {}", username, e);
                ScoreCard::zero()
            }
        }
    }
}

//! README email source.

use async_trait::async_trait;

use crate::github::{GitHubClient, RepoListing, Repository};
use crate::models::{first_valid_email, Email};
use crate::sources::{EmailSource, SourceError};

/// Scans the README of the user's most-starred repository.
#[derive(Debug, Clone)]
pub struct ReadmeSource {
    client: GitHubClient,
}

impl ReadmeSource {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    /// Email from the top repository's README, absent on any failure
    pub async fn extract_from_readme(&self, username: &str) -> Option<Email> {
        self.find(username).await
    }

    /// Most-starred repository; the earliest one wins a tie
    fn top_repository(repos: Vec<Repository>) -> Option<Repository> {
        repos.into_iter().reduce(|best, repo| {
            if repo.stargazers_count > best.stargazers_count {
                repo
            } else {
                best
            }
        })
    }
}

#[async_trait]
impl EmailSource for ReadmeSource {
    fn id(&self) -> &str {
        "readme"
    }

    fn name(&self) -> &str {
        "Top repository README"
    }

    async fn lookup(&self, username: &str) -> Result<Email, SourceError> {
        let repos = self
            .client
            .list_repos(username, RepoListing::top_starred())
            .await?;

        let repo = Self::top_repository(repos)
            .ok_or_else(|| SourceError::NotFound(format!("no repositories for {}", username)))?;

        let readme = self
            .client
            .readme(username, &repo.name)
            .await
            .inspect_err(|e| tracing::debug!("No README in {}/{}: {}", username, repo.name, e))?;

        let text = readme.decode()?;
        match first_valid_email(&text) {
            Some(email) => {
                tracing::debug!("Found email in README of {}/{}: {}", username, repo.name, email);
                Ok(email)
            }
            None => Err(SourceError::NotFound(format!(
                "no email in README of {}/{}",
                username, repo.name
            ))),
        }
    }
}

//! Search orchestration: user search, email discovery, scoring, ranking.
//!
//! Users are processed one at a time in upstream order. Each user goes
//! through the extraction chain, then the pacer, then (only if an email was
//! found) the score calculator. Users without an email are dropped.

use std::sync::Arc;

use crate::config::Config;
use crate::github::GitHubClient;
use crate::models::{CandidateUser, SearchCriteria, SearchProgress};
use crate::scoring::ScoreCalculator;
use crate::sources::{ExtractionChain, SourceError};
use crate::utils::{pacer_from_config, Pacer};

/// Runs a developer search end to end
#[derive(Debug, Clone)]
pub struct Orchestrator {
    client: GitHubClient,
    chain: ExtractionChain,
    scorer: ScoreCalculator,
    pacer: Arc<dyn Pacer>,
    page_size: u32,
}

impl Orchestrator {
    pub fn new(
        client: GitHubClient,
        chain: ExtractionChain,
        scorer: ScoreCalculator,
        pacer: Arc<dyn Pacer>,
        page_size: u32,
    ) -> Self {
        Self {
            client,
            chain,
            scorer,
            pacer,
            page_size,
        }
    }

    /// Wire up the GitHub client, the default chain, scorer, and pacer
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let client = GitHubClient::new(config)?;
        if !client.is_authenticated() {
            tracing::info!("No GitHub token configured; using unauthenticated rate limits");
        }

        Ok(Self::new(
            client.clone(),
            ExtractionChain::github(client.clone()),
            ScoreCalculator::from_config(client, config),
            pacer_from_config(&config.pacing)?,
            config.search.page_size,
        ))
    }

    pub fn chain(&self) -> &ExtractionChain {
        &self.chain
    }

    pub fn scorer(&self) -> &ScoreCalculator {
        &self.scorer
    }

    /// Search and rank candidates; upstream failures yield an empty list
    pub async fn search(&self, criteria: &SearchCriteria) -> Vec<CandidateUser> {
        self.search_with_progress(criteria, |_| {}).await
    }

    /// Like [`search`](Self::search), reporting after each processed user
    pub async fn search_with_progress<F>(
        &self,
        criteria: &SearchCriteria,
        on_progress: F,
    ) -> Vec<CandidateUser>
    where
        F: FnMut(SearchProgress<'_>) + Send,
    {
        match self.try_search(criteria, on_progress).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("GitHub user search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Search, surfacing a failure of the user-search call itself.
    ///
    /// Per-user failures never surface here; they only drop or zero that user.
    pub async fn try_search<F>(
        &self,
        criteria: &SearchCriteria,
        mut on_progress: F,
    ) -> Result<Vec<CandidateUser>, SourceError>
    where
        F: FnMut(SearchProgress<'_>) + Send,
    {
        let Some(query) = criteria.query() else {
            tracing::warn!("Empty search criteria; skipping user search");
            return Ok(Vec::new());
        };

        let items = self.client.search_users(&query, self.page_size).await?;
        let users: Vec<CandidateUser> = items
            .into_iter()
            .enumerate()
            .filter_map(|(rank, item)| {
                let candidate = CandidateUser::from_search_item(rank, item);
                if candidate.is_none() {
                    tracing::debug!("Skipping search item {} without a login", rank);
                }
                candidate
            })
            .collect();
        let total = users.len();
        let mut candidates = Vec::new();

        for candidate in users {
            let rank = candidate.rank;
            tracing::debug!("Extracting email for: {}", candidate.username);
            let email = self.chain.extract_email(&candidate.username).await;
            self.pacer.pause().await;

            on_progress(SearchProgress {
                index: rank,
                total,
                username: &candidate.username,
                found: email.is_some(),
            });

            let Some(email) = email else {
                continue;
            };

            let card = self.scorer.score_user(&candidate.username).await;
            let mut candidate = candidate.with_email(email);
            candidate.apply_score(&card);
            candidates.push(candidate);
        }

        rank_candidates(&mut candidates);
        tracing::info!(
            "Search '{}' produced {} candidates from {} users",
            query,
            candidates.len(),
            total
        );
        Ok(candidates)
    }
}

/// Sort by score, highest first; equal scores keep search order
pub fn rank_candidates(candidates: &mut [CandidateUser]) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.rank.cmp(&b.rank)));
}

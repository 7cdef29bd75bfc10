//! Typed access to the GitHub REST API and public profile pages.

mod types;

pub use types::{Readme, RepoListing, Repository, SearchUsersResponse, UserMetadata};

use reqwest::header::{HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

use crate::config::Config;
use crate::sources::SourceError;
use crate::utils::HttpClient;

const GITHUB_JSON: &str = "application/vnd.github.v3+json";

/// GitHub client bound to one configuration.
///
/// API calls carry a bearer token when one is configured; the HTML profile
/// fetch never does.
#[derive(Clone)]
pub struct GitHubClient {
    http: HttpClient,
    api_base: String,
    web_base: String,
    token: Option<String>,
    browser_user_agent: String,
}

impl GitHubClient {
    /// Build a client from the configuration
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let http = HttpClient::from_config(&config.http, &config.github.user_agent)?;
        Self::with_http(http, config)
    }

    /// Build a client around an existing HTTP client
    pub fn with_http(http: HttpClient, config: &Config) -> Result<Self, SourceError> {
        HeaderValue::from_str(&config.github.browser_user_agent).map_err(|_| {
            SourceError::InvalidConfig("browser_user_agent is not a valid header value".to_string())
        })?;

        Ok(Self {
            http,
            api_base: config.github.api_base_url.trim_end_matches('/').to_string(),
            web_base: config.github.web_base_url.trim_end_matches('/').to_string(),
            token: config.github.token.clone(),
            browser_user_agent: config.github.browser_user_agent.clone(),
        })
    }

    /// Whether API calls are authenticated
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Public profile page URL for a user
    pub fn profile_url(&self, username: &str) -> String {
        format!("{}/{}", self.web_base, urlencoding::encode(username))
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Add the JSON accept header and the token if available
    fn api_get(&self, url: &str) -> RequestBuilder {
        let builder = self.http.get(url).header(ACCEPT, GITHUB_JSON);
        if let Some(ref token) = self.token {
            builder.bearer_auth(token)
        } else {
            builder
        }
    }

    /// Search users; returns the raw result items in upstream order
    pub async fn search_users(&self, query: &str, per_page: u32) -> Result<Vec<Value>, SourceError> {
        let url = self.api_url("/search/users");
        let per_page = per_page.to_string();
        let request = self
            .api_get(&url)
            .query(&[("q", query), ("per_page", per_page.as_str())]);

        let response: SearchUsersResponse = self.fetch_json(request, &url).await?;
        tracing::debug!(
            "User search '{}' matched {} users, {} returned",
            query,
            response.total_count,
            response.items.len()
        );
        Ok(response.items)
    }

    /// List a user's repositories
    pub async fn list_repos(
        &self,
        username: &str,
        listing: RepoListing,
    ) -> Result<Vec<Repository>, SourceError> {
        let url = self.api_url(&format!("/users/{}/repos", urlencoding::encode(username)));
        let per_page = listing.per_page.to_string();

        let mut request = self.api_get(&url);
        if let Some(sort) = listing.sort {
            request = request.query(&[("sort", sort)]);
        }
        request = request.query(&[("per_page", per_page.as_str())]);

        self.fetch_json(request, &url).await
    }

    /// Fetch the README resource of a repository
    pub async fn readme(&self, owner: &str, repo: &str) -> Result<Readme, SourceError> {
        let url = self.api_url(&format!(
            "/repos/{}/{}/readme",
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        ));
        self.fetch_json(self.api_get(&url), &url).await
    }

    /// Fetch user metadata
    pub async fn user(&self, username: &str) -> Result<UserMetadata, SourceError> {
        let url = self.api_url(&format!("/users/{}", urlencoding::encode(username)));
        self.fetch_json(self.api_get(&url), &url).await
    }

    /// Fetch the HTML profile page with a browser user agent
    pub async fn profile_page(&self, username: &str) -> Result<String, SourceError> {
        let url = self.profile_url(username);
        tracing::debug!("Fetching profile page: {}", url);

        let response = self
            .http
            .get(&url)
            .header(USER_AGENT, &self.browser_user_agent)
            .header(ACCEPT, "text/html")
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        let response = check_status(response, &url)?;
        response
            .text()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to read HTML: {}", e)))
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<T, SourceError> {
        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        let response = check_status(response, url)?;
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read {}: {}", url, e)))?;

        Ok(serde_json::from_str(&body)?)
    }
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_base", &self.api_base)
            .field("web_base", &self.web_base)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

/// Map non-success statuses onto the error taxonomy
fn check_status(response: Response, url: &str) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound(url.to_string()));
    }

    let exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "0");
    if status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && exhausted)
    {
        tracing::warn!("GitHub rate limit exhausted at {}", url);
        return Err(SourceError::RateLimit);
    }

    Err(SourceError::Upstream {
        status: status.as_u16(),
        url: url.to_string(),
    })
}

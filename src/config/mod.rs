//! Configuration management.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `DEVSCOUT_` environment variables (nested keys use `__`, e.g.
//! `DEVSCOUT_PACING__DELAY_MS=500`). `GITHUB_TOKEN` is used when no token is
//! configured anywhere else.
//!
//! ```toml
//! [github]
//! api_base_url = "https://api.github.com"
//! web_base_url = "https://github.com"
//! token = "ghp_..."
//!
//! [http]
//! timeout_seconds = 30
//!
//! [search]
//! page_size = 100
//!
//! [scoring]
//! repo_cap = 100
//!
//! [pacing]
//! strategy = "fixed"
//! delay_ms = 1000
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest page the GitHub REST API will return.
pub const MAX_PAGE_SIZE: u32 = 100;

const CONFIG_FILE_NAME: &str = "devscout.toml";
const ENV_PREFIX: &str = "DEVSCOUT";
const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream endpoints and credentials
    #[serde(default)]
    pub github: GithubConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// User search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Score calculation settings
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Per-user pacing between upstream calls
    #[serde(default)]
    pub pacing: PacingConfig,
}

impl Config {
    /// Point the API and profile-page requests at other hosts
    pub fn with_base_urls(mut self, api_base_url: &str, web_base_url: &str) -> Self {
        self.github.api_base_url = api_base_url.to_string();
        self.github.web_base_url = web_base_url.to_string();
        self
    }

    /// Set or clear the API token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.github.token = token;
        self
    }

    /// Replace the pacing policy
    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Clamp page sizes into the API's range and reject unusable pacing.
    pub fn validate(mut self) -> Result<Self, config::ConfigError> {
        self.search.page_size = self.search.page_size.clamp(1, MAX_PAGE_SIZE);
        self.scoring.repo_cap = self.scoring.repo_cap.clamp(1, MAX_PAGE_SIZE);
        self.github.token = non_empty(self.github.token.take());

        if self.pacing.strategy == PacingStrategy::Quota && self.pacing.users_per_minute == 0 {
            return Err(config::ConfigError::Message(
                "pacing.users_per_minute must be greater than zero".to_string(),
            ));
        }
        if self.http.timeout_seconds == 0 {
            return Err(config::ConfigError::Message(
                "http.timeout_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(self)
    }

    /// Copy with the token masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.github.token.is_some() {
            copy.github.token = Some("***".to_string());
        }
        copy
    }
}

/// GitHub endpoints and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// REST API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Public web base URL (profile pages)
    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,

    /// Bearer token for API calls (optional, for higher rate limits)
    #[serde(default)]
    pub token: Option<String>,

    /// User agent for API calls
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// User agent for the HTML profile page
    #[serde(default = "default_browser_user_agent")]
    pub browser_user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            web_base_url: default_web_base_url(),
            token: env_token(),
            user_agent: default_user_agent(),
            browser_user_agent: default_browser_user_agent(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_web_base_url() -> String {
    "https://github.com".to_string()
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_browser_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Connection establishment timeout
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// User search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Users requested from the search endpoint (single page)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

/// Score calculation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Repositories counted towards stars and forks (first page only)
    #[serde(default = "default_repo_cap")]
    pub repo_cap: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            repo_cap: default_repo_cap(),
        }
    }
}

fn default_repo_cap() -> u32 {
    MAX_PAGE_SIZE
}

/// How the orchestrator waits between users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacingStrategy {
    /// Sleep a fixed delay after every user
    Fixed,
    /// Token bucket admitting `users_per_minute` users per minute; each user costs several API calls
    Quota,
    /// Do not wait
    #[serde(rename = "none")]
    Disabled,
}

/// Pacing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_strategy")]
    pub strategy: PacingStrategy,

    /// Delay for the fixed strategy
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Rate for the quota strategy
    #[serde(default = "default_users_per_minute")]
    pub users_per_minute: u32,
}

impl PacingConfig {
    /// Pacing that never waits
    pub fn disabled() -> Self {
        Self {
            strategy: PacingStrategy::Disabled,
            ..Self::default()
        }
    }

    /// Fixed delay after every user
    pub fn fixed(delay_ms: u64) -> Self {
        Self {
            strategy: PacingStrategy::Fixed,
            delay_ms,
            ..Self::default()
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            delay_ms: default_delay_ms(),
            users_per_minute: default_users_per_minute(),
        }
    }
}

fn default_strategy() -> PacingStrategy {
    PacingStrategy::Fixed
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_users_per_minute() -> u32 {
    60
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_token() -> Option<String> {
    non_empty(std::env::var(TOKEN_ENV_VAR).ok())
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut loaded: Config = settings.try_deserialize()?;
    if non_empty(loaded.github.token.clone()).is_none() {
        loaded.github.token = env_token();
    }

    loaded.validate()
}

/// Look for a config file in the working directory, then the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("config.toml"))
        .filter(|path| path.is_file())
}

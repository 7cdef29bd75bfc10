//! # devscout
//!
//! Finds GitHub developers by language and location, discovers a contact
//! email for each, and ranks them by public activity.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (CandidateUser, Email, ScoreCard, etc.)
//! - [`github`]: Typed client for the GitHub REST API and profile pages
//! - [`sources`]: Email discovery strategies and the fallback chain
//! - [`scoring`]: Popularity score calculation
//! - [`search`]: The search orchestrator tying everything together
//! - [`utils`]: HTTP client and pacing policies
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal rendering for the CLI
//!
//! ## Example
//!
//! ```rust,no_run
//! use devscout::config::Config;
//! use devscout::models::SearchCriteria;
//! use devscout::search::Orchestrator;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::from_config(&Config::default())?;
//! let candidates = orchestrator
//!     .search(&SearchCriteria::new("rust", "seoul"))
//!     .await;
//! for candidate in candidates {
//!     println!("{} {:?} {}", candidate.username, candidate.email, candidate.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod github;
pub mod models;
pub mod scoring;
pub mod search;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{CandidateUser, Email, SearchCriteria};
pub use search::Orchestrator;
pub use sources::{EmailSource, ExtractionChain, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Utility modules supporting the search pipeline.
//!
//! - [`HttpClient`]: shared HTTP client with configured timeouts
//! - [`Pacer`]: throttling policy consulted between users, with
//!   [`FixedDelay`], [`QuotaPacer`], and [`NoDelay`] implementations
//!
//! # Pacing
//!
//! ```rust,no_run
//! use devscout::utils::{FixedDelay, Pacer};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let pacer = FixedDelay::new(Duration::from_secs(1));
//! pacer.pause().await;
//! # }
//! ```

mod http;
mod pacing;

pub use http::HttpClient;
pub use pacing::{pacer_from_config, FixedDelay, NoDelay, Pacer, QuotaPacer};

//! Core data models for candidates, contact emails, and scores.

mod candidate;
mod email;
mod score;
mod search;

pub use candidate::CandidateUser;
pub use email::{find_emails, first_valid_email, is_placeholder, is_valid, Email, EMAIL_PATTERN};
pub use score::{ScoreCard, ScoreDetails};
pub use search::{SearchCriteria, SearchProgress};

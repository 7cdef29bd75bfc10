//! Popularity score built from public activity counters.

use serde::{Deserialize, Serialize};

const REPO_WEIGHT: f64 = 1.0;
const FOLLOWER_WEIGHT: f64 = 2.0;
const STAR_WEIGHT: f64 = 3.0;
const FORK_WEIGHT: f64 = 1.5;

/// Raw counters the score is computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub followers: u64,
    pub public_repos: u64,
    pub total_stars: u64,
    pub total_forks: u64,
}

impl ScoreDetails {
    pub fn new(followers: u64, public_repos: u64, total_stars: u64, total_forks: u64) -> Self {
        Self {
            followers,
            public_repos,
            total_stars,
            total_forks,
        }
    }

    /// Weighted sum of the counters, rounded to one decimal place.
    pub fn score(&self) -> f64 {
        let raw = self.public_repos as f64 * REPO_WEIGHT
            + self.followers as f64 * FOLLOWER_WEIGHT
            + self.total_stars as f64 * STAR_WEIGHT
            + self.total_forks as f64 * FORK_WEIGHT;
        round_to_tenth(raw)
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Score together with the counters it came from.
///
/// `details` is `None` when the counters could not be fetched; the score is
/// then `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub score: f64,
    pub details: Option<ScoreDetails>,
}

impl ScoreCard {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_details(details: ScoreDetails) -> Self {
        Self {
            score: details.score(),
            details: Some(details),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.details.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_score() {
        let details = ScoreDetails::new(5, 10, 20, 4);
        assert_eq!(details.score(), 86.0);
    }

    #[test]
    fn test_score_rounds_to_one_decimal() {
        // 1 + 0 + 0 + 1.5 * 3 = 5.5
        assert_eq!(ScoreDetails::new(0, 1, 0, 3).score(), 5.5);
        assert_eq!(round_to_tenth(3.14159), 3.1);
        assert_eq!(round_to_tenth(2.25), 2.3);
    }

    #[test]
    fn test_zero_card() {
        let card = ScoreCard::zero();
        assert_eq!(card.score, 0.0);
        assert!(card.details.is_none());
        assert!(card.is_zero());
    }

    #[test]
    fn test_card_from_details() {
        let card = ScoreCard::from_details(ScoreDetails::new(1, 2, 3, 4));
        // 2 + 2 + 9 + 6
        assert_eq!(card.score, 19.0);
        assert_eq!(card.details.unwrap().total_stars, 3);
    }
}

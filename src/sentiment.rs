//! Sentiment bucketing

use crate::models::SentimentBucket;

/// Scores strictly above this value are positive
pub const POSITIVE_THRESHOLD: f64 = 0.20;
/// Scores strictly below this value are negative
pub const NEGATIVE_THRESHOLD: f64 = -0.20;

/// Classify an optional sentiment score.
///
/// Both thresholds are exclusive, so `0.20` and `-0.20` land in
/// [`SentimentBucket::Neutral`]. NaN compares false against both thresholds
/// and is also neutral.
#[must_use]
pub fn bucketize(score: Option<f64>) -> SentimentBucket {
    match score {
        None => SentimentBucket::Unknown,
        Some(s) if s > POSITIVE_THRESHOLD => SentimentBucket::Positive,
        Some(s) if s < NEGATIVE_THRESHOLD => SentimentBucket::Negative,
        Some(_) => SentimentBucket::Neutral,
    }
}

//! Data models for incoming events and stored rows
//!
//! This module contains the wire record decoded from the topic, the derived
//! sentiment bucket, and the database representations of a processed message.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::sentiment::bucketize;

/// An event record as published on the buzzline topic
///
/// Every key is optional. Absent keys and explicit `null` both decode to `None`,
/// and keys not listed here are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomingEvent {
    /// Source timestamp, passed through unvalidated
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Message author
    #[serde(default)]
    pub author: Option<String>,
    /// Message category
    #[serde(default)]
    pub category: Option<String>,
    /// Sentiment score, nominally -1.0 to 1.0
    #[serde(default)]
    pub sentiment: Option<f64>,
    /// Length of the message as computed by the producer.
    ///
    /// A float with no fractional part, such as `42.0`, is accepted.
    #[serde(default, deserialize_with = "whole_number")]
    pub message_length: Option<i64>,
    /// Keyword the producer detected in the message
    #[serde(default)]
    pub keyword_mentioned: Option<String>,
    /// Message body
    #[serde(default)]
    pub message: Option<String>,
}

/// 2^63, the first float past `i64::MAX`
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

#[allow(clippy::cast_possible_truncation)]
fn whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    number
        .as_i64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(f))
                .map(|f| f as i64)
        })
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("expected a whole number, got {number}")))
}

/// Coarse classification of a sentiment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentBucket {
    /// Score above the positive threshold
    Positive,
    /// Score below the negative threshold
    Negative,
    /// Score within the thresholds, inclusive
    Neutral,
    /// No score was provided
    Unknown,
}

impl SentimentBucket {
    /// Get the stored string form of this bucket
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SentimentBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four bucket names
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized sentiment bucket: {0}")]
pub struct ParseBucketError(pub String);

impl FromStr for SentimentBucket {
    type Err = ParseBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            "unknown" => Ok(Self::Unknown),
            other => Err(ParseBucketError(other.to_string())),
        }
    }
}

impl ToSql for SentimentBucket {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for SentimentBucket {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Data for inserting a new processed message
#[derive(Debug, Clone, PartialEq)]
pub struct NewProcessedMessage {
    /// Source timestamp
    pub ts: Option<String>,
    /// Message author
    pub author: Option<String>,
    /// Message category
    pub category: Option<String>,
    /// Raw sentiment score
    pub sentiment: Option<f64>,
    /// Bucket derived from `sentiment`
    pub sentiment_bucket: SentimentBucket,
    /// Producer-reported message length
    pub message_length: Option<i64>,
    /// Keyword the producer detected
    pub keyword_mentioned: Option<String>,
    /// Original message body
    pub raw_message: Option<String>,
}

impl From<IncomingEvent> for NewProcessedMessage {
    fn from(event: IncomingEvent) -> Self {
        Self {
            sentiment_bucket: bucketize(event.sentiment),
            ts: event.timestamp,
            author: event.author,
            category: event.category,
            sentiment: event.sentiment,
            message_length: event.message_length,
            keyword_mentioned: event.keyword_mentioned,
            raw_message: event.message,
        }
    }
}

/// Database representation of a processed message
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedMessage {
    /// Database primary key
    pub id: i64,
    /// Source timestamp
    pub ts: Option<String>,
    /// Message author
    pub author: Option<String>,
    /// Message category
    pub category: Option<String>,
    /// Raw sentiment score
    pub sentiment: Option<f64>,
    /// Derived sentiment bucket
    pub sentiment_bucket: SentimentBucket,
    /// Producer-reported message length
    pub message_length: Option<i64>,
    /// Keyword the producer detected
    pub keyword_mentioned: Option<String>,
    /// Original message body
    pub raw_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_string_forms() {
        for bucket in [
            SentimentBucket::Positive,
            SentimentBucket::Negative,
            SentimentBucket::Neutral,
            SentimentBucket::Unknown,
        ] {
            assert_eq!(bucket.as_str().parse::<SentimentBucket>(), Ok(bucket));
            assert_eq!(bucket.to_string(), bucket.as_str());
        }
        assert!("Positive".parse::<SentimentBucket>().is_err());
    }

    #[test]
    fn test_event_ignores_unknown_keys_and_nulls() {
        let event: IncomingEvent =
            serde_json::from_str(r#"{"author":"bob","sentiment":null,"extra":[1,2,3]}"#).unwrap();
        assert_eq!(event.author.as_deref(), Some("bob"));
        assert_eq!(event.sentiment, None);
        assert_eq!(event.message, None);
    }

    #[test]
    fn test_message_length_accepts_whole_floats() {
        let event: IncomingEvent = serde_json::from_str(r#"{"message_length":42.0}"#).unwrap();
        assert_eq!(event.message_length, Some(42));

        let event: IncomingEvent = serde_json::from_str(r#"{"message_length":null}"#).unwrap();
        assert_eq!(event.message_length, None);

        assert!(serde_json::from_str::<IncomingEvent>(r#"{"message_length":42.5}"#).is_err());
        assert!(serde_json::from_str::<IncomingEvent>(r#"{"message_length":1e30}"#).is_err());
        assert!(serde_json::from_str::<IncomingEvent>(r#"{"message_length":"42"}"#).is_err());
    }

    #[test]
    fn test_new_processed_message_from_event() {
        let event = IncomingEvent {
            timestamp: Some("2024-01-01T00:00:00Z".to_string()),
            sentiment: Some(-0.75),
            message: Some("meh".to_string()),
            ..IncomingEvent::default()
        };
        let row = NewProcessedMessage::from(event);
        assert_eq!(row.sentiment_bucket, SentimentBucket::Negative);
        assert_eq!(row.ts.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(row.raw_message.as_deref(), Some("meh"));
        assert_eq!(row.author, None);
    }
}

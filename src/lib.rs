//! Buzz Consumer - Sentiment-Bucketed Event Sink
//!
//! A Rust library for consuming JSON events from a Kafka topic, classifying
//! their sentiment score into a bucket, and storing each event as a row in a
//! local SQLite database.
//!
//! # Features
//!
//! - Layered configuration from defaults, files and environment variables
//! - Idempotent SQLite store initialization
//! - Per-record failures are logged and skipped, never fatal
//! - Kafka source behind the `kafka` feature

/// Configuration management
pub mod config;
/// The consume loop
pub mod consumer;
/// Database operations and connection pooling
pub mod db;
/// Error types
pub mod error;
/// Logging setup and utilities
pub mod logging;
/// Data models and structures
pub mod models;
/// Per-record decode and enrichment
pub mod processor;
/// Database schema definitions
pub mod schema;
/// Sentiment bucketing
pub mod sentiment;
/// Record sources
pub mod source;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use config::AppConfig;
pub use consumer::ConsumeStats;
pub use db::Database;
pub use models::{IncomingEvent, ProcessedMessage, SentimentBucket};
pub use processor::MessageProcessor;
pub use sentiment::bucketize;

//! Database schema definitions
//!
//! Table and column names for the processed message store, used with rusqlite.

/// Processed messages table schema
pub mod processed_messages {
    /// Table name
    pub const TABLE: &str = "processed_messages";
    /// Primary key column
    pub const ID: &str = "id";
    /// Source timestamp column
    pub const TS: &str = "ts";
    /// Author column
    pub const AUTHOR: &str = "author";
    /// Category column
    pub const CATEGORY: &str = "category";
    /// Raw sentiment score column
    pub const SENTIMENT: &str = "sentiment";
    /// Derived sentiment bucket column
    pub const SENTIMENT_BUCKET: &str = "sentiment_bucket";
    /// Message length column, as reported by the producer
    pub const MESSAGE_LENGTH: &str = "message_length";
    /// Keyword column
    pub const KEYWORD_MENTIONED: &str = "keyword_mentioned";
    /// Original message body column
    pub const RAW_MESSAGE: &str = "raw_message";

    /// All columns in table order
    pub const COLUMNS: [&str; 9] = [
        ID,
        TS,
        AUTHOR,
        CATEGORY,
        SENTIMENT,
        SENTIMENT_BUCKET,
        MESSAGE_LENGTH,
        KEYWORD_MENTIONED,
        RAW_MESSAGE,
    ];
}

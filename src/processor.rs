//! Decode, enrich and store a single record

use serde::Deserialize;
use serde_json::Value;

use crate::db::Database;
use crate::error::{ProcessError, Result};
use crate::models::{IncomingEvent, NewProcessedMessage};
use crate::source::{Payload, RawRecord};

/// A record that made it into the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMessage {
    /// Row id assigned by the store
    pub id: i64,
    /// The enriched row as inserted
    pub message: NewProcessedMessage,
}

/// Turns raw records into stored rows
pub struct MessageProcessor {
    db: Database,
}

impl MessageProcessor {
    /// Create a processor writing into `db`
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// The store rows are written to
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// Decode a payload into an event.
    ///
    /// Bytes are read as UTF-8, with invalid sequences replaced by U+FFFD
    /// rather than rejected.
    pub fn decode(payload: Option<&Payload>) -> Result<IncomingEvent> {
        let parsed: Value;
        let value = match payload.ok_or(ProcessError::EmptyPayload)? {
            Payload::Json(value) => value,
            Payload::Text(text) => {
                parsed = serde_json::from_str(text)?;
                &parsed
            },
            Payload::Bytes(bytes) => {
                parsed = serde_json::from_str(&String::from_utf8_lossy(bytes))?;
                &parsed
            },
        };

        // serde would also accept a JSON array for a struct
        if !value.is_object() {
            return Err(ProcessError::NotAnObject);
        }

        Ok(IncomingEvent::deserialize(value)?)
    }

    /// Decode, bucket and insert one record
    pub fn process(&self, record: &RawRecord) -> Result<StoredMessage> {
        let event = Self::decode(record.payload.as_ref())?;
        let message = NewProcessedMessage::from(event);
        let id = self.db.insert_processed_message(&message)?;
        Ok(StoredMessage { id, message })
    }
}

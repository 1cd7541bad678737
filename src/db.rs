use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, Row};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error;
use crate::models::{NewProcessedMessage, ProcessedMessage};
use crate::schema::processed_messages;

/// Connection pool over the SQLite file
pub type DbPool = Pool<SqliteConnectionManager>;
/// A connection checked out of [`DbPool`]
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Store for enriched messages, backed by a single SQLite file
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    path: PathBuf,
}

impl Database {
    /// Open the store at `path`, creating the file and table if needed
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_max_connections(path, 1)
    }

    /// Open the store described by the database section of the configuration
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Self::with_max_connections(&config.path, config.max_connections)
    }

    /// Open the store with a pool of at most `max_connections` connections
    pub fn with_max_connections(path: impl AsRef<Path>, max_connections: u32) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
        }

        // Set up connection manager and pool
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(max_connections)
            .build(manager)
            .context("Failed to create database connection pool")?;

        let conn = pool.get().context("Failed to get database connection")?;
        Self::run_migrations(&conn)?;

        info!("Database ready at {}", path.display());

        Ok(Self {
            pool,
            path: path.to_path_buf(),
        })
    }

    /// Create the processed messages table if it doesn't exist
    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(include_str!("../migrations/0001_create_processed_messages/up.sql"))
            .context("Failed to create processed_messages table")?;

        Ok(())
    }

    /// Path of the underlying SQLite file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> error::Result<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Insert one processed message and return its row id
    pub fn insert_processed_message(&self, message: &NewProcessedMessage) -> error::Result<i64> {
        let conn = self.get_connection()?;

        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                processed_messages::TABLE,
                processed_messages::TS,
                processed_messages::AUTHOR,
                processed_messages::CATEGORY,
                processed_messages::SENTIMENT,
                processed_messages::SENTIMENT_BUCKET,
                processed_messages::MESSAGE_LENGTH,
                processed_messages::KEYWORD_MENTIONED,
                processed_messages::RAW_MESSAGE
            ),
            params![
                message.ts,
                message.author,
                message.category,
                message.sentiment,
                message.sentiment_bucket,
                message.message_length,
                message.keyword_mentioned,
                message.raw_message
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Map a database row to a ProcessedMessage
    fn map_processed_message(row: &Row) -> rusqlite::Result<ProcessedMessage> {
        Ok(ProcessedMessage {
            id: row.get(processed_messages::ID)?,
            ts: row.get(processed_messages::TS)?,
            author: row.get(processed_messages::AUTHOR)?,
            category: row.get(processed_messages::CATEGORY)?,
            sentiment: row.get(processed_messages::SENTIMENT)?,
            sentiment_bucket: row.get(processed_messages::SENTIMENT_BUCKET)?,
            message_length: row.get(processed_messages::MESSAGE_LENGTH)?,
            keyword_mentioned: row.get(processed_messages::KEYWORD_MENTIONED)?,
            raw_message: row.get(processed_messages::RAW_MESSAGE)?,
        })
    }

    /// Get all processed messages in insertion order
    pub fn get_processed_messages(&self) -> error::Result<Vec<ProcessedMessage>> {
        let conn = self.get_connection()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY {}",
            processed_messages::TABLE,
            processed_messages::ID
        ))?;

        let rows = stmt.query_map(params![], Self::map_processed_message)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }

        Ok(results)
    }

    /// Count stored rows
    pub fn count_processed_messages(&self) -> error::Result<usize> {
        let conn = self.get_connection()?;

        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", processed_messages::TABLE),
            params![],
            |row| row.get(0),
        )?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Column names of the processed messages table, in declaration order
    pub fn table_columns(&self) -> error::Result<Vec<String>> {
        let conn = self.get_connection()?;

        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", processed_messages::TABLE))?;
        let names = stmt.query_map(params![], |row| row.get::<_, String>("name"))?;

        let mut columns = Vec::new();
        for name in names {
            columns.push(name?);
        }

        Ok(columns)
    }
}

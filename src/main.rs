use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use buzz_consumer::config::AppConfig;
use buzz_consumer::consumer::{self, shutdown_signal};
use buzz_consumer::db::Database;
use buzz_consumer::logging::{init_logging, OperationTimer};
use buzz_consumer::processor::MessageProcessor;
use buzz_consumer::source::KafkaSource;

/// Consume buzzline events, bucket their sentiment and store them in SQLite
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Topic to subscribe to (overrides BUZZ_TOPIC)
    #[arg(short, long)]
    topic: Option<String>,

    /// Consumer group id (overrides BUZZ_GROUP)
    #[arg(short, long)]
    group: Option<String>,

    /// Comma-separated broker addresses (overrides KAFKA_BROKER_ADDRESS)
    #[arg(short, long)]
    brokers: Option<String>,

    /// Path of the SQLite store
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (text or json)
    #[arg(long)]
    log_format: Option<String>,

    /// Also write JSON logs to this file, rotated daily
    #[arg(long)]
    log_file: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut AppConfig) {
        if let Some(topic) = self.topic {
            config.kafka.topic = topic;
        }
        if let Some(group) = self.group {
            config.kafka.group_id = group;
        }
        if let Some(brokers) = self.brokers {
            config.kafka.brokers = brokers;
        }
        if let Some(path) = self.db_path {
            config.database.path = path;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if self.log_file.is_some() {
            config.logging.file_path = self.log_file;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration, then let the command line win
    let mut config = AppConfig::load()?;
    cli.apply(&mut config);
    config.validate()?;

    // Initialize logging
    let _log_guard = init_logging(&config.logging)?;

    info!("Starting buzz-consumer");

    // Initialize the store; failure here is fatal
    let timer = OperationTimer::new("init_store");
    let db = Database::from_config(&config.database)
        .with_context(|| format!("Failed to initialize store at {}", config.database.path.display()))?;
    timer.finish();

    let processor = MessageProcessor::new(db);
    let mut source = KafkaSource::new(&config.kafka)?;

    info!(
        "Listening on topic={}, group={}",
        config.kafka.topic, config.kafka.group_id
    );

    let stats = consumer::run(&mut source, &processor, shutdown_signal()).await?;

    info!(
        stored = stats.stored,
        failed = stats.failed,
        "buzz-consumer finished"
    );
    Ok(())
}

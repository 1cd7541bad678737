//! Print resolved configuration values for manual verification.
//!
//! Nothing is written; this only reads the environment and configuration files.

use anyhow::Result;
use buzz_consumer::config::{broker_address_or, AppConfig, DEFAULT_BROKERS};

fn env_or_not_found(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| "not found".to_string())
}

fn main() -> Result<()> {
    // Resolved the same way the consumer resolves it
    let broker = broker_address_or(DEFAULT_BROKERS);
    println!("KAFKA_BROKER_ADDRESS resolved: {broker}");

    // Raw environment values
    println!("BUZZ_TOPIC from environment: {}", env_or_not_found("BUZZ_TOPIC"));
    println!("SQLITE_DB from environment: {}", env_or_not_found("SQLITE_DB"));

    match AppConfig::load() {
        Ok(config) => {
            println!("Resolved topic: {}", config.kafka.topic);
            println!("Resolved group: {}", config.kafka.group_id);
            println!("Resolved database path: {}", config.database.path.display());
            if let Err(e) = config.validate() {
                println!("Configuration is invalid: {e}");
            }
        },
        Err(e) => println!("Configuration does not load: {e}"),
    }

    Ok(())
}

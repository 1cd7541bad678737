use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::validation::InputValidator;

/// Topic consumed when `BUZZ_TOPIC` is unset
pub const DEFAULT_TOPIC: &str = "buzzline";
/// Consumer group used when `BUZZ_GROUP` is unset
pub const DEFAULT_GROUP: &str = "stcyr_consumer_group";
/// Broker address used when `KAFKA_BROKER_ADDRESS` is unset
pub const DEFAULT_BROKERS: &str = "localhost:9092";
/// Location of the SQLite store, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "data/processed.db";

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub kafka: KafkaConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
    pub group_id: String,
    pub auto_offset_reset: String, // "earliest", "latest" or "none"
    pub session_timeout_ms: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            kafka: KafkaConfig {
                brokers: DEFAULT_BROKERS.to_string(),
                topic: DEFAULT_TOPIC.to_string(),
                group_id: DEFAULT_GROUP.to_string(),
                auto_offset_reset: "earliest".to_string(),
                session_timeout_ms: 6000,
            },
            database: DatabaseConfig {
                path: PathBuf::from(DEFAULT_DB_PATH),
                max_connections: 1,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence.
    ///
    /// Values are not checked here; call [`AppConfig::validate`] once any
    /// further overrides have been applied.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("kafka.brokers", defaults.kafka.brokers)?
            .set_default("kafka.topic", defaults.kafka.topic)?
            .set_default("kafka.group_id", defaults.kafka.group_id)?
            .set_default("kafka.auto_offset_reset", defaults.kafka.auto_offset_reset)?
            .set_default("kafka.session_timeout_ms", defaults.kafka.session_timeout_ms)?
            .set_default("database.path", defaults.database.path.to_string_lossy().into_owned())?
            .set_default("database.max_connections", defaults.database.max_connections)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?;
        if let Some(file_path) = defaults.logging.file_path {
            builder = builder.set_default("logging.file_path", file_path)?;
        }

        let config = builder
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            // Add environment variables with prefix, e.g. BUZZ_KAFKA__BROKERS
            .add_source(
                Environment::with_prefix("BUZZ")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let mut app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        app_config.apply_env_overrides();

        Ok(app_config)
    }

    /// Apply the plain environment variables the buzzline deployment uses
    ///
    /// `BUZZ_TOPIC`, `BUZZ_GROUP` and `KAFKA_BROKER_ADDRESS` take precedence over
    /// files and prefixed variables.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(topic) = std::env::var("BUZZ_TOPIC") {
            self.kafka.topic = topic;
        }
        if let Ok(group) = std::env::var("BUZZ_GROUP") {
            self.kafka.group_id = group;
        }
        self.kafka.brokers = broker_address_or(&self.kafka.brokers);
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate kafka config
        InputValidator::validate_broker_list(&self.kafka.brokers)?;
        InputValidator::validate_topic_name(&self.kafka.topic)?;
        InputValidator::validate_group_id(&self.kafka.group_id)?;

        let valid_resets = ["earliest", "latest", "none"];
        if !valid_resets.contains(&self.kafka.auto_offset_reset.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid auto_offset_reset: {}. Must be one of: {:?}",
                self.kafka.auto_offset_reset,
                valid_resets
            ));
        }
        if self.kafka.session_timeout_ms == 0 {
            return Err(anyhow::anyhow!("session_timeout_ms must be greater than 0"));
        }

        // Validate database config
        if self.database.path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("database path cannot be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!("max_connections must be greater than 0"));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        Ok(())
    }
}

/// Resolve the Kafka broker address from `KAFKA_BROKER_ADDRESS`, falling back to `default`
#[must_use]
pub fn broker_address_or(default: &str) -> String {
    std::env::var("KAFKA_BROKER_ADDRESS").unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.kafka.topic, "buzzline");
        assert_eq!(config.kafka.group_id, "stcyr_consumer_group");
        assert_eq!(config.database.path, PathBuf::from("data/processed.db"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }
}

//! Comprehensive unit tests for config.rs module

use serial_test::serial;
use std::path::PathBuf;
use buzz_consumer::config::{AppConfig, DatabaseConfig, KafkaConfig, LoggingConfig, DEFAULT_GROUP, DEFAULT_TOPIC};

const OVERRIDE_VARS: [&str; 4] = ["BUZZ_TOPIC", "BUZZ_GROUP", "KAFKA_BROKER_ADDRESS", "BUZZ_DATABASE__PATH"];

fn clear_env() {
    for var in OVERRIDE_VARS {
        std::env::remove_var(var);
    }
}

#[test]
fn test_default_kafka_config() {
    let config = AppConfig::default();

    assert_eq!(config.kafka.brokers, "localhost:9092");
    assert_eq!(config.kafka.topic, DEFAULT_TOPIC);
    assert_eq!(config.kafka.group_id, DEFAULT_GROUP);
    assert_eq!(config.kafka.auto_offset_reset, "earliest");
    assert_eq!(config.kafka.session_timeout_ms, 6000);
}

#[test]
fn test_default_database_and_logging_config() {
    let config = AppConfig::default();

    assert_eq!(config.database.path, PathBuf::from("data/processed.db"));
    assert_eq!(config.database.max_connections, 1);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.format, "text");
}

#[test]
#[serial]
fn test_load_without_overrides_uses_defaults() {
    clear_env();

    let config = AppConfig::load().expect("Failed to load configuration");
    assert_eq!(config.kafka.topic, "buzzline");
    assert_eq!(config.kafka.group_id, "stcyr_consumer_group");
    assert_eq!(config.database.path, PathBuf::from("data/processed.db"));
}

#[test]
#[serial]
fn test_load_applies_environment_overrides() {
    clear_env();
    std::env::set_var("BUZZ_TOPIC", "alerts");
    std::env::set_var("BUZZ_GROUP", "night_shift");
    std::env::set_var("KAFKA_BROKER_ADDRESS", "broker-1:29092");
    std::env::set_var("BUZZ_DATABASE__PATH", "/tmp/buzz/other.db");

    let config = AppConfig::load();
    clear_env();

    let config = config.expect("Failed to load configuration");
    assert_eq!(config.kafka.topic, "alerts");
    assert_eq!(config.kafka.group_id, "night_shift");
    assert_eq!(config.kafka.brokers, "broker-1:29092");
    assert_eq!(config.database.path, PathBuf::from("/tmp/buzz/other.db"));
}

#[test]
#[serial]
fn test_invalid_topic_from_environment_fails_validation() {
    clear_env();
    std::env::set_var("BUZZ_TOPIC", "not a topic");

    let result = AppConfig::load();
    clear_env();

    let config = result.expect("Failed to load configuration");
    assert_eq!(config.kafka.topic, "not a topic");
    assert!(config.validate().is_err());
}

#[test]
#[serial]
fn test_later_override_can_replace_invalid_environment_topic() {
    clear_env();
    std::env::set_var("BUZZ_TOPIC", "not a topic");

    let result = AppConfig::load();
    clear_env();

    // as a command-line flag would
    let mut config = result.expect("Failed to load configuration");
    config.kafka.topic = "buzzline".to_string();
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_apply_env_overrides_leaves_unset_values_alone() {
    clear_env();
    let mut config = AppConfig::default();
    config.kafka.topic = "from_file".to_string();

    config.apply_env_overrides();
    assert_eq!(config.kafka.topic, "from_file");
    assert_eq!(config.kafka.brokers, "localhost:9092");
}

#[test]
fn test_config_validation_success() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_empty_group() {
    let mut config = AppConfig::default();
    config.kafka.group_id = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_bad_brokers() {
    let mut config = AppConfig::default();
    config.kafka.brokers = "localhost".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_offset_reset() {
    for reset in ["earliest", "latest", "none"] {
        let mut config = AppConfig::default();
        config.kafka.auto_offset_reset = reset.to_string();
        assert!(config.validate().is_ok(), "Failed for reset: {}", reset);
    }

    let mut config = AppConfig::default();
    config.kafka.auto_offset_reset = "smallest".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_zero_session_timeout() {
    let mut config = AppConfig::default();
    config.kafka.session_timeout_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_empty_database_path() {
    let mut config = AppConfig::default();
    config.database.path = PathBuf::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_zero_max_connections() {
    let mut config = AppConfig::default();
    config.database.max_connections = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_log_levels() {
    for level in ["trace", "debug", "info", "warn", "error"] {
        let mut config = AppConfig::default();
        config.logging.level = level.to_string();
        assert!(config.validate().is_ok(), "Failed for level: {}", level);
    }

    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_log_formats() {
    for format in ["text", "json"] {
        let mut config = AppConfig::default();
        config.logging.format = format.to_string();
        assert!(config.validate().is_ok(), "Failed for format: {}", format);
    }

    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_explicit_sections_validate() {
    let config = AppConfig {
        kafka: KafkaConfig {
            brokers: "a:9092,b:9092".to_string(),
            topic: "buzz.line-2".to_string(),
            group_id: "group".to_string(),
            auto_offset_reset: "latest".to_string(),
            session_timeout_ms: 10_000,
        },
        database: DatabaseConfig {
            path: PathBuf::from("out/rows.db"),
            max_connections: 4,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            file_path: Some("logs/buzz.log".to_string()),
            format: "json".to_string(),
        },
    };
    assert!(config.validate().is_ok());
}

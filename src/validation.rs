use anyhow::{anyhow, Result};

/// Longest topic name Kafka accepts
pub const MAX_TOPIC_LENGTH: usize = 249;

/// Validation utilities for broker and subscription settings
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a Kafka topic name
    ///
    /// Kafka allows 1 to 249 characters from `[A-Za-z0-9._-]` and reserves `.` and `..`.
    pub fn validate_topic_name(topic: &str) -> Result<()> {
        if topic.is_empty() {
            return Err(anyhow!("Topic name cannot be empty"));
        }

        if topic.len() > MAX_TOPIC_LENGTH {
            return Err(anyhow!("Topic name too long (max {MAX_TOPIC_LENGTH} characters)"));
        }

        if topic == "." || topic == ".." {
            return Err(anyhow!("Topic name cannot be '.' or '..'"));
        }

        if let Some(c) = topic
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(anyhow!("Topic name contains invalid character {c:?}"));
        }

        Ok(())
    }

    /// Validate a consumer group identifier
    pub fn validate_group_id(group_id: &str) -> Result<()> {
        if group_id.trim().is_empty() {
            return Err(anyhow!("Consumer group id cannot be empty"));
        }

        if group_id.contains('\0') || group_id.contains('\r') || group_id.contains('\n') {
            return Err(anyhow!("Consumer group id contains invalid characters"));
        }

        Ok(())
    }

    /// Validate a comma-separated list of `host:port` broker addresses
    pub fn validate_broker_list(brokers: &str) -> Result<()> {
        if brokers.trim().is_empty() {
            return Err(anyhow!("Broker list cannot be empty"));
        }

        for broker in brokers.split(',').map(str::trim) {
            let (host, port) = broker
                .rsplit_once(':')
                .ok_or_else(|| anyhow!("Broker address '{broker}' must be host:port"))?;

            if host.is_empty() {
                return Err(anyhow!("Broker address '{broker}' has an empty host"));
            }

            match port.parse::<u16>() {
                Ok(p) if p > 0 => {},
                _ => return Err(anyhow!("Broker address '{broker}' has an invalid port")),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_rules() {
        assert!(InputValidator::validate_topic_name("buzzline").is_ok());
        assert!(InputValidator::validate_topic_name("buzz.line_v2-x").is_ok());
        assert!(InputValidator::validate_topic_name("").is_err());
        assert!(InputValidator::validate_topic_name("..").is_err());
        assert!(InputValidator::validate_topic_name("buzz line").is_err());
    }

    #[test]
    fn test_broker_rules() {
        assert!(InputValidator::validate_broker_list("localhost:9092").is_ok());
        assert!(InputValidator::validate_broker_list("a:9092, b:9093").is_ok());
        assert!(InputValidator::validate_broker_list("localhost").is_err());
        assert!(InputValidator::validate_broker_list("localhost:0").is_err());
    }
}

//! Record sources for the consume loop
//!
//! The loop pulls from a [`RecordSource`] one record at a time. The Kafka
//! implementation is behind the `kafka` feature; [`ChannelSource`] feeds records
//! from a tokio channel.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::SourceError;

/// Payload of a delivered record
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Already-decoded JSON
    Json(Value),
    /// JSON text
    Text(String),
    /// Raw bytes, expected to hold UTF-8 JSON
    Bytes(Vec<u8>),
}

/// One record delivered by a subscription
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Topic the record was read from
    pub topic: String,
    /// Partition within the topic
    pub partition: i32,
    /// Offset within the partition
    pub offset: i64,
    /// Record value, absent for tombstones
    pub payload: Option<Payload>,
}

impl RawRecord {
    /// Create a record as delivered at `topic`/`partition`/`offset`
    #[must_use]
    pub fn new(topic: impl Into<String>, partition: i32, offset: i64, payload: Option<Payload>) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
            payload,
        }
    }
}

/// A sequential source of records
#[async_trait]
pub trait RecordSource: Send {
    /// Wait for the next record.
    ///
    /// `None` means the source is closed. An `Err` is a failure of the source
    /// itself, not of one record, and ends consumption.
    async fn next_record(&mut self) -> Option<Result<RawRecord, SourceError>>;
}

/// Source fed through a tokio channel; closes when every sender is dropped
pub struct ChannelSource {
    rx: mpsc::Receiver<Result<RawRecord, SourceError>>,
}

impl ChannelSource {
    /// Create a bounded channel and the source reading from it
    #[must_use]
    pub fn channel(buffer: usize) -> (mpsc::Sender<Result<RawRecord, SourceError>>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self { rx })
    }
}

#[async_trait]
impl RecordSource for ChannelSource {
    async fn next_record(&mut self) -> Option<Result<RawRecord, SourceError>> {
        self.rx.recv().await
    }
}

#[cfg(feature = "kafka")]
pub use kafka::KafkaSource;

#[cfg(feature = "kafka")]
mod kafka {
    use async_trait::async_trait;
    use rdkafka::consumer::{Consumer, StreamConsumer};
    use rdkafka::error::{KafkaError, RDKafkaErrorCode};
    use rdkafka::{ClientConfig, Message};
    use tracing::{info, warn};

    use super::{Payload, RawRecord, RecordSource};
    use crate::config::KafkaConfig;
    use crate::error::SourceError;

    /// Kafka subscription to a single topic
    pub struct KafkaSource {
        consumer: StreamConsumer,
    }

    impl KafkaSource {
        /// Create the consumer and subscribe to the configured topic
        pub fn new(config: &KafkaConfig) -> Result<Self, SourceError> {
            let consumer: StreamConsumer = ClientConfig::new()
                .set("bootstrap.servers", &config.brokers)
                .set("group.id", &config.group_id)
                .set("enable.partition.eof", "false")
                .set("enable.auto.commit", "true")
                .set("session.timeout.ms", config.session_timeout_ms.to_string())
                .set("auto.offset.reset", &config.auto_offset_reset)
                .create()
                .map_err(|e| SourceError::Subscribe(format!("Failed to create consumer: {e}")))?;

            consumer
                .subscribe(&[config.topic.as_str()])
                .map_err(|e| SourceError::Subscribe(format!("Failed to subscribe to {}: {e}", config.topic)))?;

            info!(
                brokers = %config.brokers,
                topic = %config.topic,
                group = %config.group_id,
                "Kafka consumer subscribed"
            );

            Ok(Self { consumer })
        }
    }

    /// Whether a receive error leaves the consumer unusable.
    ///
    /// Everything else (missing topic, broker down, rebalance) is retried by
    /// librdkafka and only reported.
    fn is_fatal(err: &KafkaError, client_fatal: bool) -> bool {
        client_fatal || err.rdkafka_error_code() == Some(RDKafkaErrorCode::Fatal)
    }

    #[async_trait]
    impl RecordSource for KafkaSource {
        async fn next_record(&mut self) -> Option<Result<RawRecord, SourceError>> {
            loop {
                match self.consumer.recv().await {
                    Ok(msg) => {
                        return Some(Ok(RawRecord::new(
                            msg.topic(),
                            msg.partition(),
                            msg.offset(),
                            msg.payload().map(|bytes| Payload::Bytes(bytes.to_vec())),
                        )));
                    },
                    Err(e) => {
                        let fatal = self.consumer.client().fatal_error();
                        if is_fatal(&e, fatal.is_some()) {
                            let err = fatal.map_or_else(
                                || SourceError::from(e),
                                |(code, reason)| SourceError::Kafka(format!("{code:?}: {reason}")),
                            );
                            return Some(Err(err));
                        }
                        warn!(error = %e, "Kafka error, waiting for the client to recover");
                    },
                }
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_source_closes_after_senders_drop() {
        let (tx, mut source) = ChannelSource::channel(4);
        tx.send(Ok(RawRecord::new("buzzline", 0, 7, Some(Payload::Text("{}".to_string())))))
            .await
            .unwrap();
        drop(tx);

        let first = source.next_record().await.unwrap().unwrap();
        assert_eq!(first.offset, 7);
        assert!(source.next_record().await.is_none());
    }
}

//! The consume loop
//!
//! Records are pulled from a [`RecordSource`] and handed to the
//! [`MessageProcessor`] strictly one at a time, in delivery order. A record that
//! fails to decode or store is logged and dropped; a failure of the source
//! itself ends the loop.

use std::future::Future;

use tracing::{error, info, warn};

use crate::error::SourceError;
use crate::processor::MessageProcessor;
use crate::source::{RawRecord, RecordSource};

/// Counts of what the loop did before it stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumeStats {
    /// Records inserted into the store
    pub stored: u64,
    /// Records dropped after a decode or storage failure
    pub failed: u64,
}

/// Run the loop until the source closes, the source fails, or `shutdown` resolves.
///
/// `shutdown` is checked before each pull, so a record already being processed
/// is always finished first.
pub async fn run<S, F>(source: &mut S, processor: &MessageProcessor, shutdown: F) -> Result<ConsumeStats, SourceError>
where
    S: RecordSource + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut stats = ConsumeStats::default();

    loop {
        let next = tokio::select! {
            biased;
            () = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
            next = source.next_record() => next,
        };

        match next {
            Some(Ok(record)) => handle_record(processor, &record, &mut stats),
            Some(Err(e)) => {
                error!(error = %e, stored = stats.stored, failed = stats.failed, "Record source failed");
                return Err(e);
            },
            None => {
                info!("Record source closed");
                break;
            },
        }
    }

    info!(stored = stats.stored, failed = stats.failed, "Consumer stopped");
    Ok(stats)
}

fn handle_record(processor: &MessageProcessor, record: &RawRecord, stats: &mut ConsumeStats) {
    match processor.process(record) {
        Ok(stored) => {
            stats.stored += 1;
            info!(
                id = stored.id,
                ts = stored.message.ts.as_deref().unwrap_or("-"),
                author = stored.message.author.as_deref().unwrap_or("-"),
                bucket = %stored.message.sentiment_bucket,
                "Stored message"
            );
        },
        Err(e) => {
            stats.failed += 1;
            let what = if e.is_storage_failure() {
                "Failed to store message"
            } else {
                "Error processing message"
            };
            error!(
                topic = %record.topic,
                partition = record.partition,
                offset = record.offset,
                error = %e,
                "{what}"
            );
        },
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed it never resolves.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

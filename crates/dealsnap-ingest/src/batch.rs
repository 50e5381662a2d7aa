//! The per-batch ingestion loop.

use dealsnap_core::{ExtractedDeal, IncomingMessage};
use tracing::Instrument;
use uuid::Uuid;

use crate::{IngestError, QueueRecord, RecordSink};

/// Outcome counts for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Ids of persisted deals, in delivery order.
    pub stored: Vec<Uuid>,
    pub decode_failures: usize,
    pub persistence_failures: usize,
}

impl BatchSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.stored.len() + self.failed()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.decode_failures + self.persistence_failures
    }
}

/// Decodes one message body, assembles its deal and stores it.
///
/// Returns the stored deal with its id set.
///
/// # Errors
///
/// Returns [`IngestError::Decode`] if `payload` is not a valid message, or
/// [`IngestError::Persistence`] if the sink fails.
pub async fn process_message<S: RecordSink>(
    sink: &S,
    payload: &str,
) -> Result<ExtractedDeal, IngestError> {
    let message: IncomingMessage =
        serde_json::from_str(payload).map_err(IngestError::Decode)?;
    let deal = dealsnap_extract::assemble(&message);

    match sink.store(&deal).await {
        Ok(id) => Ok(deal.with_id(id)),
        Err(e) => Err(IngestError::Persistence {
            photo_id: deal.photo_id,
            source: Box::new(e),
        }),
    }
}

/// Processes every record in order.
///
/// Failures are logged and counted, never retried, and never abort the rest
/// of the batch.
pub async fn process_batch<S: RecordSink>(sink: &S, records: &[QueueRecord]) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for (index, record) in records.iter().enumerate() {
        let span = tracing::info_span!(
            "message",
            index,
            message_id = record.message_id.as_deref().unwrap_or("-"),
        );

        match process_message(sink, &record.body).instrument(span).await {
            Ok(deal) => {
                tracing::info!(
                    index,
                    photo_id = %deal.photo_id,
                    deal_id = ?deal.id,
                    "processed deal"
                );
                summary.stored.extend(deal.id);
            }
            Err(e @ (IngestError::Decode(_) | IngestError::Envelope(_))) => {
                tracing::warn!(index, error = %e, "skipping undecodable message");
                summary.decode_failures += 1;
            }
            Err(e) => {
                tracing::error!(index, error = %e, "skipping message that could not be saved");
                summary.persistence_failures += 1;
            }
        }
    }

    tracing::info!(
        stored = summary.stored.len(),
        decode_failures = summary.decode_failures,
        persistence_failures = summary.persistence_failures,
        "batch complete"
    );

    summary
}

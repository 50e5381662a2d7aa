//! Queue payload envelopes.

use serde::Deserialize;

use crate::IngestError;

/// A batch as delivered by the queue trigger: `{"Records": [{"body": ...}]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueEvent {
    #[serde(rename = "Records")]
    pub records: Vec<QueueRecord>,
}

/// One queued message. `body` is the serialized `IncomingMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRecord {
    #[serde(default)]
    pub message_id: Option<String>,
    pub body: String,
}

impl QueueRecord {
    #[must_use]
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            message_id: None,
            body: body.into(),
        }
    }
}

/// Parses a queue event envelope into its records.
///
/// Only the envelope is checked here; each body is decoded later, one at a
/// time, so a malformed body cannot sink the whole batch.
///
/// # Errors
///
/// Returns [`IngestError::Envelope`] if `raw` is not a queue event.
pub fn parse_event(raw: &str) -> Result<Vec<QueueRecord>, IngestError> {
    serde_json::from_str::<QueueEvent>(raw)
        .map(|event| event.records)
        .map_err(IngestError::Envelope)
}

/// Treats every non-blank line of `raw` as one message body.
#[must_use]
pub fn parse_lines(raw: &str) -> Vec<QueueRecord> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(QueueRecord::from_body)
        .collect()
}

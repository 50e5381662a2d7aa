use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("queue event is not valid JSON: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("message is not a valid deal payload: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to persist deal for photo {photo_id}: {source}")]
    Persistence {
        photo_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

//! Batch ingestion and offline extraction handlers.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use dealsnap_core::IncomingMessage;
use dealsnap_ingest::{QueueRecord, RecordSink};

use crate::PayloadFormat;

/// Reads the whole payload from `file`, or from stdin when no file is given.
fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn split_payload(raw: &str, format: PayloadFormat) -> anyhow::Result<Vec<QueueRecord>> {
    match format {
        PayloadFormat::Event => Ok(dealsnap_ingest::parse_event(raw)?),
        PayloadFormat::Lines => Ok(dealsnap_ingest::parse_lines(raw)),
    }
}

/// Runs one batch through `sink` and prints the outcome.
///
/// Individual message failures are reported in the summary, not as an error.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the event envelope is
/// malformed.
pub(crate) async fn run_ingest<S: RecordSink>(
    sink: &S,
    file: Option<&Path>,
    format: PayloadFormat,
) -> anyhow::Result<()> {
    let raw = read_input(file)?;
    let records = split_payload(&raw, format)?;

    if records.is_empty() {
        println!("no messages to process");
        return Ok(());
    }

    let summary = dealsnap_ingest::process_batch(sink, &records).await;

    println!(
        "processed {} message(s): {} stored, {} undecodable, {} failed to save",
        summary.total(),
        summary.stored.len(),
        summary.decode_failures,
        summary.persistence_failures,
    );
    for id in &summary.stored {
        println!("  {id}");
    }

    Ok(())
}

/// Assembles a single message and prints the deal as JSON.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a message.
pub(crate) fn run_extract(file: Option<&Path>) -> anyhow::Result<()> {
    let raw = read_input(file)?;
    let message: IncomingMessage =
        serde_json::from_str(&raw).context("input is not a valid message")?;
    let deal = dealsnap_extract::assemble(&message);

    tracing::debug!(photo_id = %deal.photo_id, "assembled deal");
    println!("{}", serde_json::to_string_pretty(&deal)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_event_payload() {
        let raw = r#"{"Records":[{"messageId":"a","body":"{}"},{"body":"x"}]}"#;
        let records = split_payload(raw, PayloadFormat::Event).expect("valid event");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message_id.as_deref(), Some("a"));
        assert_eq!(records[1].body, "x");
    }

    #[test]
    fn split_malformed_event_is_an_error() {
        assert!(split_payload("[1, 2]", PayloadFormat::Event).is_err());
    }

    #[test]
    fn split_lines_payload_skips_blanks() {
        let raw = "{\"photoId\":\"a\"}\n\n   \n{\"photoId\":\"b\"}\n";
        let records = split_payload(raw, PayloadFormat::Lines).expect("lines never fail");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn read_input_reports_missing_file() {
        let err = read_input(Some(Path::new("/nonexistent/dealsnap/input.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}

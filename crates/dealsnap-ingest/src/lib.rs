//! Queue ingestion: decode each message, extract a deal, hand it to a
//! [`RecordSink`]. One bad message never stops the rest of the batch.

pub mod batch;
pub mod error;
pub mod event;
pub mod sink;

pub use batch::{process_batch, process_message, BatchSummary};
pub use error::IngestError;
pub use event::{parse_event, parse_lines, QueueEvent, QueueRecord};
pub use sink::{PgDealSink, RecordSink};

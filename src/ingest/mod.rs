pub mod controller;
pub mod worker;

pub use controller::{IngestController, INGEST_QUEUE_CAPACITY};
pub use worker::IngestSummary;

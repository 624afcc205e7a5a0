pub mod ingest;
pub mod parser;

pub use ingest::{IngestError, IngestOutcome, IngestService};

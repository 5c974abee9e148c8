use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The upload payload is not a parseable row sequence. Aborts the whole
    /// batch; no partial ingestion occurs.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

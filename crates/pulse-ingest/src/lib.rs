//! Ingestion pipeline for Pulse.
//!
//! Turns raw CSV/JSON uploads into canonical [`pulse_core::Post`] records:
//! parses payloads to key/value rows, maps arbitrary column names onto the
//! canonical schema, derives sentiment/emotion/engagement metrics, and
//! attaches performance predictions against the batch average.

pub mod coerce;
pub mod emotion;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod predict;
pub mod rows;
pub mod scorer;

pub use emotion::classify_emotion;
pub use error::IngestError;
pub use normalize::normalize_row;
pub use pipeline::{batch_average, ingest_rows};
pub use predict::predict;
pub use rows::{parse_rows, RawRow, SourceFormat};
pub use scorer::comparative_score;

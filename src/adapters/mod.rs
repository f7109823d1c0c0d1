//! Provider payload adapters
//!
//! This module provides adapters that parse raw provider JSON text into the
//! typed payloads of [`crate::schema`].

mod serpapi;

pub use serpapi::{to_related_topics, SerpApiAdapter};

use crate::error::ComputeError;
use crate::schema::{RelatedQueriesPayload, RelatedTopicsPayload, TimeseriesPayload};

/// Trait for trends payload adapters
///
/// Implementations return `Err` only for text that is not JSON. A malformed
/// point or record is dropped on its own; a top level that does not match the
/// expected shape yields the empty payload.
pub trait TrendsPayloadAdapter {
    /// Parse an interest-over-time response
    fn interest_over_time(&self, raw_json: &str) -> Result<TimeseriesPayload, ComputeError>;

    /// Parse a related-queries response
    fn related_queries(&self, raw_json: &str) -> Result<RelatedQueriesPayload, ComputeError>;

    /// Parse a related-topics response
    fn related_topics(&self, raw_json: &str) -> Result<RelatedTopicsPayload, ComputeError>;
}

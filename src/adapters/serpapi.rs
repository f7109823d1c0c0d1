//! SerpApi Google Trends adapter
//!
//! Parses `engine=google_trends` responses for the TIMESERIES,
//! RELATED_QUERIES and RELATED_TOPICS data types.

use crate::error::ComputeError;
use crate::schema::{RelatedQueriesPayload, RelatedTopicsPayload, TimeseriesPayload};
use crate::types::{RelatedTopic, RelatedTopics};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::TrendsPayloadAdapter;

/// SerpApi payload adapter
pub struct SerpApiAdapter;

impl TrendsPayloadAdapter for SerpApiAdapter {
    fn interest_over_time(&self, raw_json: &str) -> Result<TimeseriesPayload, ComputeError> {
        parse_lenient(raw_json, "interest_over_time")
    }

    fn related_queries(&self, raw_json: &str) -> Result<RelatedQueriesPayload, ComputeError> {
        parse_lenient(raw_json, "related_queries")
    }

    fn related_topics(&self, raw_json: &str) -> Result<RelatedTopicsPayload, ComputeError> {
        parse_lenient(raw_json, "related_topics")
    }
}

fn parse_lenient<T>(raw_json: &str, kind: &str) -> Result<T, ComputeError>
where
    T: DeserializeOwned + Default,
{
    let value: serde_json::Value = serde_json::from_str(raw_json)?;

    if value.is_null() {
        return Ok(T::default());
    }

    // SerpApi reports "no results" and quota problems in-band
    if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
        warn!(kind, error = message, "provider returned an error payload");
        return Ok(T::default());
    }

    match serde_json::from_value(value) {
        Ok(payload) => Ok(payload),
        Err(e) => {
            warn!(kind, error = %e, "malformed provider payload, treating as empty");
            Ok(T::default())
        }
    }
}

/// Convert a related-topics payload into display topics, keeping at most
/// `limit` entries per bucket.
pub fn to_related_topics(payload: &RelatedTopicsPayload, limit: usize) -> RelatedTopics {
    let convert = |records: &[crate::schema::TopicRecord]| -> Vec<RelatedTopic> {
        records
            .iter()
            .filter_map(|record| {
                let topic = record.topic.as_ref()?;
                let title = topic.title.clone()?;
                Some(RelatedTopic {
                    title,
                    topic_type: topic.topic_type.clone(),
                    value: record.value.clone(),
                    extracted_value: record.extracted_value,
                })
            })
            .take(limit)
            .collect()
    };

    RelatedTopics {
        top: convert(payload.top()),
        rising: convert(payload.rising()),
    }
}

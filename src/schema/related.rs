//! `related_queries` and `related_topics` payloads
//!
//! Shapes:
//! - `{ related_queries: { top: [ {query, value} ], rising: [ {query, value} ] } }`
//! - `{ related_topics: { top: [ {topic: {title, type}, value} ], rising: [...] } }`

use super::{lenient, lenient_items, lenient_text};
use crate::types::QueryValue;
use serde::{Deserialize, Serialize};

/// Top-level related-queries response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedQueriesPayload {
    pub related_queries: Option<RelatedQueries>,
}

impl RelatedQueriesPayload {
    pub fn top(&self) -> &[QueryRecord] {
        self.related_queries
            .as_ref()
            .and_then(|rq| rq.top.as_deref())
            .unwrap_or(&[])
    }

    pub fn rising(&self) -> &[QueryRecord] {
        self.related_queries
            .as_ref()
            .and_then(|rq| rq.rising.as_deref())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedQueries {
    #[serde(default, deserialize_with = "lenient_items")]
    pub top: Option<Vec<QueryRecord>>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub rising: Option<Vec<QueryRecord>>,
}

/// One related query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub query: Option<String>,
    /// Numeric index for top queries; growth indicator for rising ones
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<QueryValue>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub extracted_value: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub link: Option<String>,
}

impl QueryRecord {
    pub fn new(query: &str, value: QueryValue) -> Self {
        Self {
            query: Some(query.to_string()),
            value: Some(value),
            extracted_value: None,
            link: None,
        }
    }

    /// Query text, empty when the provider omitted it
    pub fn query_text(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }
}

/// Top-level related-topics response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedTopicsPayload {
    pub related_topics: Option<RelatedTopicBuckets>,
}

impl RelatedTopicsPayload {
    pub fn top(&self) -> &[TopicRecord] {
        self.related_topics
            .as_ref()
            .and_then(|rt| rt.top.as_deref())
            .unwrap_or(&[])
    }

    pub fn rising(&self) -> &[TopicRecord] {
        self.related_topics
            .as_ref()
            .and_then(|rt| rt.rising.as_deref())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedTopicBuckets {
    #[serde(default, deserialize_with = "lenient_items")]
    pub top: Option<Vec<TopicRecord>>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub rising: Option<Vec<TopicRecord>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub topic: Option<TopicInfo>,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<QueryValue>,
    #[serde(default, deserialize_with = "lenient")]
    pub extracted_value: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicInfo {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub topic_type: Option<String>,
}

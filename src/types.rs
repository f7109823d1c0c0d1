//! Core types for the Trend Hunter pipeline
//!
//! This module defines the values that flow through each stage of the
//! pipeline: normalized interest series, change metrics, product categories,
//! classified related queries, and the encoded report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker the provider uses for rising queries whose growth is off its scale
pub const BREAKOUT_MARKER: &str = "Breakout";

/// Category label used when no category applies to a query
pub const NO_CATEGORY: &str = "N/A";

/// Related-query value: a numeric index for "top" queries, or a growth
/// indicator ("Breakout", "+250%", or a plain number) for "rising" queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Number(f64),
    Text(String),
}

impl QueryValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QueryValue::Number(n) => Some(*n),
            QueryValue::Text(_) => None,
        }
    }

    /// A value marks an emerging query when it carries the breakout marker
    /// (case-sensitive substring) or is a number above 100.
    pub fn is_emerging(&self) -> bool {
        match self {
            QueryValue::Number(n) => *n > 100.0,
            QueryValue::Text(text) => text.contains(BREAKOUT_MARKER),
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Number(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{}", *n as i64),
            QueryValue::Number(n) => write!(f, "{n}"),
            QueryValue::Text(text) => f.write_str(text),
        }
    }
}

/// Policy for timeline points that carry no value list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPointPolicy {
    /// Skip the point entirely
    #[default]
    Drop,
    /// Keep the point with an interest value of 0
    ZeroFill,
}

/// Ordered interest values extracted from a provider time series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    /// Interest values in chronological order (oldest first)
    pub values: Vec<f64>,
    /// Points whose value was present but not a number
    pub anomalies: usize,
}

impl NormalizedSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            anomalies: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every input point could be read as a number
    pub fn is_clean(&self) -> bool {
        self.anomalies == 0 && self.values.iter().all(|v| v.is_finite())
    }
}

/// Dated interest value for chart rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: String,
    pub value: f64,
}

/// Percentage change at fixed lookback horizons plus the long-run average.
///
/// The calculator returns `Option<ChangeMetrics>`, so the four values are
/// always present or absent together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeMetrics {
    /// Change against the point 5 steps back (~1 month of weekly data)
    pub month_change: f64,
    /// Change against the point 13 steps back (~1 quarter)
    pub quarter_change: f64,
    /// Change against the point 52 steps back (~1 year)
    pub year_change: f64,
    /// Mean of all values in the series
    pub average: f64,
}

/// Product category used to judge query relevance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub name: String,
    /// Match keys in priority order; the first five are primary
    pub keywords: Vec<String>,
    /// Opaque display string
    #[serde(default)]
    pub icon: String,
}

impl ProductCategory {
    pub fn new(name: &str, keywords: &[&str], icon: &str) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            icon: icon.to_string(),
        }
    }
}

/// Relevance of one query against the selected categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relevance {
    /// Score in [0, 100]
    pub score: f64,
    /// Keywords of the winning category found in the query
    pub matched_keywords: Vec<String>,
    /// Winning category, if any category matched
    pub category: Option<String>,
}

impl Relevance {
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(NO_CATEGORY)
    }
}

/// Relevance tier shown next to a classified query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceBadge {
    High,
    Medium,
    Low,
    Doubtful,
}

impl RelevanceBadge {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            RelevanceBadge::High
        } else if score >= 50.0 {
            RelevanceBadge::Medium
        } else if score >= 30.0 {
            RelevanceBadge::Low
        } else {
            RelevanceBadge::Doubtful
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelevanceBadge::High => "high",
            RelevanceBadge::Medium => "medium",
            RelevanceBadge::Low => "low",
            RelevanceBadge::Doubtful => "doubtful",
        }
    }
}

/// Question-vs-attribute classification of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Question,
    Attribute,
}

/// Related query augmented with its relevance and type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedQuery {
    pub query: String,
    pub value: Option<QueryValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_value: Option<f64>,
    pub relevance: f64,
    pub matched_keywords: Vec<String>,
    pub category: String,
    #[serde(rename = "type")]
    pub query_type: QueryType,
    pub badge: RelevanceBadge,
}

/// The four relevance-sorted lists produced by one classification run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedQueries {
    pub all_queries: Vec<ClassifiedQuery>,
    pub questions: Vec<ClassifiedQuery>,
    pub attributes: Vec<ClassifiedQuery>,
    pub emerging: Vec<ClassifiedQuery>,
}

impl ClassifiedQueries {
    pub fn is_empty(&self) -> bool {
        self.all_queries.is_empty()
            && self.questions.is_empty()
            && self.attributes.is_empty()
            && self.emerging.is_empty()
    }
}

/// Where rising queries go besides the emerging list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RisingPolicy {
    /// Rising queries only feed the emerging list
    #[default]
    EmergingOnly,
    /// Rising queries are also typed into questions/attributes, deduplicated
    /// by query text
    MergeIntoTypes,
}

impl RisingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RisingPolicy::EmergingOnly => "emerging_only",
            RisingPolicy::MergeIntoTypes => "merge_into_types",
        }
    }
}

/// Which interrogative markers identify a question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum QuestionLexicon {
    /// Spanish and English
    #[default]
    Core,
    /// Spanish, English, French, German and Portuguese
    Multilingual,
}

impl QuestionLexicon {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionLexicon::Core => "core",
            QuestionLexicon::Multilingual => "multilingual",
        }
    }
}

/// Related topic passed through for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedTopic {
    pub title: String,
    pub topic_type: Option<String>,
    pub value: Option<QueryValue>,
    pub extracted_value: Option<f64>,
}

/// Related topics in the provider's two buckets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedTopics {
    pub top: Vec<RelatedTopic>,
    pub rising: Vec<RelatedTopic>,
}

/// Country the provider can be queried for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// Result of analysing one brand in one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandAnalysis {
    pub brand: String,
    pub geo: String,
    pub country: String,
    pub metrics: Option<ChangeMetrics>,
    pub series: Vec<SeriesPoint>,
    pub queries: ClassifiedQueries,
    pub topics: RelatedTopics,
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Report provenance information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProvenance {
    pub brand: String,
    pub geo: String,
    pub country: String,
    pub computed_at_utc: String,
}

/// Selection and policy used to classify the queries in a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    pub threshold: f64,
    pub categories: Vec<String>,
    pub rising_policy: RisingPolicy,
}

/// Complete report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub provenance: ReportProvenance,
    pub settings: ReportSettings,
    pub metrics: Option<ChangeMetrics>,
    pub series: Vec<SeriesPoint>,
    pub queries: ClassifiedQueries,
    pub topics: RelatedTopics,
}

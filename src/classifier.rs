//! Related-query classification
//!
//! Turns the provider's "top" and "rising" related queries into four
//! relevance-sorted lists:
//! - `all_queries`: every top query at or above the threshold
//! - `questions` / `attributes`: the same queries split by interrogative markers
//! - `emerging`: rising queries flagged as breakout or above 100% growth
//!
//! How rising queries are routed besides `emerging` is set by [`RisingPolicy`].

use crate::relevance::RelevanceScorer;
use crate::schema::{QueryRecord, RelatedQueriesPayload};
use crate::types::{
    ClassifiedQueries, ClassifiedQuery, ProductCategory, QueryType, QuestionLexicon,
    RelevanceBadge, RisingPolicy,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default minimum relevance for a query to be kept
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 30.0;

pub const SPANISH_MARKERS: &[&str] = &[
    "qué", "cómo", "cuál", "cuáles", "dónde", "cuándo", "por qué", "quién",
];

pub const ENGLISH_MARKERS: &[&str] = &["what", "how", "which", "where", "when", "why", "who"];

pub const FRENCH_MARKERS: &[&str] = &[
    "quoi", "comment", "quel", "quelle", "où", "quand", "pourquoi", "qui",
];

pub const GERMAN_MARKERS: &[&str] = &["was", "wie", "welche", "wo", "wann", "warum", "wer"];

pub const PORTUGUESE_MARKERS: &[&str] = &[
    "que", "como", "qual", "onde", "quando", "por que", "quem",
];

/// Interrogative markers for a lexicon
pub fn question_markers(lexicon: QuestionLexicon) -> Vec<&'static str> {
    let mut markers: Vec<&'static str> = Vec::new();
    markers.extend_from_slice(SPANISH_MARKERS);
    markers.extend_from_slice(ENGLISH_MARKERS);
    if lexicon == QuestionLexicon::Multilingual {
        markers.push("para qué");
        markers.extend_from_slice(FRENCH_MARKERS);
        markers.extend_from_slice(GERMAN_MARKERS);
        markers.extend_from_slice(PORTUGUESE_MARKERS);
    }
    markers
}

/// Options for one classification run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifyOptions {
    /// Queries scoring below this are dropped
    pub threshold: f64,
    pub rising_policy: RisingPolicy,
    pub lexicon: QuestionLexicon,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_RELEVANCE_THRESHOLD,
            rising_policy: RisingPolicy::default(),
            lexicon: QuestionLexicon::default(),
        }
    }
}

impl ClassifyOptions {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }
}

/// Classifier for related queries
pub struct QueryClassifier;

impl QueryClassifier {
    /// Classify a related-queries payload. Missing buckets contribute nothing.
    pub fn classify(
        payload: &RelatedQueriesPayload,
        categories: &[ProductCategory],
        options: &ClassifyOptions,
    ) -> ClassifiedQueries {
        let markers = question_markers(options.lexicon);
        let mut result = ClassifiedQueries::default();

        for record in payload.top() {
            let Some(classified) = classify_record(record, categories, options.threshold, &markers)
            else {
                continue;
            };

            result.all_queries.push(classified.clone());
            match classified.query_type {
                QueryType::Question => result.questions.push(classified),
                QueryType::Attribute => result.attributes.push(classified),
            }
        }

        for record in payload.rising() {
            let Some(classified) = classify_record(record, categories, options.threshold, &markers)
            else {
                continue;
            };

            if options.rising_policy == RisingPolicy::MergeIntoTypes {
                let target = match classified.query_type {
                    QueryType::Question => &mut result.questions,
                    QueryType::Attribute => &mut result.attributes,
                };
                if !target.iter().any(|q| q.query == classified.query) {
                    target.push(classified.clone());
                }
            }

            let emerging = record.value.as_ref().is_some_and(|v| v.is_emerging());
            if emerging {
                result.emerging.push(classified);
            }
        }

        sort_by_relevance(&mut result.all_queries);
        sort_by_relevance(&mut result.questions);
        sort_by_relevance(&mut result.attributes);
        sort_by_relevance(&mut result.emerging);

        debug!(
            all = result.all_queries.len(),
            questions = result.questions.len(),
            attributes = result.attributes.len(),
            emerging = result.emerging.len(),
            "related queries classified"
        );

        result
    }

    /// True when the query contains any interrogative marker of the lexicon
    pub fn is_question(query: &str, lexicon: QuestionLexicon) -> bool {
        let query_lower = query.to_lowercase();
        question_markers(lexicon)
            .iter()
            .any(|marker| query_lower.contains(marker))
    }
}

fn classify_record(
    record: &QueryRecord,
    categories: &[ProductCategory],
    threshold: f64,
    markers: &[&str],
) -> Option<ClassifiedQuery> {
    let query = record.query_text();
    let relevance = RelevanceScorer::score(query, categories);

    if relevance.score < threshold {
        debug!(query, score = relevance.score, threshold, "query below relevance threshold");
        return None;
    }

    let query_lower = query.to_lowercase();
    let query_type = if markers.iter().any(|marker| query_lower.contains(marker)) {
        QueryType::Question
    } else {
        QueryType::Attribute
    };

    Some(ClassifiedQuery {
        query: query.to_string(),
        value: record.value.clone(),
        extracted_value: record.extracted_value,
        category: relevance.category_label().to_string(),
        badge: RelevanceBadge::from_score(relevance.score),
        relevance: relevance.score,
        matched_keywords: relevance.matched_keywords,
        query_type,
    })
}

/// Stable sort, highest relevance first
fn sort_by_relevance(queries: &mut [ClassifiedQuery]) {
    queries.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
}

//! Trend Hunter - Search-trend metrics and relevance classification engine
//!
//! Trend Hunter turns raw Google Trends responses into product-team signals
//! through a deterministic pipeline: payload adaptation → series normalization
//! → change metrics → related-query relevance classification → report encoding.
//!
//! ## Modules
//!
//! - **Core**: normalizer, metrics, relevance, classifier
//! - **Boundary**: provider payload schema and adapters, configuration, FFI
//! - **Bulk**: brand extraction and brand lists, cross-country summaries

pub mod adapters;
pub mod brand;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod normalizer;
pub mod pipeline;
pub mod relevance;
pub mod schema;
pub mod summary;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use classifier::{ClassifyOptions, QueryClassifier};
pub use config::HunterConfig;
pub use error::ComputeError;
pub use metrics::MetricsCalculator;
pub use normalizer::SeriesNormalizer;
pub use pipeline::{
    related_queries_to_classified, timeseries_to_metrics, ProviderPayloads, TrendProcessor,
};
pub use relevance::RelevanceScorer;

/// Trend Hunter version embedded in all reports
pub const HUNTER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "trend-hunter";

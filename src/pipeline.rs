//! Pipeline orchestration
//!
//! This module provides the public API for Trend Hunter.
//! It orchestrates the full pipeline from raw provider JSON to a report.

use crate::adapters::{to_related_topics, SerpApiAdapter, TrendsPayloadAdapter};
use crate::classifier::{ClassifyOptions, QueryClassifier};
use crate::config::HunterConfig;
use crate::encoder::ReportEncoder;
use crate::error::ComputeError;
use crate::metrics::MetricsCalculator;
use crate::normalizer::SeriesNormalizer;
use crate::types::{
    BrandAnalysis, ChangeMetrics, ClassifiedQueries, MissingPointPolicy, ProductCategory,
    RelatedTopics, ReportSettings, TrendReport,
};
use tracing::info;

/// Compute change metrics from a raw interest-over-time response.
///
/// # Returns
/// `Ok(None)` when the series is too short or not numeric; `Err` only when
/// `raw_json` is not JSON at all.
///
/// # Example
/// ```ignore
/// let metrics = timeseries_to_metrics(&serpapi_json)?;
/// ```
pub fn timeseries_to_metrics(raw_json: &str) -> Result<Option<ChangeMetrics>, ComputeError> {
    let payload = SerpApiAdapter.interest_over_time(raw_json)?;
    let series = SeriesNormalizer::normalize(payload.timeline(), MissingPointPolicy::Drop);
    Ok(MetricsCalculator::compute(&series))
}

/// Classify a raw related-queries response against `categories`.
///
/// # Example
/// ```ignore
/// let classified = related_queries_to_classified(
///     &serpapi_json,
///     &categories,
///     &ClassifyOptions::with_threshold(50.0),
/// )?;
/// ```
pub fn related_queries_to_classified(
    raw_json: &str,
    categories: &[ProductCategory],
    options: &ClassifyOptions,
) -> Result<ClassifiedQueries, ComputeError> {
    let payload = SerpApiAdapter.related_queries(raw_json)?;
    Ok(QueryClassifier::classify(&payload, categories, options))
}

/// Raw provider responses for one brand in one country
#[derive(Debug, Clone, Copy)]
pub struct ProviderPayloads<'a> {
    pub timeseries: &'a str,
    pub queries: &'a str,
    pub topics: Option<&'a str>,
}

/// Configured processor for analysing brands.
///
/// Configuration is validated once at construction; the processor is
/// immutable afterwards and can be shared across threads.
pub struct TrendProcessor {
    config: HunterConfig,
    categories: Vec<ProductCategory>,
    encoder: ReportEncoder,
}

impl TrendProcessor {
    /// Create a processor from a configuration
    pub fn new(config: HunterConfig) -> Result<Self, ComputeError> {
        config.validate()?;
        let categories = config.selected()?;

        Ok(Self {
            config,
            categories,
            encoder: ReportEncoder::new(),
        })
    }

    /// Create a processor from a JSON configuration string
    pub fn from_config_json(json: &str) -> Result<Self, ComputeError> {
        Self::new(HunterConfig::from_json(json)?)
    }

    pub fn config(&self) -> &HunterConfig {
        &self.config
    }

    /// Selected categories, in selection order
    pub fn categories(&self) -> &[ProductCategory] {
        &self.categories
    }

    /// Settings recorded in every report
    pub fn settings(&self) -> ReportSettings {
        ReportSettings {
            threshold: self.config.relevance_threshold,
            categories: self.categories.iter().map(|c| c.name.clone()).collect(),
            rising_policy: self.config.rising_policy,
        }
    }

    /// Analyse one brand in one country.
    ///
    /// Pipeline stages:
    /// 1. SerpApiAdapter - Parse provider JSON into typed payloads
    /// 2. SeriesNormalizer - Interest values and chart points
    /// 3. MetricsCalculator - Change metrics
    /// 4. QueryClassifier - Score and classify related queries
    pub fn analyze(
        &self,
        brand: &str,
        geo: &str,
        payloads: &ProviderPayloads<'_>,
    ) -> Result<BrandAnalysis, ComputeError> {
        let adapter = SerpApiAdapter;

        // Stage 1: Parse provider payloads
        let timeseries = adapter.interest_over_time(payloads.timeseries)?;
        let related = adapter.related_queries(payloads.queries)?;
        let topics = match payloads.topics {
            Some(raw) => to_related_topics(&adapter.related_topics(raw)?, self.config.top_topics),
            None => RelatedTopics::default(),
        };

        // Stage 2: Normalize
        let timeline = timeseries.timeline();
        let series = SeriesNormalizer::normalize(timeline, self.config.missing_points);
        let chart = SeriesNormalizer::chart_points(timeline);

        // Stage 3: Metrics
        let metrics = MetricsCalculator::compute(&series);

        // Stage 4: Classify
        let queries =
            QueryClassifier::classify(&related, &self.categories, &self.config.classify_options());

        info!(
            brand,
            geo,
            points = series.len(),
            metrics_available = metrics.is_some(),
            queries = queries.all_queries.len(),
            emerging = queries.emerging.len(),
            rising_policy = self.config.rising_policy.as_str(),
            "brand analysed"
        );

        Ok(BrandAnalysis {
            brand: brand.to_string(),
            geo: geo.to_uppercase(),
            country: self.config.country_name(geo),
            metrics,
            series: chart,
            queries,
            topics,
        })
    }

    /// Analyse one brand and wrap the result in a report
    pub fn report(
        &self,
        brand: &str,
        geo: &str,
        payloads: &ProviderPayloads<'_>,
    ) -> Result<TrendReport, ComputeError> {
        let analysis = self.analyze(brand, geo, payloads)?;
        Ok(self.encoder.encode(&analysis, &self.settings()))
    }

    /// Analyse one brand and encode the report as JSON
    pub fn analyze_to_json(
        &self,
        brand: &str,
        geo: &str,
        payloads: &ProviderPayloads<'_>,
    ) -> Result<String, ComputeError> {
        let analysis = self.analyze(brand, geo, payloads)?;
        self.encoder.encode_to_json(&analysis, &self.settings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RisingPolicy;
    use pretty_assertions::assert_eq;

    fn sample_timeseries_json(weeks: usize) -> String {
        let points: Vec<String> = (1..=weeks)
            .map(|week| {
                format!(
                    r#"{{"date": "Week {week}", "timestamp": "{}", "values": [
                        {{"query": "logitech", "value": "{week}", "extracted_value": {week}}}
                    ]}}"#,
                    1_700_000_000 + week * 604_800
                )
            })
            .collect();
        format!(
            r#"{{"interest_over_time": {{"timeline_data": [{}]}}}}"#,
            points.join(",")
        )
    }

    fn sample_queries_json() -> &'static str {
        r#"{
            "related_queries": {
                "top": [
                    {"query": "ratón gaming mouse", "value": "100", "extracted_value": 100},
                    {"query": "logitech g pro", "value": "45", "extracted_value": 45},
                    {"query": "cómo elegir ratón mouse", "value": "20", "extracted_value": 20}
                ],
                "rising": [
                    {"query": "gaming mouse inalámbrico", "value": "Breakout", "extracted_value": 5000},
                    {"query": "ratón vertical", "value": "+40%", "extracted_value": 40}
                ]
            }
        }"#
    }

    fn sample_topics_json() -> &'static str {
        r#"{
            "related_topics": {
                "top": [
                    {"topic": {"title": "Logitech", "type": "Company"}, "value": "100", "extracted_value": 100},
                    {"topic": {"title": "Computer mouse", "type": "Topic"}, "value": "30", "extracted_value": 30}
                ],
                "rising": []
            }
        }"#
    }

    fn mice_config() -> HunterConfig {
        HunterConfig {
            selected_categories: vec!["Ratones".to_string()],
            ..HunterConfig::default()
        }
    }

    #[test]
    fn test_timeseries_to_metrics() {
        let metrics = timeseries_to_metrics(&sample_timeseries_json(52))
            .unwrap()
            .unwrap();
        assert!((metrics.quarter_change - 30.0).abs() < 1e-9);
        assert!((metrics.average - 26.5).abs() < 1e-9);

        assert_eq!(timeseries_to_metrics(&sample_timeseries_json(11)).unwrap(), None);
    }

    #[test]
    fn test_related_queries_to_classified() {
        let categories = mice_config().selected().unwrap();
        let classified = related_queries_to_classified(
            sample_queries_json(),
            &categories,
            &ClassifyOptions::default(),
        )
        .unwrap();

        let kept: Vec<&str> = classified
            .all_queries
            .iter()
            .map(|q| q.query.as_str())
            .collect();
        // "ratón gaming mouse": 3 of 15 keywords + bonus = 40
        // "cómo elegir ratón mouse": 2 of 15 + bonus = 33.3
        assert_eq!(kept, vec!["ratón gaming mouse", "cómo elegir ratón mouse"]);
        assert_eq!(classified.questions.len(), 1);
        assert_eq!(classified.emerging.len(), 1);
        assert_eq!(classified.emerging[0].query, "gaming mouse inalámbrico");
    }

    #[test]
    fn test_processor_analyze() {
        let processor = TrendProcessor::new(mice_config()).unwrap();
        let timeseries = sample_timeseries_json(52);
        let payloads = ProviderPayloads {
            timeseries: &timeseries,
            queries: sample_queries_json(),
            topics: Some(sample_topics_json()),
        };

        let analysis = processor.analyze("Logitech", "es", &payloads).unwrap();
        assert_eq!(analysis.geo, "ES");
        assert_eq!(analysis.country, "Spain");
        assert!(analysis.metrics.is_some());
        assert_eq!(analysis.series.len(), 52);
        assert_eq!(analysis.series[0].date, "Week 1");
        assert_eq!(analysis.topics.top.len(), 2);
        assert_eq!(analysis.topics.top[0].title, "Logitech");
    }

    #[test]
    fn test_processor_report_json() {
        let processor = TrendProcessor::new(mice_config()).unwrap();
        let timeseries = sample_timeseries_json(5);
        let payloads = ProviderPayloads {
            timeseries: &timeseries,
            queries: "null",
            topics: None,
        };

        let json = processor.analyze_to_json("Razer", "FR", &payloads).unwrap();
        let report: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(report["producer"]["name"], "trend-hunter");
        assert_eq!(report["provenance"]["country"], "France");
        assert_eq!(report["settings"]["categories"][0], "Ratones");
        assert!(report["metrics"].is_null());
        assert_eq!(report["series"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_processor_rejects_invalid_config() {
        let config = HunterConfig {
            relevance_threshold: 101.0,
            ..HunterConfig::default()
        };
        assert!(matches!(
            TrendProcessor::new(config),
            Err(ComputeError::InvalidThreshold(_))
        ));

        assert!(TrendProcessor::from_config_json(r#"{"rising_policy": "sometimes"}"#).is_err());
    }

    #[test]
    fn test_settings_reflect_config() {
        let config = HunterConfig {
            rising_policy: RisingPolicy::MergeIntoTypes,
            selected_categories: vec!["Teclados".to_string(), "Ratones".to_string()],
            ..HunterConfig::default()
        };
        let processor = TrendProcessor::new(config).unwrap();
        let settings = processor.settings();
        assert_eq!(settings.categories, vec!["Teclados".to_string(), "Ratones".to_string()]);
        assert_eq!(settings.rising_policy, RisingPolicy::MergeIntoTypes);
    }

    #[test]
    fn test_invalid_json() {
        assert!(timeseries_to_metrics("not valid json").is_err());

        let processor = TrendProcessor::new(HunterConfig::default()).unwrap();
        let payloads = ProviderPayloads {
            timeseries: "{}",
            queries: "not json",
            topics: None,
        };
        assert!(processor.analyze("Logitech", "ES", &payloads).is_err());
    }

    #[test]
    fn test_processor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TrendProcessor>();
    }
}

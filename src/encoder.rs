//! Report encoding
//!
//! This module wraps a brand analysis into a versioned report with producer
//! and provenance metadata, ready to be written as JSON or NDJSON.

use crate::error::ComputeError;
use crate::types::{BrandAnalysis, ReportProducer, ReportProvenance, ReportSettings, TrendReport};
use crate::{HUNTER_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Encoder producing [`TrendReport`] payloads
#[derive(Debug, Clone)]
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Encode an analysis together with the settings that produced it
    pub fn encode(&self, analysis: &BrandAnalysis, settings: &ReportSettings) -> TrendReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: HUNTER_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let provenance = ReportProvenance {
            brand: analysis.brand.clone(),
            geo: analysis.geo.clone(),
            country: analysis.country.clone(),
            computed_at_utc: Utc::now().to_rfc3339(),
        };

        TrendReport {
            report_version: REPORT_VERSION.to_string(),
            producer,
            provenance,
            settings: settings.clone(),
            metrics: analysis.metrics,
            series: analysis.series.clone(),
            queries: analysis.queries.clone(),
            topics: analysis.topics.clone(),
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        analysis: &BrandAnalysis,
        settings: &ReportSettings,
    ) -> Result<String, ComputeError> {
        let report = self.encode(analysis, settings);
        serde_json::to_string_pretty(&report)
            .map_err(|e| ComputeError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ChangeMetrics, ClassifiedQueries, RelatedTopics, RisingPolicy, SeriesPoint,
    };
    use pretty_assertions::assert_eq;

    fn make_analysis(metrics: Option<ChangeMetrics>) -> BrandAnalysis {
        BrandAnalysis {
            brand: "Logitech".to_string(),
            geo: "ES".to_string(),
            country: "Spain".to_string(),
            metrics,
            series: vec![
                SeriesPoint {
                    date: "Jan 7, 2024".to_string(),
                    value: 40.0,
                },
                SeriesPoint {
                    date: "Jan 14, 2024".to_string(),
                    value: 0.0,
                },
            ],
            queries: ClassifiedQueries::default(),
            topics: RelatedTopics::default(),
        }
    }

    fn make_settings() -> ReportSettings {
        ReportSettings {
            threshold: 30.0,
            categories: vec!["Ratones".to_string()],
            rising_policy: RisingPolicy::EmergingOnly,
        }
    }

    #[test]
    fn test_encode_report() {
        let metrics = ChangeMetrics {
            month_change: 8.5,
            quarter_change: -3.0,
            year_change: 120.0,
            average: 55.2,
        };
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let report = encoder.encode(&make_analysis(Some(metrics)), &make_settings());

        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.version, HUNTER_VERSION);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.provenance.brand, "Logitech");
        assert_eq!(report.provenance.country, "Spain");
        assert!(chrono::DateTime::parse_from_rfc3339(&report.provenance.computed_at_utc).is_ok());
        assert_eq!(report.metrics, Some(metrics));
        assert_eq!(report.series.len(), 2);
        assert_eq!(report.settings.categories, vec!["Ratones".to_string()]);
    }

    #[test]
    fn test_encode_to_json_unavailable_metrics() {
        let encoder = ReportEncoder::new();
        let json = encoder
            .encode_to_json(&make_analysis(None), &make_settings())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["metrics"].is_null());
        assert_eq!(parsed["settings"]["rising_policy"], "emerging_only");
        assert_eq!(parsed["series"][1]["value"], 0.0);
        assert!(parsed["queries"]["all_queries"].as_array().unwrap().is_empty());
        assert!(parsed["topics"]["rising"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_instance_ids_differ() {
        assert_ne!(
            ReportEncoder::new().instance_id(),
            ReportEncoder::new().instance_id()
        );
    }
}

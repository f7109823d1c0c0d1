//! Time-series normalization
//!
//! This module turns a provider timeline into an ordered sequence of interest
//! values.
//! - Points without a value list are dropped (or zero-filled on request)
//! - A point whose first value has no `extracted_value` contributes 0
//! - Non-numeric values are counted as anomalies, never coerced

use crate::schema::{RawInterest, TimelinePoint};
use crate::types::{MissingPointPolicy, NormalizedSeries, SeriesPoint};
use tracing::debug;

/// Normalizer for converting provider timelines to interest series
pub struct SeriesNormalizer;

impl SeriesNormalizer {
    /// Normalize timeline points, preserving their order
    pub fn normalize(points: &[TimelinePoint], policy: MissingPointPolicy) -> NormalizedSeries {
        let mut values = Vec::with_capacity(points.len());
        let mut anomalies = 0;

        for point in points {
            match point_value(point) {
                PointValue::Value(value) => values.push(value),
                PointValue::Empty => match policy {
                    MissingPointPolicy::Drop => {}
                    MissingPointPolicy::ZeroFill => values.push(0.0),
                },
                PointValue::Anomaly => anomalies += 1,
            }
        }

        if anomalies > 0 {
            debug!(anomalies, "timeline contains non-numeric interest values");
        }
        if values.len() < points.len() {
            debug!(
                kept = values.len(),
                total = points.len(),
                "timeline points dropped during normalization"
            );
        }

        NormalizedSeries { values, anomalies }
    }

    /// Dated values for charting. Every point is kept; points without a
    /// usable value plot as 0 so dates and values stay aligned.
    pub fn chart_points(points: &[TimelinePoint]) -> Vec<SeriesPoint> {
        points
            .iter()
            .map(|point| SeriesPoint {
                date: point.date_label().to_string(),
                value: match point_value(point) {
                    PointValue::Value(value) => value,
                    PointValue::Empty | PointValue::Anomaly => 0.0,
                },
            })
            .collect()
    }
}

enum PointValue {
    Value(f64),
    Empty,
    Anomaly,
}

fn point_value(point: &TimelinePoint) -> PointValue {
    let Some(first) = point.first_value() else {
        return PointValue::Empty;
    };

    match &first.extracted_value {
        None => PointValue::Value(0.0),
        Some(RawInterest::Number(n)) => PointValue::Value(*n),
        Some(RawInterest::Other(_)) => PointValue::Anomaly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TimelineValue;
    use pretty_assertions::assert_eq;

    fn point(date: &str, values: Option<Vec<TimelineValue>>) -> TimelinePoint {
        TimelinePoint {
            date: Some(date.to_string()),
            timestamp: None,
            values,
        }
    }

    fn value(extracted: Option<RawInterest>) -> Option<Vec<TimelineValue>> {
        Some(vec![TimelineValue {
            query: Some("brand".to_string()),
            value: None,
            extracted_value: extracted,
        }])
    }

    #[test]
    fn test_normalize_preserves_order() {
        let points = vec![
            point("w1", value(Some(RawInterest::Number(30.0)))),
            point("w2", value(Some(RawInterest::Number(10.0)))),
            point("w3", value(Some(RawInterest::Number(20.0)))),
        ];

        let series = SeriesNormalizer::normalize(&points, MissingPointPolicy::Drop);
        assert_eq!(series.values, vec![30.0, 10.0, 20.0]);
        assert_eq!(series.anomalies, 0);
    }

    #[test]
    fn test_empty_value_list_dropped_but_missing_field_is_zero() {
        let points = vec![
            point("w1", value(Some(RawInterest::Number(5.0)))),
            point("w2", Some(vec![])),
            point("w3", None),
            point("w4", value(None)),
        ];

        let series = SeriesNormalizer::normalize(&points, MissingPointPolicy::Drop);
        assert_eq!(series.values, vec![5.0, 0.0]);
    }

    #[test]
    fn test_zero_fill_keeps_every_point() {
        let points = vec![
            point("w1", value(Some(RawInterest::Number(5.0)))),
            point("w2", Some(vec![])),
            point("w3", None),
        ];

        let series = SeriesNormalizer::normalize(&points, MissingPointPolicy::ZeroFill);
        assert_eq!(series.values, vec![5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_non_numeric_value_is_anomaly() {
        let points = vec![
            point("w1", value(Some(RawInterest::Number(5.0)))),
            point(
                "w2",
                value(Some(RawInterest::Other(serde_json::Value::String(
                    "<1".to_string(),
                )))),
            ),
        ];

        let series = SeriesNormalizer::normalize(&points, MissingPointPolicy::Drop);
        assert_eq!(series.values, vec![5.0]);
        assert_eq!(series.anomalies, 1);
        assert!(!series.is_clean());
    }

    #[test]
    fn test_degenerate_input() {
        let series = SeriesNormalizer::normalize(&[], MissingPointPolicy::Drop);
        assert!(series.is_empty());
    }

    #[test]
    fn test_chart_points_align_with_dates() {
        let points = vec![
            point("w1", value(Some(RawInterest::Number(5.0)))),
            point("w2", None),
            point("w3", value(Some(RawInterest::Number(7.5)))),
        ];

        let chart = SeriesNormalizer::chart_points(&points);
        assert_eq!(
            chart,
            vec![
                SeriesPoint { date: "w1".to_string(), value: 5.0 },
                SeriesPoint { date: "w2".to_string(), value: 0.0 },
                SeriesPoint { date: "w3".to_string(), value: 7.5 },
            ]
        );
    }
}

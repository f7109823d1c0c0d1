//! Change metrics
//!
//! This module derives percentage changes from a normalized interest series
//! at three fixed lookback horizons, plus the long-run average:
//! - month: 5 steps back
//! - quarter: 13 steps back
//! - year: 52 steps back
//!
//! Horizons assume weekly sampling. A horizon longer than the series falls
//! back to the oldest value.

use crate::types::{ChangeMetrics, NormalizedSeries};
use tracing::debug;

/// Minimum number of values required before any metric is reported
pub const MIN_SERIES_LEN: usize = 12;

/// Lookback offsets, counted from the end of the series
pub const MONTH_OFFSET: usize = 5;
pub const QUARTER_OFFSET: usize = 13;
pub const YEAR_OFFSET: usize = 52;

/// Calculator for change metrics
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Compute change metrics, or `None` when the series is too short or
    /// contains values that are not usable numbers
    pub fn compute(series: &NormalizedSeries) -> Option<ChangeMetrics> {
        if !series.is_clean() {
            debug!(anomalies = series.anomalies, "series not clean, metrics unavailable");
            return None;
        }

        let values = &series.values;
        if values.len() < MIN_SERIES_LEN {
            debug!(len = values.len(), "series too short, metrics unavailable");
            return None;
        }

        let current = *values.last()?;

        let metrics = ChangeMetrics {
            month_change: percent_change(current, lookback(values, MONTH_OFFSET)?),
            quarter_change: percent_change(current, lookback(values, QUARTER_OFFSET)?),
            year_change: percent_change(current, lookback(values, YEAR_OFFSET)?),
            average: mean(values),
        };

        let finite = metrics.month_change.is_finite()
            && metrics.quarter_change.is_finite()
            && metrics.year_change.is_finite()
            && metrics.average.is_finite();

        if finite {
            Some(metrics)
        } else {
            debug!("change metrics overflowed, metrics unavailable");
            None
        }
    }
}

/// Value `offset` steps from the end, or the oldest value when the series
/// is shorter than the offset
fn lookback(values: &[f64], offset: usize) -> Option<f64> {
    values
        .len()
        .checked_sub(offset)
        .and_then(|idx| values.get(idx))
        .or_else(|| values.first())
        .copied()
}

/// Percentage change from `reference` to `current`; 0 for a non-positive
/// reference
pub fn percent_change(current: f64, reference: f64) -> f64 {
    if reference > 0.0 {
        (current - reference) / reference * 100.0
    } else {
        0.0
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<f64>) -> NormalizedSeries {
        NormalizedSeries::new(values)
    }

    #[test]
    fn test_ascending_52_weeks() {
        let values: Vec<f64> = (1..=52).map(|v| v as f64).collect();
        let metrics = MetricsCalculator::compute(&series(values)).unwrap();

        // (52 - 48) / 48
        assert!((metrics.month_change - 8.3333).abs() < 0.001);
        // (52 - 40) / 40
        assert!((metrics.quarter_change - 30.0).abs() < 1e-9);
        // offset 52 is the first element
        assert!((metrics.year_change - 5100.0).abs() < 1e-9);
        assert!((metrics.average - 26.5).abs() < 1e-9);
    }

    #[test]
    fn test_short_series_unavailable() {
        for len in 0..MIN_SERIES_LEN {
            let values = vec![10.0; len];
            assert!(MetricsCalculator::compute(&series(values)).is_none());
        }
    }

    #[test]
    fn test_minimum_length_uses_fallbacks() {
        // 12 values: month looks 5 back, quarter and year fall back to the first
        let values = vec![
            10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 20.0, 18.0, 19.0, 21.0, 30.0,
        ];
        let metrics = MetricsCalculator::compute(&series(values)).unwrap();

        assert!((metrics.month_change - 50.0).abs() < 1e-9);
        assert!((metrics.quarter_change - 200.0).abs() < 1e-9);
        assert!((metrics.year_change - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_year_offset_with_longer_series() {
        let mut values = vec![50.0; 60];
        values[60 - YEAR_OFFSET] = 25.0;
        let metrics = MetricsCalculator::compute(&series(values)).unwrap();
        assert!((metrics.year_change - 100.0).abs() < 1e-9);
        assert!(metrics.month_change.abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_reference_yields_zero() {
        let mut values = vec![0.0; 20];
        values[19] = 75.0;
        let metrics = MetricsCalculator::compute(&series(values)).unwrap();
        assert_eq!(metrics.month_change, 0.0);
        assert_eq!(metrics.quarter_change, 0.0);
        assert_eq!(metrics.year_change, 0.0);

        assert_eq!(percent_change(-5.0, -10.0), 0.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(-3.0, 0.0), 0.0);
    }

    #[test]
    fn test_all_zero_series() {
        let metrics = MetricsCalculator::compute(&series(vec![0.0; 12])).unwrap();
        assert_eq!(metrics.average, 0.0);
        assert_eq!(metrics.year_change, 0.0);
    }

    #[test]
    fn test_anomalies_make_metrics_unavailable() {
        let dirty = NormalizedSeries {
            values: vec![10.0; 20],
            anomalies: 1,
        };
        assert!(MetricsCalculator::compute(&dirty).is_none());

        let mut values = vec![10.0; 20];
        values[3] = f64::NAN;
        assert!(MetricsCalculator::compute(&series(values)).is_none());
    }

    #[test]
    fn test_overflow_is_unavailable() {
        let mut values = vec![f64::MIN_POSITIVE; 12];
        values[11] = f64::MAX;
        assert!(MetricsCalculator::compute(&series(values)).is_none());
    }

    #[test]
    fn test_values_above_provider_scale() {
        let mut values = vec![500.0; 12];
        values[11] = 1000.0;
        let metrics = MetricsCalculator::compute(&series(values)).unwrap();
        assert!((metrics.month_change - 100.0).abs() < 1e-9);
    }
}

//! `interest_over_time` payload
//!
//! Shape: `{ interest_over_time: { timeline_data: [ { date, values: [ { extracted_value } ] } ] } }`

use super::{lenient_items, lenient_text};
use serde::{Deserialize, Serialize};

/// Top-level time-series response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeseriesPayload {
    pub interest_over_time: Option<InterestOverTime>,
}

impl TimeseriesPayload {
    /// Timeline points, or an empty slice when any level is missing
    pub fn timeline(&self) -> &[TimelinePoint] {
        self.interest_over_time
            .as_ref()
            .and_then(|iot| iot.timeline_data.as_deref())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterestOverTime {
    #[serde(default, deserialize_with = "lenient_items")]
    pub timeline_data: Option<Vec<TimelinePoint>>,
}

/// One sampled period of the timeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Human-readable period, e.g. "Jan 1 – 7, 2023"
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    /// Unix timestamp of the period start, as a string
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,
    /// One entry per compared query; the first is the analysed one
    #[serde(default, deserialize_with = "lenient_items")]
    pub values: Option<Vec<TimelineValue>>,
}

impl TimelinePoint {
    /// First nested value, if the value list is present and non-empty
    pub fn first_value(&self) -> Option<&TimelineValue> {
        self.values.as_ref().and_then(|values| values.first())
    }

    pub fn date_label(&self) -> &str {
        self.date.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineValue {
    #[serde(default, deserialize_with = "lenient_text")]
    pub query: Option<String>,
    /// Display string, e.g. "45" or "<1"
    #[serde(default, deserialize_with = "lenient_text")]
    pub value: Option<String>,
    pub extracted_value: Option<RawInterest>,
}

/// Numeric interest as sent by the provider.
///
/// Anything that is not a JSON number is kept as-is so the normalizer can
/// count it as an anomaly instead of rejecting the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInterest {
    Number(f64),
    Other(serde_json::Value),
}

impl RawInterest {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawInterest::Number(n) => Some(*n),
            RawInterest::Other(_) => None,
        }
    }
}

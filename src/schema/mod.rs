//! Provider payload schema
//!
//! Typed views of the Google Trends payloads the presentation layer fetches.
//! Every field is optional so that partial payloads deserialize; the
//! adapters decide what a missing structure means.
//!
//! Lists are read element by element: a malformed point or record is dropped
//! on its own and its neighbours survive. Display-only fields of the wrong
//! JSON type read as absent.

mod related;
mod timeseries;

pub use related::*;
pub use timeseries::*;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Deserialize a list keeping every element that parses as `T`.
///
/// A list that is not a JSON array reads as absent.
pub(crate) fn lenient_items<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Ok(None),
        Some(other) => {
            debug!(found = %json_type(&other), "expected a list, treating as absent");
            return Ok(None);
        }
    };

    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if kept.len() < total {
        debug!(
            dropped = total - kept.len(),
            kept = kept.len(),
            "dropped malformed list elements"
        );
    }
    Ok(Some(kept))
}

/// Deserialize a field as `T`, or `None` when it has another shape
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|value| serde_json::from_value(value).ok()))
}

/// Deserialize a display string; numbers are kept in their JSON spelling
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

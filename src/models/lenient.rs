//! Forgiving field decoders for hand-edited JSON documents.
//!
//! A wrong-typed or null value decodes to "absent" instead of failing the
//! whole document; callers substitute the field's default.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::ingest::parse_number;

/// Scalars as text; numbers and booleans are stringified, anything else is absent.
pub(crate) fn text_value(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Finite numbers, or numeric strings read the same way as sheet cells.
pub(crate) fn number_value(value: Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|value| value.is_finite()),
        Value::String(text) => parse_number(&text),
        _ => None,
    }
}

pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(text_value(Value::deserialize(deserializer)?).unwrap_or_default())
}

pub(crate) fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(text_value(Value::deserialize(deserializer)?))
}

pub(crate) fn optional_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Ok(number_value(Value::deserialize(deserializer)?))
}

/// A list where unreadable elements are skipped rather than failing the list.
pub(crate) fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = match Value::deserialize(deserializer)? {
        Value::Array(values) => values,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::warn!("Expected a list of records, ignoring {}", other);
            return Ok(Vec::new());
        }
    };

    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(index, "Skipping unreadable record: {}", e);
                None
            }
        })
        .collect())
}

/// A nested record that decodes to `None` when it is unreadable.
pub(crate) fn optional_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => Ok(serde_json::from_value(value).ok()),
    }
}

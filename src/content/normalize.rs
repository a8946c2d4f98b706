//! Turns arbitrary parsed JSON into canonical content.
//!
//! Riddles have two cleaning paths with different failure behavior:
//!
//! - [`normalize_riddles_lenient`] is used when loading persisted files. It never
//!   fails: fields that cannot be coerced fall back to their defaults.
//! - [`normalize_riddles_strict`] is used for operator saves. A coordinate or
//!   tolerance that cannot be coerced rejects the whole save.
//!
//! Both drop elements that are not objects and reassign ids by position.

use serde_json::{Map, Value};

use super::defaults::{
    default_success_messages, DEFAULT_ENDING_TITLE, DEFAULT_HEADLINE, DEFAULT_SOUND,
    DEFAULT_SUBTITLE, DEFAULT_TOLERANCE_M, DEFAULT_TREASURE_MESSAGE,
};
use super::types::{LandingContent, Riddle, SuccessMessage};
use crate::error::ContentError;

pub const INVALID_RIDDLE_FIELDS: &str = "Invalid riddle fields";
pub const INVALID_LANDING_FIELDS: &str = "Invalid landing fields";

/// Load-time riddle cleaning: coerce or default, never fail.
pub fn normalize_riddles_lenient(raw: &Value) -> Vec<Riddle> {
    riddle_records(raw)
        .enumerate()
        .map(|(id, r)| Riddle {
            id,
            text: field_string(r, "text").unwrap_or_default(),
            lat: field(r, "lat").and_then(coerce_f64).unwrap_or(0.0),
            lng: field(r, "lng").and_then(coerce_f64).unwrap_or(0.0),
            tolerance_m: field(r, "tolerance_m")
                .and_then(coerce_f64)
                .unwrap_or(DEFAULT_TOLERANCE_M),
        })
        .collect()
}

/// Save-time riddle cleaning.
///
/// `lat` and `lng` are required; `tolerance_m` defaults when absent but must be
/// numeric when present. A non-array payload is rejected.
pub fn normalize_riddles_strict(raw: &Value) -> Result<Vec<Riddle>, ContentError> {
    if !raw.is_array() {
        return Err(ContentError::validation(INVALID_RIDDLE_FIELDS));
    }

    riddle_records(raw)
        .enumerate()
        .map(|(id, r)| -> Result<Riddle, ContentError> {
            let required = |key: &str| {
                field(r, key)
                    .and_then(coerce_f64)
                    .ok_or_else(|| ContentError::validation(INVALID_RIDDLE_FIELDS))
            };
            let tolerance_m = match r.get("tolerance_m") {
                None => DEFAULT_TOLERANCE_M,
                Some(v) => {
                    coerce_f64(v).ok_or_else(|| ContentError::validation(INVALID_RIDDLE_FIELDS))?
                }
            };

            Ok(Riddle {
                id,
                text: field_string(r, "text")
                    .map(|t| t.trim().to_string())
                    .unwrap_or_default(),
                lat: required("lat")?,
                lng: required("lng")?,
                tolerance_m,
            })
        })
        .collect()
}

/// Load-time landing cleaning: anything that is not an object yields the defaults.
pub fn normalize_landing(raw: &Value) -> LandingContent {
    match raw.as_object() {
        Some(map) => landing_from_map(map),
        None => LandingContent::default(),
    }
}

/// Save-time landing cleaning: the payload must at least be an object.
pub fn normalize_landing_strict(raw: &Value) -> Result<LandingContent, ContentError> {
    raw.as_object()
        .map(landing_from_map)
        .ok_or_else(|| ContentError::validation(INVALID_LANDING_FIELDS))
}

/// Keeps entries with non-empty text. An empty result is replaced by the built-in list.
pub fn normalize_success_messages(raw: &Value) -> Vec<SuccessMessage> {
    let messages: Vec<SuccessMessage> = raw
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let text = trimmed(item, "text")?;
            let sound = trimmed(item, "sound").unwrap_or_else(|| DEFAULT_SOUND.to_string());
            Some(SuccessMessage { text, sound })
        })
        .collect();

    if messages.is_empty() {
        default_success_messages()
    } else {
        messages
    }
}

fn landing_from_map(map: &Map<String, Value>) -> LandingContent {
    let or_default =
        |key: &str, default: &str| trimmed(map, key).unwrap_or_else(|| default.to_string());

    LandingContent {
        headline: or_default("headline", DEFAULT_HEADLINE),
        subtitle: or_default("subtitle", DEFAULT_SUBTITLE),
        ending_title: or_default("ending_title", DEFAULT_ENDING_TITLE),
        treasure_message: or_default("treasure_message", DEFAULT_TREASURE_MESSAGE),
        success_messages: normalize_success_messages(
            map.get("success_messages").unwrap_or(&Value::Null),
        ),
    }
}

fn riddle_records(raw: &Value) -> impl Iterator<Item = &Map<String, Value>> {
    raw.as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// A present, non-null field.
fn field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn field_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    field(map, key).and_then(coerce_string)
}

/// Trimmed string field, `None` when absent or blank.
fn trimmed(map: &Map<String, Value>, key: &str) -> Option<String> {
    field_string(map, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Scalars only; arrays and objects carry no usable text.
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// JSON numbers and numeric strings, finite values only.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

//! Value converters used by attribute declarations
//!
//! Every converter has the [`GetConverter`](crate::GetConverter) /
//! [`SetConverter`](crate::SetConverter) shape: it takes ownership of a JSON value and returns
//! the converted value or a [`Error::Conversion`].

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::SecondsFormat;
use chrono::Utc;
use error_stack::Report;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::error::Error;
use crate::error::Result;

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Normalize a stored timestamp on read
///
/// `null` stays `null`. RFC 3339 timestamps become UTC with millisecond precision, date-only
/// values (`YYYY-MM-DD`) are kept as dates.
///
/// # Errors
///
/// Returns [`Error::Conversion`] for anything else.
pub fn date_from_value(value: Value) -> Result<Value> { normalize_date(value) }

/// Normalize an outgoing timestamp on write
///
/// Accepts the same inputs as [`date_from_value`].
///
/// # Errors
///
/// Returns [`Error::Conversion`] for values that are neither `null` nor a date string.
pub fn date_to_value(value: Value) -> Result<Value> { normalize_date(value) }

fn normalize_date(value: Value) -> Result<Value> {
    let text = match value {
        Value::Null => return Ok(Value::Null),
        Value::String(text) => text,
        other => return Err(Report::new(Error::invalid_value("date", other))),
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&text) {
        return Ok(Value::String(
            timestamp
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ));
    }

    NaiveDate::parse_from_str(&text, DATE_ONLY_FORMAT)
        .map(|date| Value::String(date.format(DATE_ONLY_FORMAT).to_string()))
        .map_err(|e| Report::new(Error::conversion_failed(&format!("date '{text}'"), e)))
}

/// Expand simplified text into a rich-text list
///
/// A string becomes a single plain text segment, a list of strings becomes one segment per
/// string, and objects inside a list are kept as already formed segments.
///
/// # Errors
///
/// Returns [`Error::Conversion`] for numbers, booleans, `null` or nested lists.
pub fn rich_text_from_value(value: Value) -> Result<Value> {
    match value {
        Value::String(content) => Ok(Value::Array(vec![text_segment(content)])),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(content) => Ok(text_segment(content)),
                Value::Object(segment) => Ok(Value::Object(segment)),
                other => Err(Report::new(Error::invalid_value("rich text segment", other))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Err(Report::new(Error::invalid_value("rich text", other))),
    }
}

/// Build a plain text segment `{"type": "text", "text": {"content": ...}}`
pub fn text_segment(content: impl Into<String>) -> Value {
    json!({
        "type": "text",
        "text": { "content": content.into() },
    })
}

/// Require an object, returning its map
///
/// # Errors
///
/// Returns [`Error::Conversion`] naming `what` for any other value.
pub fn into_object(what: &str, value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Report::new(Error::invalid_value(what, other))),
    }
}

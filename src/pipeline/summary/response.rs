//! Lenient extraction of JSON payloads from free-form model output.

use serde::Deserialize;
use serde_json::Value;

use super::SummaryError;

/// Pull the JSON object out of a model response.
///
/// Slices from the first `{` to the last `}` (whole text if there is no
/// such pair), strips fenced-code markers, then parses.
pub fn extract_json_object(response: &str) -> Result<Value, SummaryError> {
    let trimmed = response.trim();
    let candidate = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => &trimmed[start..=end],
        _ => trimmed,
    };
    let cleaned = strip_code_fences(candidate);
    if cleaned.is_empty() {
        return Err(SummaryError::MalformedResponse("Empty model response".into()));
    }
    serde_json::from_str(cleaned).map_err(|e| SummaryError::JsonParsing(e.to_string()))
}

/// Like [`extract_json_object`] but also accepts a bare top-level array,
/// returning the items under `key` either way.
pub fn extract_json_list(response: &str, key: &str) -> Result<Vec<Value>, SummaryError> {
    let trimmed = strip_code_fences(response.trim());
    let object_start = trimmed.find('{');
    let array_start = trimmed.find('[');

    let array_first = match (array_start, object_start) {
        (Some(a), Some(o)) => a < o,
        (Some(_), None) => true,
        _ => false,
    };
    if array_first {
        if let Some(items) = parse_bare_array(trimmed) {
            return Ok(items);
        }
    }

    let value = extract_json_object(trimmed)?;
    list_field(&value, key)
}

/// Required array field of a parsed response. A missing or non-array
/// field is a shape error.
pub fn list_field(value: &Value, key: &str) -> Result<Vec<Value>, SummaryError> {
    match value.get(key) {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(Value::Null) | None => Err(SummaryError::MalformedResponse(format!(
            "Missing \"{key}\" array"
        ))),
        Some(_) => Err(SummaryError::MalformedResponse(format!(
            "\"{key}\" is not an array"
        ))),
    }
}

/// Required string field of one item.
pub fn required_str<'a>(item: &'a Value, key: &str) -> Result<&'a str, SummaryError> {
    item.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| SummaryError::MalformedResponse(format!("Item missing \"{key}\"")))
}

/// Optional string field; `None` when absent, null or not a string.
pub fn optional_str(item: &Value, key: &str) -> Option<String> {
    item.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Optional non-negative integer field. Accepts integral floats.
pub fn optional_usize(item: &Value, key: &str) -> Option<usize> {
    let value = item.get(key)?;
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= usize::MAX as f64)
        .map(|f| f as usize)
}

/// Parse an array leniently, skipping items that fail to deserialize.
pub fn parse_array_lenient<T: for<'de> Deserialize<'de>>(items: &[Value]) -> Vec<T> {
    items
        .iter()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect()
}

fn parse_bare_array(text: &str) -> Option<Vec<Value>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

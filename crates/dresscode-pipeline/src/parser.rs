//! Recover a JSON object from free-text analysis output

use crate::error::ParseError;
use serde_json::{Map, Value};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Extract and parse the JSON object embedded in a response
///
/// A ```` ```json ```` fenced block wins when present; its body runs to the
/// next fence, or to the end of the text if the fence is never closed.
/// Otherwise the span from the first `{` to the last `}` is parsed.
///
/// # Examples
///
/// ```
/// use dresscode_pipeline::parser::extract_json;
///
/// let response = "Here you go:\n```json\n{\"general\": {}}\n```";
/// let object = extract_json(response).unwrap();
/// assert!(object.contains_key("general"));
/// ```
pub fn extract_json(response: &str) -> Result<Map<String, Value>, ParseError> {
    let candidate = locate_json(response).ok_or(ParseError::NoJson)?;

    let value: Value =
        serde_json::from_str(candidate).map_err(|e| ParseError::Malformed(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::NotAnObject),
    }
}

/// The text that should hold the JSON, without parsing it
fn locate_json(response: &str) -> Option<&str> {
    if let Some(fence) = response.find(JSON_FENCE) {
        let body = &response[fence + JSON_FENCE.len()..];
        let end = body.find(FENCE).unwrap_or(body.len());
        return Some(body[..end].trim());
    }

    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| &response[start..=end])
}

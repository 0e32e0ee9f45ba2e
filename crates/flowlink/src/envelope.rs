//! Shape-specific unwrap for the common flow response envelope.
//!
//! Langflow-style servers wrap the interesting text in a known shape:
//! `outputs[0].outputs[0].results.message` (or `.text`). This fixed
//! traversal is tried before the generic heuristic in [`crate::extract`]
//! because it is exact when it matches.

use serde_json::Value;

/// Try the known response envelope, returning the message text on a match.
///
/// Checks, in order, under `outputs[0].outputs[0]`:
/// `results.message` (a string, or its `text` field), `results.text`,
/// then `message` (a string, or its `text` field). Any deviation from the
/// expected shape yields `None`.
pub fn unwrap_envelope(value: &Value) -> Option<&str> {
    let result = value.get("outputs")?.get(0)?.get("outputs")?.get(0)?;

    if let Some(results) = result.get("results") {
        if let Some(text) = message_text(results.get("message")) {
            return Some(text);
        }
        if let Some(text) = results.get("text").and_then(Value::as_str) {
            return Some(text);
        }
    }

    message_text(result.get("message"))
}

/// A message is either the string itself or an object carrying `text`.
fn message_text(message: Option<&Value>) -> Option<&str> {
    let message = message?;
    if let Some(text) = message.as_str() {
        return Some(text);
    }
    message.get("text").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_results_message_object() {
        let v = json!({
            "outputs": [{ "outputs": [{
                "results": { "message": { "text": "CV extracted: John Doe, 5 years experience" } }
            }]}]
        });
        assert_eq!(
            unwrap_envelope(&v),
            Some("CV extracted: John Doe, 5 years experience")
        );
    }

    #[test]
    fn test_results_message_string() {
        let v = json!({
            "outputs": [{ "outputs": [{ "results": { "message": "plain message" } }] }]
        });
        assert_eq!(unwrap_envelope(&v), Some("plain message"));
    }

    #[test]
    fn test_results_text() {
        let v = json!({
            "outputs": [{ "outputs": [{ "results": { "text": "text field" } }] }]
        });
        assert_eq!(unwrap_envelope(&v), Some("text field"));
    }

    #[test]
    fn test_bare_message_fallback() {
        let v = json!({
            "outputs": [{ "outputs": [{ "message": { "text": "bare message" } }] }]
        });
        assert_eq!(unwrap_envelope(&v), Some("bare message"));
    }

    #[test]
    fn test_results_message_preferred_over_bare_message() {
        let v = json!({
            "outputs": [{ "outputs": [{
                "results": { "message": "from results" },
                "message": "from result"
            }]}]
        });
        assert_eq!(unwrap_envelope(&v), Some("from results"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(unwrap_envelope(&json!({ "session_id": "abc123" })), None);
        assert_eq!(unwrap_envelope(&json!({ "outputs": [] })), None);
        assert_eq!(unwrap_envelope(&json!({ "outputs": [{ "outputs": [] }] })), None);
        assert_eq!(unwrap_envelope(&json!("just a string")), None);
        assert_eq!(
            unwrap_envelope(&json!({
                "outputs": [{ "outputs": [{ "results": { "message": { "data": 1 } } }] }]
            })),
            None
        );
    }
}

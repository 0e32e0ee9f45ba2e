//! Heuristic text extraction from untyped flow responses.
//!
//! Workflow servers return deeply nested, schema-less JSON. When the response
//! does not match the known envelope (see [`crate::envelope`]), this module
//! walks the tree looking for the first string that plausibly holds the
//! user-facing message text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key names checked before generic traversal, in order. These are the field
/// names that empirically hold message text in flow responses.
pub const DEFAULT_PRIORITY_KEYS: &[&str] =
    &["text", "message", "content", "response", "output", "answer"];

/// Default recursion depth cap.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default minimum text length. Strings at or below this length are assumed
/// to be enum/status codes rather than message text.
pub const DEFAULT_MIN_TEXT_LEN: usize = 10;

/// Tunable policy for the heuristic search.
///
/// The thresholds have no deeper rationale than "works on real responses",
/// so they are configuration rather than constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractPolicy {
    /// Keys checked first, in order, at every object encountered.
    pub priority_keys: Vec<String>,
    /// Maximum recursion depth from the root (root = depth 0).
    pub max_depth: usize,
    /// A string qualifies only when its character count exceeds this.
    pub min_text_len: usize,
}

impl Default for ExtractPolicy {
    fn default() -> Self {
        Self {
            priority_keys: DEFAULT_PRIORITY_KEYS.iter().map(|k| k.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
            min_text_len: DEFAULT_MIN_TEXT_LEN,
        }
    }
}

/// Depth-first, priority-first search for the first qualifying string.
///
/// Strings qualify when their character count exceeds `policy.min_text_len`.
/// Objects are searched priority keys first (short-circuiting on the first
/// hit), then remaining keys in insertion order. Arrays are deliberately
/// opaque: known array positions are unwrapped by the envelope pass, not
/// here, so an arbitrary list of strings never masquerades as message text.
///
/// Pure and total — malformed shapes and exhausted depth yield `None`,
/// never an error.
pub fn find_text<'a>(value: &'a Value, policy: &ExtractPolicy) -> Option<&'a str> {
    find_text_at(value, policy, 0)
}

fn find_text_at<'a>(value: &'a Value, policy: &ExtractPolicy, depth: usize) -> Option<&'a str> {
    if depth > policy.max_depth {
        return None;
    }

    match value {
        Value::String(s) if s.chars().count() > policy.min_text_len => Some(s),
        Value::Object(map) => {
            for key in &policy.priority_keys {
                if let Some(child) = map.get(key) {
                    if let Some(found) = find_text_at(child, policy, depth + 1) {
                        return Some(found);
                    }
                }
            }
            for (key, child) in map {
                if policy.priority_keys.iter().any(|k| k == key) {
                    continue;
                }
                if let Some(found) = find_text_at(child, policy, depth + 1) {
                    return Some(found);
                }
            }
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy() -> ExtractPolicy {
        ExtractPolicy::default()
    }

    #[test]
    fn test_long_string_found() {
        let v = json!("a sufficiently long string");
        assert_eq!(find_text(&v, &policy()), Some("a sufficiently long string"));
    }

    #[test]
    fn test_short_string_not_found() {
        let v = json!("short");
        assert_eq!(find_text(&v, &policy()), None);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Exactly at the threshold does not qualify.
        let v = json!("0123456789");
        assert_eq!(find_text(&v, &policy()), None);
        let v = json!("0123456789a");
        assert_eq!(find_text(&v, &policy()), Some("0123456789a"));
    }

    #[test]
    fn test_threshold_counts_chars_not_bytes() {
        // Six Arabic characters: many bytes, few characters.
        let v = json!("مرحباً");
        assert_eq!(find_text(&v, &policy()), None);
    }

    #[test]
    fn test_priority_key_hit() {
        let v = json!({ "text": "hello world!" });
        assert_eq!(find_text(&v, &policy()), Some("hello world!"));
    }

    #[test]
    fn test_priority_order() {
        let v = json!({
            "message": "the message field wins here",
            "answer": "the answer field loses here"
        });
        assert_eq!(find_text(&v, &policy()), Some("the message field wins here"));
    }

    #[test]
    fn test_short_priority_value_falls_through() {
        // The prioritized key fails the length threshold, so the search
        // continues into the non-priority branch.
        let v = json!({
            "message": "short",
            "other": "a sufficiently long fallback string"
        });
        assert_eq!(
            find_text(&v, &policy()),
            Some("a sufficiently long fallback string")
        );
    }

    #[test]
    fn test_nested_priority_key() {
        let v = json!({ "data": { "content": "nested content string here" } });
        assert_eq!(find_text(&v, &policy()), Some("nested content string here"));
    }

    #[test]
    fn test_arrays_are_opaque() {
        let v = json!(["a sufficiently long string inside an array"]);
        assert_eq!(find_text(&v, &policy()), None);

        let v = json!({ "items": ["a sufficiently long string inside an array"] });
        assert_eq!(find_text(&v, &policy()), None);
    }

    #[test]
    fn test_scalars_not_found() {
        assert_eq!(find_text(&json!(42), &policy()), None);
        assert_eq!(find_text(&json!(true), &policy()), None);
        assert_eq!(find_text(&json!(null), &policy()), None);
        assert_eq!(find_text(&json!({}), &policy()), None);
    }

    #[test]
    fn test_depth_limit() {
        // Valid text buried one level past the cap yields nothing.
        let mut v = json!("a sufficiently long string buried deep");
        for _ in 0..12 {
            v = json!({ "wrap": v });
        }
        assert_eq!(find_text(&v, &policy()), None);

        let shallow = ExtractPolicy {
            max_depth: 1,
            ..ExtractPolicy::default()
        };
        let v = json!({ "a": { "b": "a sufficiently long string" } });
        assert_eq!(find_text(&v, &shallow), None);
        let v = json!({ "a": "a sufficiently long string" });
        assert_eq!(find_text(&v, &shallow), Some("a sufficiently long string"));
    }

    #[test]
    fn test_deterministic() {
        let v = json!({
            "session_id": "abc123",
            "alpha": { "note": "first candidate in insertion order" },
            "beta": { "note": "second candidate in insertion order" }
        });
        let first = find_text(&v, &policy());
        for _ in 0..5 {
            assert_eq!(find_text(&v, &policy()), first);
        }
        assert_eq!(first, Some("first candidate in insertion order"));
    }

    #[test]
    fn test_custom_priority_keys() {
        let custom = ExtractPolicy {
            priority_keys: vec!["summary".to_string()],
            ..ExtractPolicy::default()
        };
        let v = json!({
            "text": "the default priority key text",
            "summary": "the custom priority key text"
        });
        assert_eq!(find_text(&v, &custom), Some("the custom priority key text"));
    }
}

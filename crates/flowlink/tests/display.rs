//! End-to-end display-text resolution against realistic flow responses.

use serde_json::{json, Value};

use flowlink::{resolve_display_text, ExtractPolicy, TextSource};

fn resolve(value: &Value) -> flowlink::DisplayText {
    resolve_display_text(value, &ExtractPolicy::default())
}

/// A realistic full run response as Langflow-style servers return it.
fn cv_extraction_response() -> Value {
    json!({
        "session_id": "cv-session-42",
        "outputs": [{
            "inputs": { "input_value": "/files/resume.pdf" },
            "outputs": [{
                "results": {
                    "message": {
                        "text": "CV extracted: John Doe, 5 years experience",
                        "sender": "Machine",
                        "sender_name": "AI",
                        "session_id": "cv-session-42"
                    }
                },
                "artifacts": {},
                "component_display_name": "Chat Output"
            }]
        }]
    })
}

#[test]
fn envelope_pass_handles_cv_extraction() {
    let resolved = resolve(&cv_extraction_response());
    assert_eq!(resolved.source, TextSource::Envelope);
    assert_eq!(resolved.text, "CV extracted: John Doe, 5 years experience");
}

#[test]
fn heuristic_pass_handles_unenveloped_response() {
    // No outputs envelope, but a prioritized key deeper in the tree.
    let response = json!({
        "session_id": "abc123",
        "result": {
            "answer": "The customer is based in Berlin and orders quarterly."
        }
    });
    let resolved = resolve(&response);
    assert_eq!(resolved.source, TextSource::Heuristic);
    assert_eq!(
        resolved.text,
        "The customer is based in Berlin and orders quarterly."
    );
}

#[test]
fn raw_dump_when_nothing_matches() {
    let response = json!({ "session_id": "abc123", "foo": { "bar": "ok" } });
    let resolved = resolve(&response);
    assert_eq!(resolved.source, TextSource::RawDump);

    // The dump must round-trip to the original value, pretty-printed.
    let parsed: Value = serde_json::from_str(&resolved.text).unwrap();
    assert_eq!(parsed, response);
    assert!(resolved.text.contains('\n'));
}

#[test]
fn passes_are_ordered_envelope_first() {
    // Both the envelope and the heuristic would match; the envelope wins.
    let response = json!({
        "outputs": [{ "outputs": [{ "results": { "text": "envelope text" } }] }],
        "commentary": "a long heuristic-qualifying commentary string"
    });
    let resolved = resolve(&response);
    assert_eq!(resolved.source, TextSource::Envelope);
    assert_eq!(resolved.text, "envelope text");
}

#[test]
fn resolution_is_deterministic() {
    let response = cv_extraction_response();
    let first = resolve(&response).text;
    for _ in 0..10 {
        assert_eq!(resolve(&response).text, first);
    }
}

#[test]
fn custom_policy_flows_through() {
    let policy = ExtractPolicy {
        min_text_len: 1,
        ..ExtractPolicy::default()
    };
    let response = json!({ "foo": { "bar": "ok" } });
    let resolved = resolve_display_text(&response, &policy);
    assert_eq!(resolved.source, TextSource::Heuristic);
    assert_eq!(resolved.text, "ok");
}

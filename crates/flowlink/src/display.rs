//! Display-text resolution for flow responses.
//!
//! Three ordered passes: the exact envelope unwrap, the generic heuristic
//! search, and finally a pretty-printed dump of the whole response. The
//! result is total — there is always something to show the user.

use serde_json::Value;

use crate::envelope::unwrap_envelope;
use crate::extract::{find_text, ExtractPolicy};

/// Which pass produced the display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    /// The known response envelope matched.
    Envelope,
    /// The generic heuristic search found a qualifying string.
    Heuristic,
    /// Nothing matched; the text is the pretty-printed raw response.
    RawDump,
}

/// Text ready for display, tagged with the pass that produced it.
#[derive(Debug, Clone)]
pub struct DisplayText {
    pub text: String,
    pub source: TextSource,
}

/// Resolve the single most relevant human-readable string from a response.
///
/// Never fails: when neither the envelope nor the heuristic finds text, the
/// serialized response itself is the display text.
pub fn resolve_display_text(value: &Value, policy: &ExtractPolicy) -> DisplayText {
    if let Some(text) = unwrap_envelope(value) {
        tracing::debug!("display text resolved from response envelope");
        return DisplayText {
            text: text.to_string(),
            source: TextSource::Envelope,
        };
    }

    if let Some(text) = find_text(value, policy) {
        tracing::debug!("display text resolved by heuristic search");
        return DisplayText {
            text: text.to_string(),
            source: TextSource::Heuristic,
        };
    }

    tracing::debug!("no display text found, falling back to raw dump");
    DisplayText {
        text: serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
        source: TextSource::RawDump,
    }
}

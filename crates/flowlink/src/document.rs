//! Document context: turning a business document into flow input text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bookkeeping fields that never belong in a prompt.
pub const INTERNAL_FIELDS: &[&str] = &[
    "modified_by",
    "owner",
    "idx",
    "docstatus",
    "_user_tags",
    "_comments",
    "_assign",
    "_liked_by",
];

/// A document to analyze: its type, its name, and its field values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentContext {
    pub doctype: String,
    pub name: String,
    pub fields: Map<String, Value>,
}

impl DocumentContext {
    /// Create a context, stripping internal bookkeeping fields up front.
    pub fn new(doctype: impl Into<String>, name: impl Into<String>, mut fields: Map<String, Value>) -> Self {
        fields.retain(|key, _| !INTERNAL_FIELDS.contains(&key.as_str()));
        Self {
            doctype: doctype.into(),
            name: name.into(),
            fields,
        }
    }

    /// Keep only the named fields.
    pub fn retain_fields(&mut self, include: &[String]) {
        self.fields.retain(|key, _| include.iter().any(|k| k == key));
    }

    /// Build the flow input text: the prompt followed by the document
    /// identity and its data as pretty-printed JSON.
    pub fn prompt_text(&self, prompt: &str) -> String {
        let data = serde_json::to_string_pretty(&self.fields)
            .unwrap_or_else(|_| Value::Object(self.fields.clone()).to_string());

        format!(
            "Prompt: {prompt}\n\n\
             Document Type: {doctype}\n\
             Document Name: {name}\n\n\
             Document Data:\n{data}",
            doctype = self.doctype,
            name = self.name,
        )
    }
}

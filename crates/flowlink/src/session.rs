//! Chat sessions: a stable session id plus optional document context.

use serde::{Deserialize, Serialize};

/// What the conversation is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatContext {
    /// A single document.
    Document { doctype: String, name: String },
    /// A list view over a document type.
    List { doctype: String },
    /// Free-form conversation.
    Plain,
}

/// One conversation with a flow. The id is sent with every turn so the
/// server can keep conversational state; the context is prepended to each
/// question as plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub context: ChatContext,
}

impl ChatSession {
    pub fn new(context: ChatContext) -> Self {
        Self {
            id: new_session_id(),
            context,
        }
    }

    /// Start a fresh conversation, keeping the context.
    pub fn reset(&mut self) {
        self.id = new_session_id();
    }

    /// Wrap a user question with the session's context lines.
    pub fn context_message(&self, question: &str) -> String {
        match &self.context {
            ChatContext::Document { doctype, name } => format!(
                "DocType: {doctype}\nDocument Name: {name}\nQuestion: {question}"
            ),
            ChatContext::List { doctype } => {
                format!("DocType: {doctype}\nContext: List View\nQuestion: {question}")
            }
            ChatContext::Plain => question.to_string(),
        }
    }
}

fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

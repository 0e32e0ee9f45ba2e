//! flowlink — core client library for Langflow-style workflow-execution services.

pub mod client;
pub mod config;
pub mod display;
pub mod document;
pub mod envelope;
pub mod extract;
pub mod session;
pub mod types;

pub use client::FlowClient;
pub use config::{resolve_config_path, FlowConfig};
pub use display::{resolve_display_text, DisplayText, TextSource};
pub use document::DocumentContext;
pub use envelope::unwrap_envelope;
pub use extract::{find_text, ExtractPolicy};
pub use session::{ChatContext, ChatSession};
pub use types::*;

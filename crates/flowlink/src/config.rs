//! Configuration loading and resolution.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::extract::ExtractPolicy;
use crate::types::FlowResult;

/// Default workflow server address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:7860";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration, loaded from a JSON file with env overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Base URL of the workflow server.
    pub base_url: String,
    /// API key sent as `x-api-key` when set.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Flow used for chat turns.
    pub chat_flow: Option<String>,
    /// Flow used for document analysis.
    pub document_flow: Option<String>,
    /// Display-text extraction policy.
    pub extract: ExtractPolicy,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            chat_flow: None,
            document_flow: None,
            extract: ExtractPolicy::default(),
        }
    }
}

impl FlowConfig {
    /// Load configuration: the resolved file (if any), then env overrides.
    pub fn load(explicit: Option<&str>) -> FlowResult<Self> {
        let mut config = match resolve_config_path(explicit) {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a JSON config file.
    pub fn from_file(path: &std::path::Path) -> FlowResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Apply `FLOWLINK_*` environment overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("FLOWLINK_URL") {
            self.base_url = url;
        }
        if let Ok(key) = std::env::var("FLOWLINK_API_KEY") {
            self.api_key = Some(key);
        }
        if let Ok(flow) = std::env::var("FLOWLINK_CHAT_FLOW") {
            self.chat_flow = Some(flow);
        }
        if let Ok(flow) = std::env::var("FLOWLINK_DOCUMENT_FLOW") {
            self.document_flow = Some(flow);
        }
    }

    /// A printable summary. The API key itself is never exposed, only
    /// whether one is configured.
    pub fn summary(&self) -> serde_json::Value {
        json!({
            "base_url": self.base_url,
            "api_key_configured": self.api_key.is_some(),
            "timeout_secs": self.timeout_secs,
            "chat_flow": self.chat_flow,
            "document_flow": self.document_flow,
            "extract": self.extract,
        })
    }
}

/// Resolve the config file path.
///
/// Order: explicit path, `FLOWLINK_CONFIG`, `./flowlink.json`,
/// `~/.flowlink/config.json`. Returns `None` when nothing is found, in
/// which case defaults apply.
pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }

    if let Ok(env_path) = std::env::var("FLOWLINK_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    let cwd_config = PathBuf::from("flowlink.json");
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()?;
    let home_config = PathBuf::from(home).join(".flowlink").join("config.json");
    if home_config.exists() {
        Some(home_config)
    } else {
        None
    }
}

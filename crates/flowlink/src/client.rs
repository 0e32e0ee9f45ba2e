//! Async HTTP client for Langflow-style workflow servers.

use std::time::Duration;

use serde_json::Value;

use crate::config::FlowConfig;
use crate::types::{FlowError, FlowResult, RunOutcome};

/// How many characters of the input to log.
const INPUT_PREVIEW_LEN: usize = 200;

/// Timeout for the health probe, independent of the run timeout.
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Client for executing flows over HTTP.
#[derive(Debug, Clone)]
pub struct FlowClient {
    http: reqwest::Client,
    config: FlowConfig,
}

impl FlowClient {
    /// Create a client with the configured request timeout.
    pub fn new(config: FlowConfig) -> FlowResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FlowError::Transport(e.to_string()))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Execute a flow and return its raw JSON response.
    ///
    /// POSTs `{base_url}/api/v1/run/{flow_id}` with a chat-typed payload.
    /// `session_id` carries conversation context across turns; `tweaks`
    /// override flow component parameters server-side.
    pub async fn run_flow(
        &self,
        flow_id: &str,
        input: &str,
        session_id: Option<&str>,
        tweaks: Option<&Value>,
    ) -> FlowResult<RunOutcome> {
        if flow_id.is_empty() {
            return Err(FlowError::InvalidConfig("flow id is required".to_string()));
        }

        let url = self.endpoint(&format!("api/v1/run/{flow_id}"));
        let payload = run_payload(input, session_id, tweaks);

        tracing::info!(flow_id, input_preview = %preview(input), "running flow");

        let mut request = self.http.post(&url).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(flow_id, status = status.as_u16(), "flow run failed");
            return Err(FlowError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json().await.map_err(map_reqwest_error)?;
        let session_id = data
            .get("session_id")
            .and_then(Value::as_str)
            .map(str::to_string);

        tracing::info!(flow_id, "flow run succeeded");
        Ok(RunOutcome { data, session_id })
    }

    /// Probe the server's health endpoint.
    pub async fn health(&self) -> FlowResult<()> {
        let url = self.endpoint("health");
        let response = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(FlowError::Http {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }
}

/// Build the run request body.
pub(crate) fn run_payload(input: &str, session_id: Option<&str>, tweaks: Option<&Value>) -> Value {
    let mut payload = serde_json::json!({
        "input_value": input,
        "output_type": "chat",
        "input_type": "chat",
    });
    if let Some(sid) = session_id {
        payload["session_id"] = sid.into();
    }
    if let Some(tweaks) = tweaks {
        payload["tweaks"] = tweaks.clone();
    }
    payload
}

fn preview(input: &str) -> String {
    input.chars().take(INPUT_PREVIEW_LEN).collect()
}

fn map_reqwest_error(e: reqwest::Error) -> FlowError {
    if e.is_timeout() {
        FlowError::Timeout(e.to_string())
    } else if e.is_connect() {
        FlowError::Connect(e.to_string())
    } else if e.is_decode() {
        FlowError::Body(e.to_string())
    } else {
        FlowError::Transport(e.to_string())
    }
}

//! Drives `AutoguiMcpServer` tool methods against a `MockBackend`

use std::{path::Path, sync::Arc};

use autogui_core::{backend::MockBackend, config::AutomationConfig};
use autogui_mcp_server::mcp::AutoguiMcpServer;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, ErrorData as McpError},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tempfile::TempDir;

/// A server wired to an inspectable mock, saving screenshots to a temp dir
pub struct McpHarness {
    pub server: AutoguiMcpServer,
    pub mock:   Arc<MockBackend>,
    pub dir:    TempDir,
}

impl McpHarness {
    pub fn new() -> Self {
        Self::with_mock(MockBackend::new())
    }

    /// Failsafe on, no pauses
    pub fn with_mock(mock: MockBackend) -> Self {
        Self::with_config(mock, |config| config)
    }

    pub fn with_config(
        mock: MockBackend,
        adjust: impl FnOnce(AutomationConfig) -> AutomationConfig,
    ) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let mock = Arc::new(mock);
        let config = adjust(AutomationConfig::immediate().with_screenshot_dir(dir.path()));
        let server = AutoguiMcpServer::with_mock(mock.clone(), config);
        Self { server, mock, dir }
    }

    pub fn screenshot_dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Parses the envelope and checks it carries exactly one of message/error,
/// consistent with `isError`
pub fn envelope(result: Result<CallToolResult, McpError>) -> Value {
    let result = result.expect("tool errors must be envelopes, not protocol errors");
    assert_eq!(result.content.len(), 1, "envelope is a single content item");
    let text = &result.content[0].as_text().expect("text content").text;
    let value: Value = serde_json::from_str(text).expect("envelope is JSON");

    let has_message = value.get("message").is_some();
    let has_error = value.get("error").is_some();
    assert!(has_message ^ has_error, "exactly one of message/error: {}", value);
    assert_eq!(result.is_error.unwrap_or(false), has_error, "isError matches envelope");
    value
}

/// Envelope of a call expected to succeed
pub fn success(result: Result<CallToolResult, McpError>) -> Value {
    let value = envelope(result);
    assert!(value.get("error").is_none(), "unexpected error: {}", value);
    value
}

/// Error text of a call expected to fail; failures carry nothing else
pub fn failure(result: Result<CallToolResult, McpError>) -> String {
    let value = envelope(result);
    let object = value.as_object().expect("envelope is an object");
    assert_eq!(object.len(), 1, "failure carries only `error`: {}", value);
    object["error"].as_str().expect("error is a string").to_string()
}

/// Tool arguments from JSON, applying the same defaults as the wire
pub fn args<T: DeserializeOwned>(value: Value) -> Parameters<T> {
    Parameters(serde_json::from_value(value).expect("valid tool arguments"))
}

//! Result envelope shared by every tool
//!
//! A tool call yields either success fields plus a human-readable `message`,
//! or a lone `error` string. The envelope is serialized as the single text
//! item of the [`CallToolResult`]; failures also set `isError`.

use autogui_core::error::{AutomationError, AutomationResult};
use rmcp::model::{CallToolResult, Content};
use serde_json::{Map, Value};
use tracing::warn;

/// What a tool body returns before it is wrapped for the wire
pub type ToolResult = AutomationResult<ToolOutcome>;

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// Echoed inputs and results, always including `message`
    Success(Map<String, Value>),
    /// Diagnostic text for the `error` field
    Failure(String),
}

impl ToolOutcome {
    /// Success envelope from the object `fields` plus `message`
    ///
    /// Non-object `fields` contribute nothing. A stray `error` key is dropped
    /// so a success can never carry one.
    pub fn success(message: impl Into<String>, fields: Value) -> Self {
        let mut map = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        map.remove("error");
        map.insert("message".to_string(), Value::String(message.into()));
        ToolOutcome::Success(map)
    }

    pub fn failure(error: &AutomationError) -> Self {
        ToolOutcome::Failure(error.to_string())
    }

    /// Collapses a tool body's result, logging failures with their hint
    pub fn from_result(tool: &str, result: ToolResult) -> Self {
        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    "{} failed ({:?}): {} (hint: {})",
                    tool,
                    e.category(),
                    e,
                    e.remediation_hint()
                );
                ToolOutcome::failure(&e)
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Failure(_))
    }

    /// The JSON object sent to the client
    pub fn to_value(&self) -> Value {
        match self {
            ToolOutcome::Success(map) => Value::Object(map.clone()),
            ToolOutcome::Failure(error) => {
                let mut map = Map::new();
                map.insert("error".to_string(), Value::String(error.clone()));
                Value::Object(map)
            }
        }
    }

    pub fn into_call_result(self) -> CallToolResult {
        let text = self.to_value().to_string();
        if self.is_error() {
            CallToolResult::error(vec![Content::text(text)])
        } else {
            CallToolResult::success(vec![Content::text(text)])
        }
    }
}

//! Conversion of tool outcomes into MCP results.

use rmcp::model::{CallToolResult, Content};
use serde_json::Value;

use super::definition::ToolReply;

/// Success envelope: the message, then the payload as pretty JSON.
///
/// Object payloads are also attached as structured content.
pub fn success_result(reply: ToolReply) -> CallToolResult {
    let ToolReply { message, payload } = reply;

    let mut content = vec![Content::text(message)];
    if !payload.is_null() {
        let pretty =
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        content.push(Content::text(pretty));
    }

    let structured_content = match payload {
        Value::Object(_) => Some(payload),
        _ => None,
    };

    CallToolResult {
        content,
        structured_content,
        is_error: Some(false),
        meta: None,
    }
}

/// Error envelope carrying a single message.
pub fn error_result(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

//! The contract every tool implements.

use std::future::Future;

use rmcp::handler::server::tool::schema_for_type;
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ToolError;
use crate::core::api::WordPressClient;

/// Result of a tool's `execute`.
pub type ToolResult = Result<ToolReply, ToolError>;

/// Successful tool outcome: a one-line message plus the data payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolReply {
    pub message: String,
    pub payload: Value,
}

impl ToolReply {
    pub fn new(message: impl Into<String>, payload: Value) -> Self {
        Self {
            message: message.into(),
            payload,
        }
    }
}

/// A tool exposed to MCP clients.
///
/// Implementors are unit structs. Parameters are a typed struct whose JSON
/// schema is published to clients and whose serde defaults carry the
/// documented default values.
pub trait ToolDefinition: Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Description shown to clients.
    const DESCRIPTION: &'static str;

    /// Prefix of the error envelope, e.g. "Failed to create post".
    const FAILURE: &'static str;

    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    fn execute(
        client: &WordPressClient,
        params: Self::Params,
    ) -> impl Future<Output = ToolResult> + Send;
}

/// MCP metadata for a tool.
pub fn tool_model<T: ToolDefinition>() -> Tool {
    Tool {
        name: T::NAME.into(),
        description: Some(T::DESCRIPTION.into()),
        input_schema: schema_for_type::<T::Params>().into(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

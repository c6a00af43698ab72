//! Tool Registry - central registration and dispatch for all tools.
//!
//! Tools are registered in order from the definition groups. Each entry keeps
//! its MCP metadata, the parameter descriptors derived from its schema and a
//! type-erased handler bound to the shared [`WordPressClient`]. The rmcp
//! router (stdio) and the HTTP transport both dispatch through these handlers.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::definition::{ToolDefinition, tool_model};
use super::definitions;
use super::envelope::{error_result, success_result};
use super::error::ToolError;
use super::params::{self, ParamDescriptor};
use crate::core::api::{PluginStatus, WordPressClient};

/// Future returned by a registered handler.
///
/// `Err` means the call was rejected before the tool ran (bad arguments);
/// failures of the tool itself come back as an error envelope.
pub type ToolFuture = BoxFuture<'static, Result<CallToolResult, ToolError>>;

type Handler = Arc<dyn Fn(JsonObject) -> ToolFuture + Send + Sync>;

/// One registered tool.
#[derive(Clone)]
pub struct RegisteredTool {
    pub tool: Tool,
    pub params: Arc<[ParamDescriptor]>,
    handler: Handler,
}

impl RegisteredTool {
    pub fn name(&self) -> &str {
        &self.tool.name
    }

    pub fn call(&self, arguments: JsonObject) -> ToolFuture {
        (self.handler)(arguments)
    }
}

pub struct ToolRegistry {
    client: Arc<WordPressClient>,
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// An empty registry bound to `client`.
    pub fn new(client: Arc<WordPressClient>) -> Self {
        Self {
            client,
            tools: Vec::new(),
        }
    }

    /// Register every tool group. The BanildTools group is only added when
    /// the plugin probe reported it available.
    pub fn build(client: Arc<WordPressClient>, plugin: &PluginStatus) -> Self {
        let mut registry = Self::new(client);
        definitions::register_core(&mut registry);
        if plugin.available {
            definitions::register_banild(&mut registry);
        }
        debug!(tools = registry.len(), "Tool registry built");
        registry
    }

    /// Add a tool. Registration order is the listing order.
    pub fn register<T: ToolDefinition>(&mut self) -> &mut Self {
        let tool = tool_model::<T>();
        let descriptors: Arc<[ParamDescriptor]> = ParamDescriptor::from_schema(&tool.input_schema).into();
        let client = self.client.clone();
        let checked = descriptors.clone();

        let handler: Handler = Arc::new(move |arguments: JsonObject| {
            let client = client.clone();
            let checked = checked.clone();
            async move { invoke::<T>(&client, &checked, arguments).await }.boxed()
        });

        self.tools.push(RegisteredTool {
            tool,
            params: descriptors,
            handler,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(RegisteredTool::name).collect()
    }

    pub fn entries(&self) -> &[RegisteredTool] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Metadata of every registered tool, in registration order.
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.tool.clone()).collect()
    }

    /// Dispatch a call by name. Used by the HTTP transport.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallToolResult, ToolError> {
        let Some(entry) = self.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => JsonObject::new(),
            other => {
                return Err(ToolError::invalid_arguments(format!(
                    "Tool arguments must be an object, got {other}"
                )));
            }
        };

        entry.call(arguments).await
    }
}

async fn invoke<T: ToolDefinition>(
    client: &WordPressClient,
    descriptors: &[ParamDescriptor],
    arguments: JsonObject,
) -> Result<CallToolResult, ToolError> {
    params::validate(descriptors, &arguments)?;
    let params: T::Params = serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

    debug!(tool = T::NAME, "Tool called");
    Ok(match T::execute(client, params).await {
        Ok(reply) => success_result(reply),
        Err(err) => {
            warn!(tool = T::NAME, error = %err, "Tool call failed");
            error_result(err.envelope_message(T::FAILURE))
        }
    })
}

//! Options and transients.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{flag, pick, post};
use crate::core::api::WordPressClient;
use crate::domains::tools::{ToolDefinition, ToolRegistry, ToolReply, ToolResult};

/// Longest value preview shown in a get message, in characters.
const PREVIEW_LEN: usize = 100;

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<GetOptionTool>()
        .register::<SetOptionTool>()
        .register::<DeleteOptionTool>()
        .register::<GetTransientTool>()
        .register::<SetTransientTool>()
        .register::<DeleteTransientTool>();
}

/// Message for a get: the value as compact JSON, cut to [`PREVIEW_LEN`].
fn describe_value(kind: &str, name: &str, result: &Value) -> String {
    if !flag(result, "exists") {
        return format!("{kind} \"{name}\": (not set)");
    }
    let value = result.get("value").unwrap_or(&Value::Null).to_string();
    let preview: String = value.chars().take(PREVIEW_LEN).collect();
    format!("{kind} \"{name}\": {preview}")
}

fn describe_delete(kind: &str, name: &str, result: &Value) -> String {
    if flag(result, "deleted") {
        format!("{kind} \"{name}\" deleted")
    } else {
        format!("{kind} \"{name}\" was not found")
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct NameParams {
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SetOptionParams {
    pub name: String,

    /// Any JSON value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

pub struct GetOptionTool;

impl ToolDefinition for GetOptionTool {
    const NAME: &'static str = "banildtools_get_option";
    const DESCRIPTION: &'static str = "Get WordPress option value by name.";
    const FAILURE: &'static str = "Failed to get option";
    type Params = NameParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/option/get", &params).await?;
        Ok(ToolReply::new(
            describe_value("Option", &params.name, &result),
            pick(&result, &["name", "value", "exists"]),
        ))
    }
}

pub struct SetOptionTool;

impl ToolDefinition for SetOptionTool {
    const NAME: &'static str = "banildtools_set_option";
    const DESCRIPTION: &'static str = "Set WordPress option value.";
    const FAILURE: &'static str = "Failed to set option";
    type Params = SetOptionParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/option/set", &params).await?;
        let verb = if flag(&result, "updated") { "updated" } else { "set" };
        Ok(ToolReply::new(
            format!("Option \"{}\" {verb}", params.name),
            pick(&result, &["name", "updated"]),
        ))
    }
}

pub struct DeleteOptionTool;

impl ToolDefinition for DeleteOptionTool {
    const NAME: &'static str = "banildtools_delete_option";
    const DESCRIPTION: &'static str = "Delete WordPress option.";
    const FAILURE: &'static str = "Failed to delete option";
    type Params = NameParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/option/delete", &params).await?;
        Ok(ToolReply::new(
            describe_delete("Option", &params.name, &result),
            pick(&result, &["name", "deleted"]),
        ))
    }
}

pub struct GetTransientTool;

impl ToolDefinition for GetTransientTool {
    const NAME: &'static str = "banildtools_get_transient";
    const DESCRIPTION: &'static str = "Get WordPress transient value.";
    const FAILURE: &'static str = "Failed to get transient";
    type Params = NameParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/transient/get", &params).await?;
        Ok(ToolReply::new(
            describe_value("Transient", &params.name, &result),
            pick(&result, &["name", "value", "exists"]),
        ))
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SetTransientParams {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Lifetime in seconds, 0 for no expiry.
    #[serde(default)]
    pub expiration: u64,
}

pub struct SetTransientTool;

impl ToolDefinition for SetTransientTool {
    const NAME: &'static str = "banildtools_set_transient";
    const DESCRIPTION: &'static str = "Set WordPress transient with expiration time in seconds.";
    const FAILURE: &'static str = "Failed to set transient";
    type Params = SetTransientParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/transient/set", &params).await?;
        let mut message = format!("Transient \"{}\" set", params.name);
        if params.expiration > 0 {
            message.push_str(&format!(" (expires in {}s)", params.expiration));
        }
        Ok(ToolReply::new(
            message,
            pick(&result, &["name", "set", "expiration"]),
        ))
    }
}

pub struct DeleteTransientTool;

impl ToolDefinition for DeleteTransientTool {
    const NAME: &'static str = "banildtools_delete_transient";
    const DESCRIPTION: &'static str = "Delete WordPress transient.";
    const FAILURE: &'static str = "Failed to delete transient";
    type Params = NameParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/transient/delete", &params).await?;
        Ok(ToolReply::new(
            describe_delete("Transient", &params.name, &result),
            pick(&result, &["name", "deleted"]),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::test_support::{MockBackend, MockRoute};
    use serde_json::json;
    use tokio_test::assert_ok;

    #[test]
    fn test_describe_value_truncates() {
        let long = "x".repeat(300);
        let message = describe_value("Option", "blob", &json!({"exists": true, "value": long}));
        assert_eq!(message.len(), "Option \"blob\": ".len() + PREVIEW_LEN);

        let missing = describe_value("Option", "blob", &json!({"exists": false}));
        assert_eq!(missing, "Option \"blob\": (not set)");
    }

    #[tokio::test]
    async fn test_get_option_message() {
        let backend = MockBackend::start(vec![
            MockRoute::post("/wp-json/banildtools/v1/option/get")
                .json(json!({"name": "blogname", "value": "Demo", "exists": true})),
        ])
        .await;
        let params = serde_json::from_value(json!({"name": "blogname"})).unwrap();
        let reply = assert_ok!(GetOptionTool::execute(&backend.client(), params).await);
        assert_eq!(reply.message, "Option \"blogname\": \"Demo\"");
        assert_eq!(backend.requests()[0].json(), json!({"name": "blogname"}));
    }

    #[tokio::test]
    async fn test_set_transient_sends_expiration() {
        let backend = MockBackend::start(vec![
            MockRoute::post("/wp-json/banildtools/v1/transient/set")
                .json(json!({"name": "t", "set": true, "expiration": 60})),
        ])
        .await;
        let params =
            serde_json::from_value(json!({"name": "t", "value": [1, 2], "expiration": 60})).unwrap();
        let reply = assert_ok!(SetTransientTool::execute(&backend.client(), params).await);
        assert_eq!(reply.message, "Transient \"t\" set (expires in 60s)");
        assert_eq!(
            backend.requests()[0].json(),
            json!({"name": "t", "value": [1, 2], "expiration": 60})
        );
    }

    #[tokio::test]
    async fn test_delete_option_not_found() {
        let backend = MockBackend::start(vec![
            MockRoute::post("/wp-json/banildtools/v1/option/delete")
                .json(json!({"name": "gone", "deleted": false})),
        ])
        .await;
        let params = serde_json::from_value(json!({"name": "gone"})).unwrap();
        let reply = assert_ok!(DeleteOptionTool::execute(&backend.client(), params).await);
        assert_eq!(reply.message, "Option \"gone\" was not found");
    }
}

//! Generic custom post type tools, addressed by REST base.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::core::api::{Method, WordPressClient};
use crate::domains::tools::definitions::common::{Query, as_list, force_endpoint};
use crate::domains::tools::{ToolDefinition, ToolError, ToolRegistry, ToolReply, ToolResult};

static REST_BASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid REST base pattern"));

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<GetCptTool>()
        .register::<CreateCptTool>()
        .register::<UpdateCptTool>()
        .register::<DeleteCptTool>();
}

/// Reject anything but a bare REST base, so `type` cannot reach other routes.
pub fn check_type(post_type: &str) -> Result<&str, ToolError> {
    if REST_BASE.is_match(post_type) {
        Ok(post_type)
    } else {
        Err(ToolError::invalid_arguments(format!(
            "Invalid post type '{post_type}': use the REST base, e.g. 'products' or 'portfolio'"
        )))
    }
}

/// Query string value of a free-form parameter. Null and empty values are dropped.
fn query_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(query_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetCptParams {
    /// REST base of the post type.
    #[serde(rename = "type")]
    pub post_type: String,

    /// Query parameters passed to the collection endpoint.
    #[serde(default)]
    pub params: Map<String, Value>,
}

pub struct GetCptTool;

impl ToolDefinition for GetCptTool {
    const NAME: &'static str = "wordpress_get_cpt";
    const DESCRIPTION: &'static str = "Get custom post type items";
    const FAILURE: &'static str = "Failed to get custom post type items";
    type Params = GetCptParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let post_type = check_type(&params.post_type)?;
        let endpoint = params
            .params
            .iter()
            .fold(Query::new(), |query, (key, value)| {
                query.push(key.as_str(), query_value(value))
            })
            .endpoint(&format!("/{post_type}"));

        let items = as_list(client.core_get(&endpoint).await?)?;
        Ok(ToolReply::new(
            format!("Retrieved {} from {post_type}", items.len()),
            json!({"count": items.len(), "items": items, "type": post_type}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateCptParams {
    #[serde(rename = "type")]
    pub post_type: String,

    /// Item fields.
    pub data: Map<String, Value>,
}

pub struct CreateCptTool;

impl ToolDefinition for CreateCptTool {
    const NAME: &'static str = "wordpress_create_cpt";
    const DESCRIPTION: &'static str = "Create a custom post type item";
    const FAILURE: &'static str = "Failed to create custom post type item";
    type Params = CreateCptParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let post_type = check_type(&params.post_type)?;
        let body = Value::Object(params.data);
        let item = client
            .core(Method::POST, &format!("/{post_type}"), Some(&body))
            .await?;
        Ok(ToolReply::new(format!("Created {post_type} item"), item))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateCptParams {
    #[serde(rename = "type")]
    pub post_type: String,

    pub id: u64,

    /// Fields to change.
    pub data: Map<String, Value>,
}

pub struct UpdateCptTool;

impl ToolDefinition for UpdateCptTool {
    const NAME: &'static str = "wordpress_update_cpt";
    const DESCRIPTION: &'static str = "Update a custom post type item";
    const FAILURE: &'static str = "Failed to update custom post type item";
    type Params = UpdateCptParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let post_type = check_type(&params.post_type)?;
        let body = Value::Object(params.data);
        let endpoint = format!("/{post_type}/{}", params.id);
        let item = client.core(Method::PUT, &endpoint, Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Updated {post_type} {}", params.id),
            item,
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteCptParams {
    #[serde(rename = "type")]
    pub post_type: String,

    pub id: u64,

    #[serde(default)]
    pub force: bool,
}

pub struct DeleteCptTool;

impl ToolDefinition for DeleteCptTool {
    const NAME: &'static str = "wordpress_delete_cpt";
    const DESCRIPTION: &'static str = "Delete a custom post type item";
    const FAILURE: &'static str = "Failed to delete custom post type item";
    type Params = DeleteCptParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let post_type = check_type(&params.post_type)?;
        let endpoint = force_endpoint(&format!("/{post_type}/{}", params.id), params.force);
        client.core(Method::DELETE, &endpoint, None).await?;
        Ok(ToolReply::new(
            format!("Deleted {post_type} {}", params.id),
            json!({"type": post_type, "id": params.id, "deleted": true}),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::test_support::{MockBackend, MockRoute};
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_check_type() {
        assert!(check_type("portfolio").is_ok());
        assert!(check_type("wp_block").is_ok());
        assert!(check_type("my-type").is_ok());
        assert!(check_type("").is_err());
        assert!(check_type("posts/1").is_err());
        assert!(check_type("../users").is_err());
        assert!(check_type("posts?force=true").is_err());
    }

    #[tokio::test]
    async fn test_get_cpt_forwards_params() {
        let backend = MockBackend::start(vec![
            MockRoute::get("/wp-json/wp/v2/portfolio").json(json!([{"id": 1}, {"id": 2}])),
        ])
        .await;

        let params = serde_json::from_value(json!({
            "type": "portfolio",
            "params": {"per_page": 5, "search": "logo", "skip": null}
        }))
        .unwrap();
        let reply = assert_ok!(GetCptTool::execute(&backend.client(), params).await);
        assert_eq!(reply.message, "Retrieved 2 from portfolio");
        assert_eq!(reply.payload["type"], "portfolio");
        assert_eq!(
            backend.requests()[0].query.as_deref(),
            Some("per_page=5&search=logo")
        );
    }

    #[tokio::test]
    async fn test_invalid_type_never_reaches_backend() {
        let backend = MockBackend::start(vec![]).await;
        let params = serde_json::from_value(json!({"type": "users/1", "id": 1})).unwrap();
        let err = assert_err!(DeleteCptTool::execute(&backend.client(), params).await);
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(backend.requests().is_empty());
    }
}

//! Page tools, including pages that mount an external React component.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::posts::{default_page, default_per_page, default_publish};
use crate::core::api::{Method, WordPressClient};
use crate::domains::tools::definitions::common::{Query, force_endpoint, format_list, format_page};
use crate::domains::tools::{ToolDefinition, ToolRegistry, ToolReply, ToolResult};

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<CreatePageTool>()
        .register::<UpdatePageTool>()
        .register::<GetPagesTool>()
        .register::<DeletePageTool>()
        .register::<CreateReactPageTool>();
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageParams {
    pub title: String,

    /// Page content (HTML).
    pub content: String,

    #[serde(default = "default_draft")]
    pub status: String,

    /// Parent page ID, 0 for a top-level page.
    #[serde(default)]
    pub parent: u64,
}

fn default_draft() -> String {
    "draft".to_string()
}

pub struct CreatePageTool;

impl ToolDefinition for CreatePageTool {
    const NAME: &'static str = "wordpress_create_page";
    const DESCRIPTION: &'static str = "Create a new WordPress page with hierarchy support";
    const FAILURE: &'static str = "Failed to create page";
    type Params = CreatePageParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let body = json!({
            "title": params.title,
            "content": params.content,
            "status": params.status,
            "parent": params.parent,
        });
        let page = client.core(Method::POST, "/pages", Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Created page: \"{}\"", params.title),
            format_page(&page),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageParams {
    pub page_id: u64,
    pub updates: Map<String, Value>,
}

pub struct UpdatePageTool;

impl ToolDefinition for UpdatePageTool {
    const NAME: &'static str = "wordpress_update_page";
    const DESCRIPTION: &'static str = "Update an existing page";
    const FAILURE: &'static str = "Failed to update page";
    type Params = UpdatePageParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let body = Value::Object(params.updates);
        let endpoint = format!("/pages/{}", params.page_id);
        let page = client.core(Method::PUT, &endpoint, Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Updated page ID {}", params.page_id),
            format_page(&page),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPagesParams {
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_page")]
    pub page: u32,

    /// Only children of this page.
    pub parent: Option<u64>,

    #[serde(default = "default_publish")]
    pub status: String,
}

pub struct GetPagesTool;

impl ToolDefinition for GetPagesTool {
    const NAME: &'static str = "wordpress_get_pages";
    const DESCRIPTION: &'static str = "List pages, optionally filtered by parent page and status";
    const FAILURE: &'static str = "Failed to get pages";
    type Params = GetPagesParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = Query::new()
            .push("per_page", params.per_page)
            .push("page", params.page)
            .push("status", &params.status)
            .push_opt("parent", params.parent)
            .endpoint("/pages");

        let pages = format_list(client.core_get(&endpoint).await?, format_page)?;
        Ok(ToolReply::new(
            format!("Retrieved {} pages", pages.len()),
            json!({"count": pages.len(), "pages": pages}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletePageParams {
    pub page_id: u64,

    #[serde(default)]
    pub force: bool,
}

pub struct DeletePageTool;

impl ToolDefinition for DeletePageTool {
    const NAME: &'static str = "wordpress_delete_page";
    const DESCRIPTION: &'static str =
        "Delete a page. Set force=true to permanently delete, otherwise moves to trash";
    const FAILURE: &'static str = "Failed to delete page";
    type Params = DeletePageParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = force_endpoint(&format!("/pages/{}", params.page_id), params.force);
        client.core(Method::DELETE, &endpoint, None).await?;
        Ok(ToolReply::new(
            format!("Deleted page ID {}", params.page_id),
            json!({"id": params.page_id, "deleted": true}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReactPageParams {
    pub title: String,

    /// URL of the component bundle.
    pub component_url: String,

    /// Name under which the bundle exports the component on `window`.
    pub component_name: String,

    /// Props passed to the component.
    #[serde(default)]
    pub props: Map<String, Value>,

    #[serde(default = "default_publish")]
    pub status: String,
}

/// Page markup that loads React 18 from unpkg and renders the component.
pub fn react_page_content(component_url: &str, component_name: &str, props: &Value) -> String {
    format!(
        r#"
<div id="react-root"></div>
<script crossorigin src="https://unpkg.com/react@18/umd/react.production.min.js"></script>
<script crossorigin src="https://unpkg.com/react-dom@18/umd/react-dom.production.min.js"></script>
<script src="{component_url}"></script>
<script>
  const root = ReactDOM.createRoot(document.getElementById('react-root'));
  root.render(React.createElement(window['{component_name}'], {props}));
</script>
"#
    )
}

pub struct CreateReactPageTool;

impl ToolDefinition for CreateReactPageTool {
    const NAME: &'static str = "wordpress_create_react_page";
    const DESCRIPTION: &'static str =
        "Create a WordPress page that mounts an external React component";
    const FAILURE: &'static str = "Failed to create React page";
    type Params = CreateReactPageParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let props = Value::Object(params.props);
        let content = react_page_content(&params.component_url, &params.component_name, &props);
        let body = json!({
            "title": params.title,
            "content": content,
            "status": params.status,
        });

        let page = client.core(Method::POST, "/pages", Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Created React page: {}", params.title),
            page,
        ))
    }
}

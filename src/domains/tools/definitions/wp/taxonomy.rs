//! Category and tag tools.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::core::api::{Method, WordPressClient};
use crate::domains::tools::definitions::common::{Query, force_endpoint, format_list};
use crate::domains::tools::{ToolDefinition, ToolRegistry, ToolReply, ToolResult};

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<CreateCategoryTool>()
        .register::<GetCategoriesTool>()
        .register::<UpdateCategoryTool>()
        .register::<DeleteCategoryTool>()
        .register::<CreateTagTool>()
        .register::<GetTagsTool>();
}

fn default_term_page_size() -> u32 {
    100
}

fn format_category(category: &Value) -> Value {
    json!({
        "id": category.get("id"),
        "name": category.get("name"),
        "slug": category.get("slug"),
        "count": category.get("count"),
        "parent": category.get("parent"),
    })
}

fn format_tag(tag: &Value) -> Value {
    json!({
        "id": tag.get("id"),
        "name": tag.get("name"),
        "slug": tag.get("slug"),
        "count": tag.get("count"),
    })
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateCategoryParams {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Parent category ID, 0 for none.
    #[serde(default)]
    pub parent: u64,

    pub slug: Option<String>,
}

pub struct CreateCategoryTool;

impl ToolDefinition for CreateCategoryTool {
    const NAME: &'static str = "wordpress_create_category";
    const DESCRIPTION: &'static str = "Create a new category with hierarchical support";
    const FAILURE: &'static str = "Failed to create category";
    type Params = CreateCategoryParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let mut body = json!({
            "name": params.name,
            "description": params.description,
            "parent": params.parent,
        });
        if let Some(slug) = params.slug.filter(|s| !s.is_empty()) {
            body["slug"] = Value::String(slug);
        }

        let category = client.core(Method::POST, "/categories", Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Created category: \"{}\"", params.name),
            json!({
                "id": category.get("id"),
                "name": category.get("name"),
                "slug": category.get("slug"),
                "parent": category.get("parent"),
            }),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetCategoriesParams {
    #[serde(default = "default_term_page_size")]
    pub per_page: u32,

    /// Only children of this category.
    pub parent: Option<u64>,

    #[serde(default)]
    pub hide_empty: bool,
}

pub struct GetCategoriesTool;

impl ToolDefinition for GetCategoriesTool {
    const NAME: &'static str = "wordpress_get_categories";
    const DESCRIPTION: &'static str = "Get all categories with hierarchy";
    const FAILURE: &'static str = "Failed to get categories";
    type Params = GetCategoriesParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = Query::new()
            .push("per_page", params.per_page)
            .push("hide_empty", params.hide_empty)
            .push_opt("parent", params.parent)
            .endpoint("/categories");

        let categories = format_list(client.core_get(&endpoint).await?, format_category)?;
        Ok(ToolReply::new(
            format!("Retrieved {} categories", categories.len()),
            json!({"categories": categories, "total": categories.len()}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryParams {
    pub category_id: u64,

    /// Fields to change (name, description, parent, slug).
    pub updates: Map<String, Value>,
}

pub struct UpdateCategoryTool;

impl ToolDefinition for UpdateCategoryTool {
    const NAME: &'static str = "wordpress_update_category";
    const DESCRIPTION: &'static str = "Update category name, description, or parent";
    const FAILURE: &'static str = "Failed to update category";
    type Params = UpdateCategoryParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = format!("/categories/{}", params.category_id);
        let body = Value::Object(params.updates);
        let category = client.core(Method::PUT, &endpoint, Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Updated category ID {}", params.category_id),
            json!({"id": category.get("id"), "name": category.get("name")}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCategoryParams {
    pub category_id: u64,

    #[serde(default)]
    pub force: bool,
}

pub struct DeleteCategoryTool;

impl ToolDefinition for DeleteCategoryTool {
    const NAME: &'static str = "wordpress_delete_category";
    const DESCRIPTION: &'static str = "Delete a category";
    const FAILURE: &'static str = "Failed to delete category";
    type Params = DeleteCategoryParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint =
            force_endpoint(&format!("/categories/{}", params.category_id), params.force);
        client.core(Method::DELETE, &endpoint, None).await?;
        Ok(ToolReply::new(
            format!("Deleted category ID {}", params.category_id),
            json!({"id": params.category_id, "deleted": true}),
        ))
    }
}

// ============================================================================
// Tags
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateTagParams {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub slug: Option<String>,
}

pub struct CreateTagTool;

impl ToolDefinition for CreateTagTool {
    const NAME: &'static str = "wordpress_create_tag";
    const DESCRIPTION: &'static str = "Create a new tag";
    const FAILURE: &'static str = "Failed to create tag";
    type Params = CreateTagParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let mut body = json!({"name": params.name, "description": params.description});
        if let Some(slug) = params.slug.filter(|s| !s.is_empty()) {
            body["slug"] = Value::String(slug);
        }

        let tag = client.core(Method::POST, "/tags", Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Created tag: \"{}\"", params.name),
            json!({"id": tag.get("id"), "name": tag.get("name"), "slug": tag.get("slug")}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTagsParams {
    #[serde(default = "default_term_page_size")]
    pub per_page: u32,

    #[serde(default)]
    pub hide_empty: bool,
}

pub struct GetTagsTool;

impl ToolDefinition for GetTagsTool {
    const NAME: &'static str = "wordpress_get_tags";
    const DESCRIPTION: &'static str = "Get all tags";
    const FAILURE: &'static str = "Failed to get tags";
    type Params = GetTagsParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = Query::new()
            .push("per_page", params.per_page)
            .push("hide_empty", params.hide_empty)
            .endpoint("/tags");

        let tags = format_list(client.core_get(&endpoint).await?, format_tag)?;
        Ok(ToolReply::new(
            format!("Retrieved {} tags", tags.len()),
            json!({"tags": tags, "total": tags.len()}),
        ))
    }
}

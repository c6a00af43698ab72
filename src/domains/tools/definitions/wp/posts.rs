//! Post tools: CRUD, listing, scheduling, duplication and bulk operations.

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::core::api::{Method, WordPressClient};
use crate::domains::tools::definitions::common::{
    Query, force_endpoint, format_list, format_post, rendered, run_sequential,
};
use crate::domains::tools::{ToolDefinition, ToolError, ToolRegistry, ToolReply, ToolResult};

/// Accepted format of `wordpress_schedule_post`'s `datetime`.
pub const SCHEDULE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<CreatePostTool>()
        .register::<UpdatePostTool>()
        .register::<DeletePostTool>()
        .register::<GetPostsTool>()
        .register::<GetPostTool>()
        .register::<SearchPostsTool>()
        .register::<SchedulePostTool>()
        .register::<PublishPostTool>()
        .register::<DuplicatePostTool>()
        .register::<GetPostRevisionsTool>()
        .register::<BulkCreatePostsTool>()
        .register::<BulkUpdatePostsTool>()
        .register::<BulkDeletePostsTool>();
}

fn post_endpoint(post_id: u64) -> String {
    format!("/posts/{post_id}")
}

fn delete_endpoint(post_id: u64, force: bool) -> String {
    force_endpoint(&post_endpoint(post_id), force)
}

fn default_draft() -> String {
    "draft".to_string()
}

pub(crate) fn default_publish() -> String {
    "publish".to_string()
}

pub(crate) fn default_per_page() -> u32 {
    10
}

pub(crate) fn default_page() -> u32 {
    1
}

// ============================================================================
// Create / update / delete
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostParams {
    /// Post title.
    pub title: String,

    /// Post content (HTML).
    #[serde(default)]
    pub content: String,

    /// 'draft', 'publish', 'pending' or 'private'.
    #[serde(default = "default_draft")]
    pub status: String,

    /// Category IDs.
    pub categories: Option<Vec<u64>>,

    /// Tag IDs.
    pub tags: Option<Vec<u64>>,
}

pub struct CreatePostTool;

impl ToolDefinition for CreatePostTool {
    const NAME: &'static str = "wordpress_create_post";
    const DESCRIPTION: &'static str =
        "Create a new WordPress post with full control over all post properties";
    const FAILURE: &'static str = "Failed to create post";
    type Params = CreatePostParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let mut body = json!({
            "title": params.title,
            "content": params.content,
            "status": params.status,
        });
        if let Some(categories) = params.categories {
            body["categories"] = json!(categories);
        }
        if let Some(tags) = params.tags {
            body["tags"] = json!(tags);
        }

        let post = client.core(Method::POST, "/posts", Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Created post: \"{}\"", params.title),
            format_post(&post),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostParams {
    pub post_id: u64,

    /// Properties to change (title, content, status, ...).
    pub updates: Map<String, Value>,
}

pub struct UpdatePostTool;

impl ToolDefinition for UpdatePostTool {
    const NAME: &'static str = "wordpress_update_post";
    const DESCRIPTION: &'static str = "Update an existing post - can modify any post property";
    const FAILURE: &'static str = "Failed to update post";
    type Params = UpdatePostParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let body = Value::Object(params.updates);
        let post = client
            .core(Method::PUT, &post_endpoint(params.post_id), Some(&body))
            .await?;
        Ok(ToolReply::new(
            format!("Updated post ID {}", params.post_id),
            format_post(&post),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletePostParams {
    pub post_id: u64,

    /// Permanently delete instead of moving to trash.
    #[serde(default)]
    pub force: bool,
}

pub struct DeletePostTool;

impl ToolDefinition for DeletePostTool {
    const NAME: &'static str = "wordpress_delete_post";
    const DESCRIPTION: &'static str =
        "Delete a post. Set force=true to permanently delete, otherwise moves to trash";
    const FAILURE: &'static str = "Failed to delete post";
    type Params = DeletePostParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        client
            .core(
                Method::DELETE,
                &delete_endpoint(params.post_id, params.force),
                None,
            )
            .await?;
        Ok(ToolReply::new(
            format!("Deleted post ID {}", params.post_id),
            json!({"id": params.post_id, "deleted": true}),
        ))
    }
}

// ============================================================================
// Reading
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPostsParams {
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_page")]
    pub page: u32,

    /// 'publish', 'draft' or 'pending'.
    #[serde(default = "default_publish")]
    pub status: String,

    /// 'date', 'title' or 'modified'.
    #[serde(default = "default_orderby")]
    pub orderby: String,

    /// 'desc' or 'asc', case-insensitive.
    #[serde(default = "default_order")]
    pub order: String,
}

fn default_orderby() -> String {
    "date".to_string()
}

fn default_order() -> String {
    "desc".to_string()
}

pub struct GetPostsTool;

impl ToolDefinition for GetPostsTool {
    const NAME: &'static str = "wordpress_get_posts";
    const DESCRIPTION: &'static str =
        "Get posts with filtering by status and ordering, paginated";
    const FAILURE: &'static str = "Failed to get posts";
    type Params = GetPostsParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = Query::new()
            .push("per_page", params.per_page)
            .push("page", params.page)
            .push("status", &params.status)
            .push("orderby", &params.orderby)
            .push("order", params.order.to_lowercase())
            .endpoint("/posts");

        let posts = format_list(client.core_get(&endpoint).await?, format_post)?;
        Ok(ToolReply::new(
            format!("Retrieved {} posts", posts.len()),
            json!({"count": posts.len(), "posts": posts}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostIdParams {
    pub post_id: u64,
}

pub struct GetPostTool;

impl ToolDefinition for GetPostTool {
    const NAME: &'static str = "wordpress_get_post";
    const DESCRIPTION: &'static str = "Get detailed information about a specific post by ID";
    const FAILURE: &'static str = "Failed to get post";
    type Params = PostIdParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let post = client.core_get(&post_endpoint(params.post_id)).await?;

        let mut payload = format_post(&post);
        payload["content"] = json!(rendered(&post, "content"));
        payload["excerpt"] = json!(rendered(&post, "excerpt"));

        Ok(ToolReply::new(
            format!("Retrieved post: \"{}\"", rendered(&post, "title")),
            payload,
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchPostsParams {
    /// Keyword matched against title, content and excerpt.
    pub query: String,

    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

pub struct SearchPostsTool;

impl ToolDefinition for SearchPostsTool {
    const NAME: &'static str = "wordpress_search_posts";
    const DESCRIPTION: &'static str =
        "Search posts by keyword - searches title, content, and excerpt";
    const FAILURE: &'static str = "Failed to search posts";
    type Params = SearchPostsParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = Query::new()
            .push("search", &params.query)
            .push("per_page", params.per_page)
            .endpoint("/posts");

        let posts = format_list(client.core_get(&endpoint).await?, format_post)?;
        Ok(ToolReply::new(
            format!("Found {} posts for \"{}\"", posts.len(), params.query),
            json!({"count": posts.len(), "posts": posts, "query": params.query}),
        ))
    }
}

// ============================================================================
// Status changes
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePostParams {
    pub post_id: u64,

    /// Publication time, format YYYY-MM-DDTHH:MM:SS (site timezone).
    pub datetime: String,
}

pub struct SchedulePostTool;

impl ToolDefinition for SchedulePostTool {
    const NAME: &'static str = "wordpress_schedule_post";
    const DESCRIPTION: &'static str =
        "Schedule a post for future publication. Date format: YYYY-MM-DDTHH:MM:SS";
    const FAILURE: &'static str = "Failed to schedule post";
    type Params = SchedulePostParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        NaiveDateTime::parse_from_str(&params.datetime, SCHEDULE_FORMAT).map_err(|_| {
            ToolError::invalid_arguments(format!(
                "Invalid datetime '{}': expected YYYY-MM-DDTHH:MM:SS",
                params.datetime
            ))
        })?;

        let body = json!({"status": "future", "date": params.datetime});
        let post = client
            .core(Method::PUT, &post_endpoint(params.post_id), Some(&body))
            .await?;
        Ok(ToolReply::new(
            format!("Scheduled post {} for {}", params.post_id, params.datetime),
            format_post(&post),
        ))
    }
}

pub struct PublishPostTool;

impl ToolDefinition for PublishPostTool {
    const NAME: &'static str = "wordpress_publish_post";
    const DESCRIPTION: &'static str = "Publish a draft or pending post immediately";
    const FAILURE: &'static str = "Failed to publish post";
    type Params = PostIdParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let body = json!({"status": "publish"});
        let post = client
            .core(Method::PUT, &post_endpoint(params.post_id), Some(&body))
            .await?;
        Ok(ToolReply::new(
            format!("Published post {}", params.post_id),
            format_post(&post),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatePostParams {
    pub post_id: u64,

    /// Title of the copy. Defaults to "<original title> (Copy)".
    pub new_title: Option<String>,
}

pub struct DuplicatePostTool;

impl ToolDefinition for DuplicatePostTool {
    const NAME: &'static str = "wordpress_duplicate_post";
    const DESCRIPTION: &'static str = "Duplicate an existing post with optional new title";
    const FAILURE: &'static str = "Failed to duplicate post";
    type Params = DuplicatePostParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let original = client.core_get(&post_endpoint(params.post_id)).await?;

        let title = params
            .new_title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("{} (Copy)", rendered(&original, "title")));
        let body = json!({
            "title": title,
            "content": rendered(&original, "content"),
            "status": "draft",
            "categories": original.get("categories").cloned().unwrap_or(Value::Null),
            "tags": original.get("tags").cloned().unwrap_or(Value::Null),
        });

        let duplicate = client.core(Method::POST, "/posts", Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Duplicated post as \"{}\"", rendered(&duplicate, "title")),
            format_post(&duplicate),
        ))
    }
}

pub struct GetPostRevisionsTool;

impl ToolDefinition for GetPostRevisionsTool {
    const NAME: &'static str = "wordpress_get_post_revisions";
    const DESCRIPTION: &'static str = "Get all revisions/edit history for a post";
    const FAILURE: &'static str = "Failed to get revisions";
    type Params = PostIdParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = format!("/posts/{}/revisions", params.post_id);
        let revisions = format_list(client.core_get(&endpoint).await?, |r| {
            json!({
                "id": r.get("id"),
                "author": r.get("author"),
                "date": r.get("date"),
                "modified": r.get("modified"),
            })
        })?;

        Ok(ToolReply::new(
            format!(
                "Found {} revisions for post {}",
                revisions.len(),
                params.post_id
            ),
            json!({"count": revisions.len(), "revisions": revisions}),
        ))
    }
}

// ============================================================================
// Bulk operations (sequential, abort on first failure)
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BulkCreatePostsParams {
    /// Post objects, each sent as is to the create endpoint.
    pub posts: Vec<Map<String, Value>>,
}

pub struct BulkCreatePostsTool;

impl ToolDefinition for BulkCreatePostsTool {
    const NAME: &'static str = "wordpress_bulk_create_posts";
    const DESCRIPTION: &'static str =
        "Create multiple posts in one operation, one after another; stops at the first failure";
    const FAILURE: &'static str = "Failed to bulk create posts";
    type Params = BulkCreatePostsParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let posts = run_sequential(params.posts, |post| async move {
            let body = Value::Object(post);
            let created = client.core(Method::POST, "/posts", Some(&body)).await?;
            Ok::<_, ToolError>(format_post(&created))
        })
        .await?;

        Ok(ToolReply::new(
            format!("Created {} posts", posts.len()),
            json!({"count": posts.len(), "posts": posts}),
        ))
    }
}

/// One entry of a bulk update: the post ID plus the fields to change.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkPostUpdate {
    pub post_id: u64,

    #[serde(flatten)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BulkUpdatePostsParams {
    pub updates: Vec<BulkPostUpdate>,
}

pub struct BulkUpdatePostsTool;

impl ToolDefinition for BulkUpdatePostsTool {
    const NAME: &'static str = "wordpress_bulk_update_posts";
    const DESCRIPTION: &'static str =
        "Update multiple posts in one operation, one after another; stops at the first failure";
    const FAILURE: &'static str = "Failed to bulk update posts";
    type Params = BulkUpdatePostsParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let posts = run_sequential(params.updates, |update| async move {
            let body = Value::Object(update.data);
            let post = client
                .core(Method::PUT, &post_endpoint(update.post_id), Some(&body))
                .await?;
            Ok::<_, ToolError>(format_post(&post))
        })
        .await?;

        Ok(ToolReply::new(
            format!("Updated {} posts", posts.len()),
            json!({"count": posts.len(), "posts": posts}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeletePostsParams {
    pub post_ids: Vec<u64>,

    #[serde(default)]
    pub force: bool,
}

pub struct BulkDeletePostsTool;

impl ToolDefinition for BulkDeletePostsTool {
    const NAME: &'static str = "wordpress_bulk_delete_posts";
    const DESCRIPTION: &'static str =
        "Delete multiple posts in one operation, one after another; stops at the first failure";
    const FAILURE: &'static str = "Failed to bulk delete posts";
    type Params = BulkDeletePostsParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let force = params.force;
        let deleted = run_sequential(params.post_ids, |post_id| async move {
            client
                .core(Method::DELETE, &delete_endpoint(post_id, force), None)
                .await?;
            Ok::<_, ToolError>(json!({"id": post_id, "deleted": true}))
        })
        .await?;

        Ok(ToolReply::new(
            format!("Deleted {} posts", deleted.len()),
            json!({"count": deleted.len(), "deleted": deleted}),
        ))
    }
}

//! Comment moderation tools.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::posts::default_per_page;
use crate::core::api::{Method, WordPressClient};
use crate::domains::tools::definitions::common::{
    Query, force_endpoint, format_comment, format_list,
};
use crate::domains::tools::{ToolDefinition, ToolRegistry, ToolReply, ToolResult};

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<CreateCommentTool>()
        .register::<GetCommentsTool>()
        .register::<UpdateCommentTool>()
        .register::<DeleteCommentTool>();
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentParams {
    pub post_id: u64,
    pub content: String,

    /// Author display name.
    pub author: Option<String>,

    pub author_email: Option<String>,
}

pub struct CreateCommentTool;

impl ToolDefinition for CreateCommentTool {
    const NAME: &'static str = "wordpress_create_comment";
    const DESCRIPTION: &'static str = "Create a comment on a post";
    const FAILURE: &'static str = "Failed to create comment";
    type Params = CreateCommentParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let mut body = json!({"post": params.post_id, "content": params.content});
        if let Some(author) = params.author.filter(|a| !a.is_empty()) {
            body["author_name"] = Value::String(author);
        }
        if let Some(email) = params.author_email.filter(|e| !e.is_empty()) {
            body["author_email"] = Value::String(email);
        }

        let comment = client.core(Method::POST, "/comments", Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Created comment on post {}", params.post_id),
            format_comment(&comment),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetCommentsParams {
    /// Only comments on this post.
    pub post_id: Option<u64>,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// 'approve', 'hold' or 'spam'.
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "approve".to_string()
}

pub struct GetCommentsTool;

impl ToolDefinition for GetCommentsTool {
    const NAME: &'static str = "wordpress_get_comments";
    const DESCRIPTION: &'static str = "Get comments with filtering by post and status";
    const FAILURE: &'static str = "Failed to get comments";
    type Params = GetCommentsParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = Query::new()
            .push("per_page", params.per_page)
            .push("status", &params.status)
            .push_opt("post", params.post_id)
            .endpoint("/comments");

        let comments = format_list(client.core_get(&endpoint).await?, format_comment)?;
        Ok(ToolReply::new(
            format!("Retrieved {} comments", comments.len()),
            json!({"comments": comments, "count": comments.len()}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentParams {
    pub comment_id: u64,

    /// 'approve', 'hold', 'spam' or 'trash'.
    pub status: Option<String>,

    pub content: Option<String>,
}

pub struct UpdateCommentTool;

impl ToolDefinition for UpdateCommentTool {
    const NAME: &'static str = "wordpress_update_comment";
    const DESCRIPTION: &'static str = "Update comment (approve, spam, trash, edit content)";
    const FAILURE: &'static str = "Failed to update comment";
    type Params = UpdateCommentParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let mut updates = Map::new();
        if let Some(status) = params.status.filter(|s| !s.is_empty()) {
            updates.insert("status".to_string(), Value::String(status));
        }
        if let Some(content) = params.content.filter(|c| !c.is_empty()) {
            updates.insert("content".to_string(), Value::String(content));
        }

        let endpoint = format!("/comments/{}", params.comment_id);
        let comment = client
            .core(Method::PUT, &endpoint, Some(&Value::Object(updates)))
            .await?;
        Ok(ToolReply::new(
            format!("Updated comment ID {}", params.comment_id),
            format_comment(&comment),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentParams {
    pub comment_id: u64,

    #[serde(default)]
    pub force: bool,
}

pub struct DeleteCommentTool;

impl ToolDefinition for DeleteCommentTool {
    const NAME: &'static str = "wordpress_delete_comment";
    const DESCRIPTION: &'static str = "Delete a comment";
    const FAILURE: &'static str = "Failed to delete comment";
    type Params = DeleteCommentParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = force_endpoint(&format!("/comments/{}", params.comment_id), params.force);
        client.core(Method::DELETE, &endpoint, None).await?;
        Ok(ToolReply::new(
            format!("Deleted comment ID {}", params.comment_id),
            json!({"id": params.comment_id, "deleted": true}),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::test_support::{MockBackend, MockRoute};
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_create_comment_maps_author_fields() {
        let backend = MockBackend::start(vec![
            MockRoute::post("/wp-json/wp/v2/comments").json(json!({
                "id": 70, "post": 7, "author_name": "Ann",
                "content": {"rendered": "<p>Great post</p>"}, "status": "hold"
            })),
        ])
        .await;

        let params = serde_json::from_value(json!({
            "postId": 7, "content": "Great post", "author": "Ann", "authorEmail": "ann@example.com"
        }))
        .unwrap();
        let reply = assert_ok!(CreateCommentTool::execute(&backend.client(), params).await);
        assert_eq!(reply.payload["content"], "Great post");
        assert_eq!(
            backend.requests()[0].json(),
            json!({"post": 7, "content": "Great post", "author_name": "Ann", "author_email": "ann@example.com"})
        );
    }

    #[tokio::test]
    async fn test_get_comments_default_status() {
        let backend = MockBackend::start(vec![
            MockRoute::get("/wp-json/wp/v2/comments").json(json!([])),
        ])
        .await;
        let params = serde_json::from_value(json!({"postId": 7})).unwrap();
        assert_ok!(GetCommentsTool::execute(&backend.client(), params).await);
        assert_eq!(
            backend.requests()[0].query.as_deref(),
            Some("per_page=10&status=approve&post=7")
        );
    }
}

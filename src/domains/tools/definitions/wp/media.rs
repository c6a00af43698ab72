//! Media library tools.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::posts::{default_page, default_per_page};
use crate::core::api::{Method, WordPressClient};
use crate::domains::tools::definitions::common::{Query, format_list, format_media};
use crate::domains::tools::{ToolDefinition, ToolError, ToolRegistry, ToolReply, ToolResult};

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<UploadMediaTool>()
        .register::<GetMediaTool>()
        .register::<UpdateMediaTool>()
        .register::<DeleteMediaTool>()
        .register::<SetFeaturedImageTool>();
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadMediaParams {
    /// File content, base64 encoded. A `data:` URL prefix is accepted.
    pub file_base64: Option<String>,

    /// Name given to the uploaded file. Required with `fileBase64`.
    pub filename: Option<String>,

    /// Remote file to fetch and upload. Takes precedence over `fileBase64`.
    pub file_url: Option<String>,
}

/// Decode a base64 payload, ignoring a leading `data:<type>;base64,` prefix.
pub fn decode_base64_file(encoded: &str) -> Result<Vec<u8>, ToolError> {
    let data = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };
    STANDARD
        .decode(data.trim())
        .map_err(|e| ToolError::invalid_arguments(format!("fileBase64 is not valid base64: {e}")))
}

pub struct UploadMediaTool;

impl ToolDefinition for UploadMediaTool {
    const NAME: &'static str = "wordpress_upload_media";
    const DESCRIPTION: &'static str = "Upload image or file to WordPress media library (provide base64 encoded file or URL)";
    const FAILURE: &'static str = "Failed to upload media";
    type Params = UploadMediaParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let filename = params.filename.filter(|f| !f.is_empty());
        let file_url = params.file_url.filter(|u| !u.is_empty());
        let file_base64 = params.file_base64.filter(|b| !b.is_empty());

        let media = match (file_url, file_base64, filename) {
            (Some(url), _, filename) => {
                debug!(%url, "Uploading media from URL");
                client.upload_media_from_url(&url, filename.as_deref()).await?
            }
            (None, Some(encoded), Some(filename)) => {
                let data = decode_base64_file(&encoded)?;
                client.upload_media(&data, &filename).await?
            }
            _ => {
                return Err(ToolError::invalid_arguments(
                    "Provide either fileUrl or fileBase64 with filename",
                ));
            }
        };

        let source_url = media
            .get("source_url")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Ok(ToolReply::new(
            format!("Uploaded: {source_url}"),
            format_media(&media),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetMediaParams {
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_page")]
    pub page: u32,

    /// 'image', 'video', 'audio' or 'application'.
    pub media_type: Option<String>,
}

pub struct GetMediaTool;

impl ToolDefinition for GetMediaTool {
    const NAME: &'static str = "wordpress_get_media";
    const DESCRIPTION: &'static str = "Get media library files with filtering by type";
    const FAILURE: &'static str = "Failed to get media";
    type Params = GetMediaParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = Query::new()
            .push("per_page", params.per_page)
            .push("page", params.page)
            .push_opt("media_type", params.media_type)
            .endpoint("/media");

        let media = format_list(client.core_get(&endpoint).await?, format_media)?;
        Ok(ToolReply::new(
            format!("Retrieved {} media items", media.len()),
            json!({"count": media.len(), "media": media}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMediaParams {
    pub media_id: u64,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

pub struct UpdateMediaTool;

impl ToolDefinition for UpdateMediaTool {
    const NAME: &'static str = "wordpress_update_media";
    const DESCRIPTION: &'static str = "Update media file metadata (alt text, caption, title)";
    const FAILURE: &'static str = "Failed to update media";
    type Params = UpdateMediaParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let mut updates = Map::new();
        for (key, value) in [
            ("alt_text", params.alt_text),
            ("caption", params.caption),
            ("title", params.title),
            ("description", params.description),
        ] {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                updates.insert(key.to_string(), Value::String(value));
            }
        }

        let endpoint = format!("/media/{}", params.media_id);
        let media = client
            .core(Method::PUT, &endpoint, Some(&Value::Object(updates)))
            .await?;
        Ok(ToolReply::new(
            format!("Updated media ID {}", params.media_id),
            format_media(&media),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMediaParams {
    pub media_id: u64,

    /// Media cannot be trashed, so this defaults to true.
    #[serde(default = "default_force")]
    pub force: bool,
}

fn default_force() -> bool {
    true
}

pub struct DeleteMediaTool;

impl ToolDefinition for DeleteMediaTool {
    const NAME: &'static str = "wordpress_delete_media";
    const DESCRIPTION: &'static str = "Delete a media file from library";
    const FAILURE: &'static str = "Failed to delete media";
    type Params = DeleteMediaParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = format!("/media/{}?force={}", params.media_id, params.force);
        client.core(Method::DELETE, &endpoint, None).await?;
        Ok(ToolReply::new(
            format!("Deleted media ID {}", params.media_id),
            json!({"id": params.media_id, "deleted": true}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetFeaturedImageParams {
    pub post_id: u64,
    pub media_id: u64,
}

pub struct SetFeaturedImageTool;

impl ToolDefinition for SetFeaturedImageTool {
    const NAME: &'static str = "wordpress_set_featured_image";
    const DESCRIPTION: &'static str = "Set featured image (thumbnail) for a post";
    const FAILURE: &'static str = "Failed to set featured image";
    type Params = SetFeaturedImageParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = format!("/posts/{}", params.post_id);
        let body = json!({"featured_media": params.media_id});
        client.core(Method::PUT, &endpoint, Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Set featured image for post {}", params.post_id),
            json!({"postId": params.post_id, "mediaId": params.media_id, "set": true}),
        ))
    }
}

//! Remote file operations on the WordPress host.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{pick, post, show};
use crate::core::api::WordPressClient;
use crate::domains::tools::{ToolDefinition, ToolRegistry, ToolReply, ToolResult};

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<ReadFileTool>()
        .register::<WriteFileTool>()
        .register::<EditFileTool>()
        .register::<DeleteFileTool>()
        .register::<ListDirTool>()
        .register::<GrepTool>()
        .register::<GlobSearchTool>()
        .register::<MkdirTool>()
        .register::<RenameTool>()
        .register::<CopyTool>()
        .register::<FileInfoTool>()
        .register::<AppendFileTool>();
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ReadFileParams {
    pub target_file: String,

    /// First line to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Maximum number of lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

pub struct ReadFileTool;

impl ToolDefinition for ReadFileTool {
    const NAME: &'static str = "banildtools_read_file";
    const DESCRIPTION: &'static str = "Read file contents from WordPress server. Supports line offset and limit for partial reads. Returns base64 for images.";
    const FAILURE: &'static str = "Failed to read file";
    type Params = ReadFileParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/read", &params).await?;
        Ok(ToolReply::new(
            format!("Read file: {}", show(&result, "path")),
            pick(
                &result,
                &[
                    "path",
                    "contents",
                    "size",
                    "total_lines",
                    "mime_type",
                    "is_binary",
                    "is_image",
                    "contents_base64",
                ],
            ),
        ))
    }
}

/// Path plus full contents, shared by write and append.
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct FileContentsParams {
    pub file_path: String,
    pub contents: String,
}

pub struct WriteFileTool;

impl ToolDefinition for WriteFileTool {
    const NAME: &'static str = "banildtools_write_file";
    const DESCRIPTION: &'static str =
        "Create or overwrite a file on WordPress server. Creates parent directories if needed.";
    const FAILURE: &'static str = "Failed to write file";
    type Params = FileContentsParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/write", &params).await?;
        Ok(ToolReply::new(
            format!(
                "Written {} bytes to {}",
                show(&result, "bytes_written"),
                show(&result, "path")
            ),
            pick(&result, &["path", "bytes_written"]),
        ))
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct EditFileParams {
    pub file_path: String,
    pub old_string: String,
    pub new_string: String,

    /// Replace every occurrence instead of the first unique match.
    #[serde(default)]
    pub replace_all: bool,
}

pub struct EditFileTool;

impl ToolDefinition for EditFileTool {
    const NAME: &'static str = "banildtools_edit_file";
    const DESCRIPTION: &'static str = "Search and replace text in a file. Set replace_all=true to replace all occurrences, otherwise replaces only the first unique match.";
    const FAILURE: &'static str = "Failed to edit file";
    type Params = EditFileParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/edit", &params).await?;
        Ok(ToolReply::new(
            format!(
                "Replaced {} occurrence(s) in {}",
                show(&result, "replacements"),
                show(&result, "path")
            ),
            pick(&result, &["path", "replacements", "bytes_written"]),
        ))
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DeleteFileParams {
    pub target_file: String,
}

pub struct DeleteFileTool;

impl ToolDefinition for DeleteFileTool {
    const NAME: &'static str = "banildtools_delete_file";
    const DESCRIPTION: &'static str = "Delete a file or directory from WordPress server. Directories are deleted recursively. Requires delete permission enabled in plugin settings.";
    const FAILURE: &'static str = "Failed to delete file";
    type Params = DeleteFileParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/delete", &params).await?;
        Ok(ToolReply::new(
            format!("Deleted: {}", show(&result, "path")),
            json!({"path": result.get("path"), "deleted": true}),
        ))
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ListDirParams {
    pub target_directory: String,

    /// Glob patterns to leave out of the listing.
    #[serde(default)]
    pub ignore_globs: Vec<String>,
}

pub struct ListDirTool;

impl ToolDefinition for ListDirTool {
    const NAME: &'static str = "banildtools_list_dir";
    const DESCRIPTION: &'static str = "List directory contents on WordPress server. Returns files and directories with metadata. Supports ignore patterns.";
    const FAILURE: &'static str = "Failed to list directory";
    type Params = ListDirParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/list", &params).await?;
        Ok(ToolReply::new(
            format!(
                "Listed {} items in {}",
                show(&result, "total_items"),
                show(&result, "path")
            ),
            pick(&result, &["path", "total_items", "items"]),
        ))
    }
}

fn default_output_mode() -> String {
    "content".to_string()
}

fn default_max_results() -> u32 {
    500
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GrepParams {
    /// Regular expression to search for.
    pub pattern: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// File name filter, e.g. `*.php`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glob: Option<String>,

    #[serde(default)]
    pub case_insensitive: bool,

    #[serde(default)]
    pub context_lines: u32,

    /// 'content', 'files_with_matches' or 'count'.
    #[serde(default = "default_output_mode")]
    pub output_mode: String,

    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

pub struct GrepTool;

impl ToolDefinition for GrepTool {
    const NAME: &'static str = "banildtools_grep";
    const DESCRIPTION: &'static str = "Search for regex patterns in files (grep-like). Supports file glob filtering, context lines, and multiple output modes (content, files_with_matches, count).";
    const FAILURE: &'static str = "Failed to search files";
    type Params = GrepParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/search", &params).await?;
        Ok(ToolReply::new(
            format!(
                "Found {} matches in {} files",
                show(&result, "total_matches"),
                show(&result, "files_with_matches")
            ),
            pick(
                &result,
                &[
                    "pattern",
                    "path",
                    "output_mode",
                    "files_searched",
                    "files_with_matches",
                    "total_matches",
                    "truncated",
                    "results",
                ],
            ),
        ))
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GlobSearchParams {
    pub glob_pattern: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_directory: Option<String>,
}

pub struct GlobSearchTool;

impl ToolDefinition for GlobSearchTool {
    const NAME: &'static str = "banildtools_glob_search";
    const DESCRIPTION: &'static str = "Find files matching a glob pattern on WordPress server. Results sorted by modification time (newest first).";
    const FAILURE: &'static str = "Failed to glob search";
    type Params = GlobSearchParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/glob", &params).await?;
        Ok(ToolReply::new(
            format!(
                "Found {} files matching {}",
                show(&result, "total_files"),
                show(&result, "pattern")
            ),
            pick(&result, &["pattern", "directory", "total_files", "files"]),
        ))
    }
}

fn default_recursive() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct MkdirParams {
    pub path: String,

    /// Create missing parent directories.
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

pub struct MkdirTool;

impl ToolDefinition for MkdirTool {
    const NAME: &'static str = "banildtools_mkdir";
    const DESCRIPTION: &'static str = "Create a directory on WordPress server. Creates parent directories by default (recursive=true).";
    const FAILURE: &'static str = "Failed to create directory";
    type Params = MkdirParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/mkdir", &params).await?;
        Ok(ToolReply::new(
            format!("Created directory: {}", show(&result, "path")),
            pick(&result, &["path"]),
        ))
    }
}

/// Source and destination, shared by rename and copy.
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct TransferParams {
    pub source: String,
    pub destination: String,
}

pub struct RenameTool;

impl ToolDefinition for RenameTool {
    const NAME: &'static str = "banildtools_rename";
    const DESCRIPTION: &'static str = "Rename or move a file/directory on WordPress server. Creates destination directory if needed.";
    const FAILURE: &'static str = "Failed to rename";
    type Params = TransferParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/rename", &params).await?;
        Ok(ToolReply::new(
            format!(
                "Renamed {} -> {}",
                show(&result, "source"),
                show(&result, "destination")
            ),
            pick(&result, &["source", "destination"]),
        ))
    }
}

pub struct CopyTool;

impl ToolDefinition for CopyTool {
    const NAME: &'static str = "banildtools_copy";
    const DESCRIPTION: &'static str =
        "Copy a file or directory on WordPress server. Directories are copied recursively.";
    const FAILURE: &'static str = "Failed to copy";
    type Params = TransferParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/copy", &params).await?;
        Ok(ToolReply::new(
            format!(
                "Copied {} -> {}",
                show(&result, "source"),
                show(&result, "destination")
            ),
            pick(&result, &["source", "destination"]),
        ))
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct FileInfoParams {
    pub path: String,
}

pub struct FileInfoTool;

impl ToolDefinition for FileInfoTool {
    const NAME: &'static str = "banildtools_file_info";
    const DESCRIPTION: &'static str = "Get detailed information about a file or directory on WordPress server (size, permissions, modified date, line count, etc).";
    const FAILURE: &'static str = "Failed to get file info";
    type Params = FileInfoParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let mut result = post(client, "/info", &params).await?;
        let info = result
            .get_mut("info")
            .map(serde_json::Value::take)
            .unwrap_or_default();
        Ok(ToolReply::new(
            format!("Info for: {}", show(&info, "path")),
            info,
        ))
    }
}

pub struct AppendFileTool;

impl ToolDefinition for AppendFileTool {
    const NAME: &'static str = "banildtools_append_file";
    const DESCRIPTION: &'static str =
        "Append content to end of file. Use for writing large files in chunks to avoid timeouts.";
    const FAILURE: &'static str = "Failed to append to file";
    type Params = FileContentsParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/append", &params).await?;
        Ok(ToolReply::new(
            format!(
                "Appended {} bytes to {}",
                show(&result, "bytes_appended"),
                show(&result, "path")
            ),
            pick(&result, &["path", "bytes_appended"]),
        ))
    }
}

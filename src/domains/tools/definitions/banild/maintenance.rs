//! Diagnostics and housekeeping: debug log, PHP lint, caches, server info and
//! read-only SQL.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{flag, pick, post, show};
use crate::core::api::{Method, WordPressClient};
use crate::domains::tools::definitions::common::NoParams;
use crate::domains::tools::{ToolDefinition, ToolRegistry, ToolReply, ToolResult};

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<DebugLogTool>()
        .register::<PhpLintTool>()
        .register::<ClearCacheTool>()
        .register::<ServerInfoTool>()
        .register::<DbQueryTool>();
}

fn default_action() -> String {
    "tail".to_string()
}

fn default_lines() -> u32 {
    100
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DebugLogParams {
    /// 'read', 'tail' or 'clear'.
    #[serde(default = "default_action")]
    pub action: String,

    #[serde(default = "default_lines")]
    pub lines: u32,
}

pub struct DebugLogTool;

impl ToolDefinition for DebugLogTool {
    const NAME: &'static str = "banildtools_debug_log";
    const DESCRIPTION: &'static str = "Read, tail, or clear WordPress debug.log file.";
    const FAILURE: &'static str = "Failed to access debug log";
    type Params = DebugLogParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/debug-log", &params).await?;

        if params.action == "clear" {
            let outcome = if flag(&result, "cleared") {
                "cleared"
            } else {
                "could not be cleared"
            };
            return Ok(ToolReply::new(
                format!("Debug log {outcome}"),
                pick(&result, &["cleared"]),
            ));
        }

        let summary = if flag(&result, "exists") {
            format!("{} lines", show(&result, "lines_returned"))
        } else {
            "not found".to_string()
        };
        Ok(ToolReply::new(
            format!("Debug log: {summary}"),
            pick(
                &result,
                &["path", "exists", "size", "content", "lines_returned"],
            ),
        ))
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Either a server-side file or inline code.
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct PhpLintParams {
    #[serde(default, skip_serializing_if = "blank")]
    pub file_path: Option<String>,

    #[serde(default, skip_serializing_if = "blank")]
    pub code: Option<String>,
}

pub struct PhpLintTool;

impl ToolDefinition for PhpLintTool {
    const NAME: &'static str = "banildtools_php_lint";
    const DESCRIPTION: &'static str =
        "Check PHP syntax for errors. Provide either file_path or code string.";
    const FAILURE: &'static str = "Failed to lint PHP";
    type Params = PhpLintParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/php-lint", &params).await?;
        let message = if flag(&result, "valid") {
            "PHP syntax valid".to_string()
        } else {
            let count = result
                .get("errors")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            format!("PHP errors: {count}")
        };
        Ok(ToolReply::new(
            message,
            pick(&result, &["valid", "errors", "file_path"]),
        ))
    }
}

fn default_cache_type() -> String {
    "all".to_string()
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ClearCacheParams {
    /// 'all', 'object', 'transients', 'rewrite' or 'page'.
    #[serde(rename = "type", default = "default_cache_type")]
    pub cache_type: String,
}

pub struct ClearCacheTool;

impl ToolDefinition for ClearCacheTool {
    const NAME: &'static str = "banildtools_clear_cache";
    const DESCRIPTION: &'static str =
        "Clear WordPress caches (object, transients, rewrite rules, page cache).";
    const FAILURE: &'static str = "Failed to clear cache";
    type Params = ClearCacheParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/clear-cache", &params).await?;
        Ok(ToolReply::new(
            format!("Cache cleared: {}", show(&result, "type")),
            pick(&result, &["type", "cleared", "details"]),
        ))
    }
}

pub struct ServerInfoTool;

impl ToolDefinition for ServerInfoTool {
    const NAME: &'static str = "banildtools_server_info";
    const DESCRIPTION: &'static str =
        "Get comprehensive server information (PHP, WordPress, Database, Disk, etc).";
    const FAILURE: &'static str = "Failed to get server info";
    type Params = NoParams;

    async fn execute(client: &WordPressClient, _params: Self::Params) -> ToolResult {
        let result = client.plugin(Method::GET, "/server-info", None).await?;
        let version = |section: &str| {
            result
                .get(section)
                .map(|s| show(s, "version"))
                .unwrap_or_else(|| "?".to_string())
        };
        let message = format!("Server: PHP {}, WP {}", version("php"), version("wordpress"));
        Ok(ToolReply::new(message, result))
    }
}

fn default_row_limit() -> u32 {
    100
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DbQueryParams {
    /// A single SELECT statement.
    pub query: String,

    #[serde(default = "default_row_limit")]
    pub limit: u32,
}

pub struct DbQueryTool;

impl ToolDefinition for DbQueryTool {
    const NAME: &'static str = "banildtools_db_query";
    const DESCRIPTION: &'static str = "Execute read-only SELECT SQL query on WordPress database.";
    const FAILURE: &'static str = "Failed to execute query";
    type Params = DbQueryParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let result = post(client, "/db-query", &params).await?;
        Ok(ToolReply::new(
            format!("Query returned {} rows", show(&result, "row_count")),
            pick(&result, &["query", "rows", "row_count", "columns"]),
        ))
    }
}

//! Plugin and theme tools, including the public plugin directory search.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use url::form_urlencoded;

use super::posts::{default_page, default_per_page};
use crate::core::api::{Method, WordPressClient};
use crate::domains::tools::definitions::common::{NoParams, as_list, format_list, rendered};
use crate::domains::tools::{ToolDefinition, ToolError, ToolRegistry, ToolReply, ToolResult};

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<GetPluginsTool>()
        .register::<InstallPluginTool>()
        .register::<ActivatePluginTool>()
        .register::<SearchPluginsTool>()
        .register::<GetThemesTool>();
}

/// Percent-encode one path segment, `/` included.
pub fn encode_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn format_plugin(plugin: &Value) -> Value {
    json!({
        "plugin": plugin.get("plugin"),
        "status": plugin.get("status"),
        "name": plugin.get("name"),
        "version": plugin.get("version"),
        "author": plugin.get("author"),
        "description": rendered(plugin, "description"),
    })
}

fn format_theme(theme: &Value) -> Value {
    let name = match rendered(theme, "name") {
        "" => theme.get("stylesheet").cloned().unwrap_or(Value::Null),
        name => Value::String(name.to_string()),
    };
    json!({
        "stylesheet": theme.get("stylesheet"),
        "name": name,
        "version": theme.get("version"),
        "author": theme.get("author"),
        "status": theme.get("status"),
    })
}

pub struct GetPluginsTool;

impl ToolDefinition for GetPluginsTool {
    const NAME: &'static str = "wordpress_get_plugins";
    const DESCRIPTION: &'static str = "Get all installed WordPress plugins";
    const FAILURE: &'static str = "Failed to get plugins";
    type Params = NoParams;

    async fn execute(client: &WordPressClient, _params: Self::Params) -> ToolResult {
        let plugins = format_list(client.core_get("/plugins").await?, format_plugin)?;
        Ok(ToolReply::new(
            format!("Retrieved {} plugins", plugins.len()),
            json!({"plugins": plugins, "total": plugins.len()}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallPluginParams {
    /// WordPress.org plugin slug.
    pub slug: Option<String>,

    /// URL of a plugin ZIP file.
    pub zip_url: Option<String>,

    /// Activate after install.
    #[serde(default)]
    pub activate: bool,
}

pub struct InstallPluginTool;

impl ToolDefinition for InstallPluginTool {
    const NAME: &'static str = "wordpress_install_plugin";
    const DESCRIPTION: &'static str = "Install a plugin by WordPress.org slug or by zip URL. Optionally activate after install.";
    const FAILURE: &'static str = "Failed to install plugin";
    type Params = InstallPluginParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let slug = params.slug.filter(|s| !s.is_empty());
        let zip_url = params.zip_url.filter(|u| !u.is_empty());
        if slug.is_none() && zip_url.is_none() {
            return Err(ToolError::invalid_arguments("Provide either slug or zipUrl"));
        }

        let mut body = json!({});
        if let Some(slug) = &slug {
            body["slug"] = json!(slug);
        }
        if let Some(zip_url) = &zip_url {
            body["source_url"] = json!(zip_url);
            body["zip_url"] = json!(zip_url);
        }
        if params.activate {
            body["status"] = json!("active");
        }

        let result = client.core(Method::POST, "/plugins", Some(&body)).await?;

        let mut message = vec!["Plugin installation complete".to_string()];
        if let Some(slug) = &slug {
            message.push(format!("slug: {slug}"));
        }
        if params.activate || result.get("status").and_then(Value::as_str) == Some("active") {
            message.push("activated".to_string());
        }
        Ok(ToolReply::new(message.join(" · "), result))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivatePluginParams {
    /// Plugin file, e.g. 'akismet/akismet.php'.
    pub plugin_file: Option<String>,

    /// Slug used to find the plugin file among installed plugins.
    pub slug: Option<String>,
}

/// Plugin file of the first installed plugin under `{slug}/`.
fn find_plugin_file(plugins: Vec<Value>, slug: &str) -> Option<String> {
    let prefix = format!("{slug}/");
    plugins.into_iter().find_map(|p| {
        p.get("plugin")
            .and_then(Value::as_str)
            .filter(|file| file.starts_with(&prefix))
            .map(str::to_string)
    })
}

pub struct ActivatePluginTool;

impl ToolDefinition for ActivatePluginTool {
    const NAME: &'static str = "wordpress_activate_plugin";
    const DESCRIPTION: &'static str =
        "Activate an installed plugin. Provide pluginFile or slug to resolve it.";
    const FAILURE: &'static str = "Failed to activate plugin";
    type Params = ActivatePluginParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let mut target = params.plugin_file.filter(|f| !f.is_empty());
        if target.is_none() {
            if let Some(slug) = params.slug.filter(|s| !s.is_empty()) {
                let plugins = as_list(client.core_get("/plugins").await?)?;
                target = find_plugin_file(plugins, &slug);
            }
        }
        let Some(target) = target else {
            return Err(ToolError::invalid_arguments(
                "Provide pluginFile (e.g., 'akismet/akismet.php') or a valid slug",
            ));
        };

        let endpoint = format!("/plugins/{}", encode_segment(&target));
        let updated = client
            .core(Method::PUT, &endpoint, Some(&json!({"status": "active"})))
            .await?;
        let status = updated
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("active");

        Ok(ToolReply::new(
            format!("Activated plugin {target}"),
            json!({"plugin": target, "status": status}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchPluginsParams {
    pub query: String,

    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

pub struct SearchPluginsTool;

impl ToolDefinition for SearchPluginsTool {
    const NAME: &'static str = "wordpress_search_plugins";
    const DESCRIPTION: &'static str = "Search WordPress.org plugin directory by keyword";
    const FAILURE: &'static str = "Failed to search plugins";
    type Params = SearchPluginsParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        if params.query.trim().is_empty() {
            return Err(ToolError::invalid_arguments("Query is required"));
        }

        let results = client
            .search_plugin_directory(&params.query, params.page, params.per_page)
            .await?;
        Ok(ToolReply::new(
            format!("Found {} plugins for \"{}\"", results.len(), params.query),
            json!({
                "results": results,
                "count": results.len(),
                "page": params.page,
                "perPage": params.per_page,
            }),
        ))
    }
}

pub struct GetThemesTool;

impl ToolDefinition for GetThemesTool {
    const NAME: &'static str = "wordpress_get_themes";
    const DESCRIPTION: &'static str = "Get all installed WordPress themes";
    const FAILURE: &'static str = "Failed to get themes";
    type Params = NoParams;

    async fn execute(client: &WordPressClient, _params: Self::Params) -> ToolResult {
        let themes = format_list(client.core_get("/themes").await?, format_theme)?;
        Ok(ToolReply::new(
            format!("Retrieved {} themes", themes.len()),
            json!({"themes": themes, "total": themes.len()}),
        ))
    }
}

//! MCP server handler and startup sequence.
//!
//! Startup is: validate the site configuration, probe the BanildTools plugin,
//! build the tool registry, then hand the server to a transport. Tool calls
//! on stdio go through the rmcp `ToolRouter`; the HTTP transport dispatches
//! through the same registry directly.

use rmcp::{
    ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::api::{PluginStatus, WordPressClient};
use super::config::Config;
use super::error;
use crate::domains::tools::{ToolError, ToolRegistry, build_tool_router};

/// The MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    config: Arc<Config>,

    /// Probe outcome, fixed for the life of the process.
    plugin: PluginStatus,

    registry: Arc<ToolRegistry>,

    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Validate the configuration, probe the plugin and register tools.
    ///
    /// Fails only on configuration problems; an unreachable plugin just
    /// leaves its tool group out.
    pub async fn connect(config: Config) -> error::Result<Self> {
        config.wordpress.validate()?;

        info!(url = %config.wordpress.url, "Connecting to WordPress");
        let client = Arc::new(WordPressClient::new(config.wordpress.clone())?);

        let plugin = client.probe_plugin().await;
        if plugin.available {
            info!("{}", plugin.message);
        } else {
            warn!("{}", plugin.message);
        }

        Ok(Self::with_plugin(config, client, plugin))
    }

    /// Build a server for an already probed site.
    pub fn with_plugin(config: Config, client: Arc<WordPressClient>, plugin: PluginStatus) -> Self {
        let registry = Arc::new(ToolRegistry::build(client, &plugin));
        info!(
            tools = registry.len(),
            banildtools = plugin.available,
            "Registered {} tools",
            registry.len()
        );

        Self {
            tool_router: build_tool_router::<Self>(&registry),
            config: Arc::new(config),
            plugin,
            registry,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn plugin_status(&self) -> &PluginStatus {
        &self.plugin
    }

    /// Text sent to clients on initialize.
    pub fn instructions(&self) -> String {
        format!(
            "WordPress MCP server for {}. Manages posts, pages, media, users, taxonomies, \
             comments, settings, plugins, SEO metadata, custom post types and WooCommerce \
             products. {}.",
            self.config.wordpress.url, self.plugin.message
        )
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// Tool metadata as MCP JSON, in registration order.
    pub fn list_tools(&self) -> Vec<Value> {
        self.registry
            .get_all_tools()
            .iter()
            .filter_map(|tool| serde_json::to_value(tool).ok())
            .collect()
    }

    /// Call a tool by name through the registry.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, ToolError> {
        self.registry.call_tool(name, arguments).await
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::test_support::{MockBackend, MockRoute};
    use crate::core::error::Error;
    use rmcp::model::RawContent;
    use serde_json::json;

    fn server_for(backend: &MockBackend, plugin: PluginStatus) -> McpServer {
        let mut config = Config::default();
        config.wordpress = backend.config();
        let client = Arc::new(backend.client());
        McpServer::with_plugin(config, client, plugin)
    }

    #[tokio::test]
    async fn test_connect_fails_fast_without_credentials() {
        let err = McpServer::connect(Config::default()).await.err().unwrap();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("WORDPRESS_URL"));
    }

    #[tokio::test]
    async fn test_connect_registers_plugin_tools_when_detected() {
        let backend = MockBackend::start(vec![
            MockRoute::get("/wp-json/banildtools/v1/tools")
                .json(json!({"version": "1.2.0", "tools_count": 23})),
        ])
        .await;
        let mut config = Config::default();
        config.wordpress = backend.config();

        let server = McpServer::connect(config).await.unwrap();
        assert!(server.plugin_status().available);
        assert_eq!(server.registry().len(), 79);
        assert!(server.instructions().contains("BanildTools v1.2.0 detected"));
    }

    #[tokio::test]
    async fn test_connect_without_plugin_keeps_core_tools() {
        let backend = MockBackend::start(vec![]).await;
        let mut config = Config::default();
        config.wordpress = backend.config();

        let server = McpServer::connect(config).await.unwrap();
        assert!(!server.plugin_status().available);
        assert_eq!(server.registry().len(), 56);
        assert_eq!(server.list_tools().len(), 56);
    }

    #[tokio::test]
    async fn test_list_tools_json_shape() {
        let backend = MockBackend::start(vec![]).await;
        let server = server_for(&backend, PluginStatus::unavailable("off"));

        let tools = server.list_tools();
        assert_eq!(tools[0]["name"], "wordpress_create_post");
        assert_eq!(tools[0]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_call_tool_end_to_end() {
        let backend = MockBackend::start(vec![
            MockRoute::post("/wp-json/wp/v2/posts").json(json!({
                "id": 9, "title": {"rendered": "Hello"}, "status": "draft",
                "slug": "hello", "link": "https://example.com/hello"
            })),
        ])
        .await;
        let server = server_for(&backend, PluginStatus::unavailable("off"));

        let result = server
            .call_tool("wordpress_create_post", json!({"title": "Hello"}))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        let RawContent::Text(first) = &result.content[0].raw else {
            panic!("expected text content");
        };
        assert!(first.text.contains("Hello"));
        assert_eq!(backend.requests()[0].json()["status"], "draft");
    }

    #[tokio::test]
    async fn test_get_info_only_advertises_tools() {
        let backend = MockBackend::start(vec![]).await;
        let server = server_for(
            &backend,
            PluginStatus::unavailable("BanildTools plugin not installed or inactive"),
        );

        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
        assert!(info.instructions.unwrap().contains("not installed"));
    }
}

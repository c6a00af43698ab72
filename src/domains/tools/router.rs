//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Used by the STDIO transport. Every route delegates to the registry entry's
//! handler, so both transports share validation and envelopes.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
};

use super::error::ToolError;
use super::registry::ToolRegistry;

/// Build the tool router with every tool in `registry`.
pub fn build_tool_router<S>(registry: &ToolRegistry) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .entries()
        .iter()
        .fold(ToolRouter::new(), |router, entry| {
            let entry = entry.clone();
            router.with_route(ToolRoute::new_dyn(
                entry.tool.clone(),
                move |ctx: ToolCallContext<'_, S>| {
                    let args = ctx.arguments.clone().unwrap_or_default();
                    let call = entry.call(args);
                    async move { call.await.map_err(into_mcp_error) }.boxed()
                },
            ))
        })
}

/// Rejected calls become protocol errors.
pub fn into_mcp_error(err: ToolError) -> McpError {
    match err {
        ToolError::InvalidArguments(_) | ToolError::NotFound(_) => {
            McpError::invalid_params(err.to_string(), None)
        }
        other => McpError::internal_error(other.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::{PluginStatus, WordPressClient};
    use crate::core::config::WordPressConfig;
    use std::sync::Arc;

    struct TestServer {}

    fn registry(available: bool) -> ToolRegistry {
        let client =
            WordPressClient::new(WordPressConfig::new("http://127.0.0.1:9", "admin", "secret"))
                .unwrap();
        let plugin = PluginStatus {
            available,
            version: None,
            tools_count: None,
            message: String::new(),
        };
        ToolRegistry::build(Arc::new(client), &plugin)
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(&registry(false));
        let tools = router.list_all();
        assert_eq!(tools.len(), 56);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"wordpress_get_posts"));
        assert!(names.contains(&"wordpress_set_seo_meta"));
        assert!(names.contains(&"woocommerce_delete_product"));
        assert!(!names.contains(&"banildtools_read_file"));
    }

    #[test]
    fn test_registry_matches_router() {
        let registry = registry(true);
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(&registry);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }

    #[test]
    fn test_error_mapping() {
        let err = into_mcp_error(ToolError::invalid_arguments("Missing required parameter 'postId'"));
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let err = into_mcp_error(ToolError::internal("boom"));
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }
}

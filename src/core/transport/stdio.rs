//! STDIO transport.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

pub struct StdioTransport;

impl StdioTransport {
    /// Serve one MCP session over stdin/stdout.
    ///
    /// Tool calls are dispatched concurrently by rmcp; a slow call does not
    /// hold up the next request on the stream.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        let tools = server.registry().len();
        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        info!(tools, "WordPress MCP server running on stdio");

        let reason = service
            .waiting()
            .await
            .map_err(|e| TransportError::service(e.to_string()))?;

        info!(?reason, "STDIO session closed");
        Ok(())
    }
}

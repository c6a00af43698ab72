//! Tools domain module.
//!
//! Tools are the only MCP capability this server exposes. Each one wraps a
//! WordPress, WooCommerce or BanildTools REST call.
//!
//! ## Architecture
//!
//! - `definition.rs` - The `ToolDefinition` trait and `ToolReply`
//! - `definitions/` - The tool catalog, grouped by backend surface
//! - `params.rs` - Parameter descriptors derived from input schemas
//! - `envelope.rs` - Success / error `CallToolResult` builders
//! - `registry.rs` - Ordered registration and HTTP dispatch
//! - `router.rs` - rmcp ToolRouter for the STDIO transport
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Add a unit struct implementing `ToolDefinition` in the right group
//! 2. Register it in that group's `register` function
//!
//! Both transports pick it up from the registry.

pub mod definition;
pub mod definitions;
pub mod envelope;
mod error;
pub mod params;
mod registry;
pub mod router;

pub use definition::{ToolDefinition, ToolReply, ToolResult, tool_model};
pub use error::ToolError;
pub use params::{ParamDescriptor, ParamKind};
pub use registry::{RegisteredTool, ToolFuture, ToolRegistry};
pub use router::build_tool_router;

//! Core infrastructure: configuration, errors, the WordPress API client,
//! the MCP server handler and its transports.

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};

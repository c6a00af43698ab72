//! WordPress MCP server library.
//!
//! Exposes a WordPress site (core REST API, WooCommerce and the optional
//! BanildTools companion plugin) as Model Context Protocol tools.
//!
//! # Architecture
//!
//! - **core**: configuration, error types, the WordPress API client, the MCP
//!   server handler and transports (stdio, optional HTTP)
//! - **domains::tools**: the tool trait, registry, router and the tool catalog
//!
//! # Example
//!
//! ```rust,no_run
//! use wordpress_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::connect(config.clone()).await?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};

//! Transport layer for the MCP server.
//!
//! - **STDIO** (feature `stdio`, default): newline-delimited JSON-RPC on
//!   stdin/stdout, the mode agent hosts spawn.
//! - **HTTP** (feature `http`): JSON-RPC over POST, for local testing and
//!   browser clients.
//!
//! Logs always go to stderr so they never mix with stdio protocol frames.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;

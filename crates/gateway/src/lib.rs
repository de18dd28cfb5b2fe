//! MCP transports for HIPAA Guardian.
//!
//! [`McpServer`] turns JSON-RPC messages into registry calls. Two
//! transports feed it:
//! - [`stdio`]: newline-delimited messages on stdin/stdout (the default)
//! - [`http`]: one message per `POST /mcp`, plus `GET /health`

pub mod http;
pub mod jsonrpc;
pub mod mcp;
pub mod stdio;

pub use http::{build_router, start};
pub use mcp::{McpServer, ServerInfo, SUPPORTED_PROTOCOL_VERSIONS};
pub use stdio::serve_stdio;

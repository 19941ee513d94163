// ABOUTME: MCP module - WebSocket helper for the MCP control-plane service.
// ABOUTME: One connection, id-correlated request/response with per-request deadlines.

mod channel;

pub use channel::{CORRELATION_FIELD, McpChannel};

//! Model Context Protocol (MCP) server handling and JSON-RPC implementations
//!
//! Provides envelope decoding, handshake state, method routing and error formatting.

pub mod codec;
pub mod rpc;
pub mod server;
pub mod session;

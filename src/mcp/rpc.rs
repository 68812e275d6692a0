//! JSON-RPC error taxonomy and formatting utilities
//!
//! Provides standardized mapping of internal `McpError`s to JSON-RPC error objects.

use serde_json::Value;

use crate::errors::McpError;
use crate::mcp::codec::{ErrorObject, RequestId, Response};

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
pub const NOT_INITIALIZED: i32 = -32002;

/// Pre-encoded envelope used when a response cannot be serialized at all.
pub const ENCODE_FAILURE_BODY: &[u8] =
    br#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;

pub fn error_object(err: McpError) -> ErrorObject {
    let (code, message, data) = match err {
        McpError::Parse { reason } => (PARSE_ERROR, "Parse error", Some(Value::String(reason))),
        McpError::MethodNotFound { method } => {
            (METHOD_NOT_FOUND, "Method not found", Some(Value::String(method)))
        }
        McpError::UnknownTool { name } => (METHOD_NOT_FOUND, "Unknown tool", Some(Value::String(name))),
        McpError::InvalidParams { reason } => {
            (INVALID_PARAMS, "Invalid params", Some(Value::String(reason)))
        }
        McpError::NotInitialized => (NOT_INITIALIZED, "Server not initialized", None),
        McpError::Internal { message } => {
            tracing::error!(error = %message, "request failed with internal error");
            (INTERNAL_ERROR, "Internal error", None)
        }
    };

    ErrorObject {
        code,
        message: message.to_string(),
        data,
    }
}

pub fn error_response(id: Option<RequestId>, err: McpError) -> Response {
    Response::failure(id, error_object(err))
}

/// Failures detected before an identifier could be read answer with `null`.
pub fn parse_error_response(err: McpError) -> Response {
    error_response(Some(RequestId::Null), err)
}

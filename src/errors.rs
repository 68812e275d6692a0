use thiserror::Error;

/// Failure conditions raised while decoding or dispatching an MCP request.
///
/// Every variant is turned into a JSON-RPC error object by `mcp::rpc`; none of
/// them ever reaches the transport as a fault.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum McpError {
    #[error("parse error: {reason}")]
    Parse { reason: String },
    #[error("method not found: {method}")]
    MethodNotFound { method: String },
    #[error("invalid params: {reason}")]
    InvalidParams { reason: String },
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },
    #[error("server not initialized")]
    NotInitialized,
    #[error("internal error")]
    Internal { message: String },
}

impl McpError {
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

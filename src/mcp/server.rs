//! The central Model Context Protocol engine
//!
//! Provides request routing through a static method table, the handshake gate
//! for capability methods, the `initialize` handler and audit logging of every
//! routed call.

use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ProtocolVersion, ServerCapabilities, ServerCapabilitiesTools,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, value::RawValue, Map, Value};
use tracing::{debug, error, info, warn};

use crate::domain::tools::{handle_tools_call, handle_tools_list};
use crate::errors::McpError;
use crate::mcp::codec::{self, Request, Response};
use crate::mcp::rpc::{error_response, parse_error_response, ENCODE_FAILURE_BODY};
use crate::mcp::session::Session;

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// What a handler gets to see of the request it serves.
pub struct RequestContext<'a> {
    pub session: &'a Session,
    pub params: Option<&'a RawValue>,
}

type Handler = fn(&RequestContext<'_>) -> Result<Value, McpError>;

enum Action {
    Respond(Handler),
    Notify,
}

struct Route {
    method: &'static str,
    gated: bool,
    action: Action,
}

const ROUTES: &[Route] = &[
    Route {
        method: "initialize",
        gated: false,
        action: Action::Respond(handle_initialize),
    },
    Route {
        method: "notifications/initialized",
        gated: false,
        action: Action::Notify,
    },
    Route {
        method: "tools/list",
        gated: true,
        action: Action::Respond(handle_tools_list),
    },
    Route {
        method: "tools/call",
        gated: true,
        action: Action::Respond(handle_tools_call),
    },
    Route {
        method: "ping",
        gated: false,
        action: Action::Respond(handle_ping),
    },
];

fn lookup_route(method: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.method == method)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Map<String, Value>,
    pub client_info: ClientInfo,
}

#[derive(Debug, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Decodes, routes and answers MCP requests for one server instance.
///
/// Cheap to clone; clones share the handshake state.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    session: Session,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the encoded response, or `None` when the method is a notification.
    pub fn handle(&self, raw: &[u8]) -> Option<Vec<u8>> {
        let response = match codec::decode(raw) {
            Ok(request) => self.dispatch(&request)?,
            Err(err) => {
                warn!(error = %err, "failed to decode request envelope");
                parse_error_response(err.into())
            }
        };

        Some(codec::encode(&response).unwrap_or_else(|err| {
            error!(error = %err, "failed to encode response envelope");
            ENCODE_FAILURE_BODY.to_vec()
        }))
    }

    pub fn dispatch(&self, request: &Request) -> Option<Response> {
        let method = request.method.as_str();
        let outcome = match lookup_route(method) {
            Some(Route {
                action: Action::Notify,
                ..
            }) => {
                debug!(method = %method, "notification received");
                return None;
            }
            Some(Route {
                action: Action::Respond(handler),
                gated,
                ..
            }) => {
                if *gated && !self.session.is_ready() {
                    Err(McpError::NotInitialized)
                } else {
                    handler(&RequestContext {
                        session: &self.session,
                        params: request.params(),
                    })
                }
            }
            None => Err(McpError::method_not_found(method)),
        };

        let response = match outcome {
            Ok(result) => Response::success(request.id.clone(), result),
            Err(err) => error_response(request.id.clone(), err),
        };

        info!(
            method = %method,
            params = %redact_audit_params(request.params()),
            outcome = if response.is_error() { "failure" } else { "success" },
            "mcp action audited"
        );

        Some(response)
    }
}

pub fn initialize_result() -> InitializeResult {
    InitializeResult {
        server_info: Implementation {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
            title: None,
            description: None,
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools {
                list_changed: Some(false),
            }),
            ..Default::default()
        },
        protocol_version: ProtocolVersion::V2024_11_05.into(),
        instructions: None,
        meta: None,
    }
}

/// Parses method params as an object of named fields.
///
/// serde would also fill a struct from a positional array, so anything but an
/// object is refused before deserializing.
pub fn parse_params<T: DeserializeOwned>(
    method: &str,
    params: Option<&RawValue>,
) -> Result<T, McpError> {
    let raw_params =
        params.ok_or_else(|| McpError::invalid_params(format!("{method} requires params")))?;

    if !raw_params.get().trim_start().starts_with('{') {
        return Err(McpError::invalid_params(format!(
            "{method} params must be an object"
        )));
    }

    serde_json::from_str(raw_params.get()).map_err(|err| McpError::invalid_params(err.to_string()))
}

/// The client's requested version is logged but not negotiated; the reply
/// always names [`SUPPORTED_PROTOCOL_VERSION`].
fn handle_initialize(ctx: &RequestContext<'_>) -> Result<Value, McpError> {
    let params: InitializeParams = parse_params("initialize", ctx.params)?;

    let result = serde_json::to_value(initialize_result())
        .map_err(|err| McpError::internal(format!("initialize result serialization: {err}")))?;

    let first_handshake = ctx.session.mark_ready();
    info!(
        client_name = %params.client_info.name,
        client_version = %params.client_info.version,
        requested_protocol_version = %params.protocol_version,
        client_capabilities = params.capabilities.len(),
        first_handshake,
        "handshake completed"
    );

    Ok(result)
}

fn handle_ping(_ctx: &RequestContext<'_>) -> Result<Value, McpError> {
    Ok(json!({}))
}

pub fn redact_audit_params(params: Option<&RawValue>) -> Value {
    params
        .and_then(|raw| serde_json::from_str::<Value>(raw.get()).ok())
        .map(|value| redact_audit_value(&value))
        .unwrap_or(Value::Null)
}

pub fn redact_audit_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = Map::with_capacity(map.len());
            for (key, item) in map {
                let item = if is_sensitive_key(key) {
                    json!("[REDACTED]")
                } else {
                    redact_audit_value(item)
                };
                redacted.insert(key.clone(), item);
            }
            Value::Object(redacted)
        }
        Value::Array(items) => items.iter().map(redact_audit_value).collect(),
        scalar => scalar.clone(),
    }
}

const SENSITIVE_KEY_PARTS: [&str; 5] = ["token", "secret", "password", "credential", "api_key"];

pub fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    SENSITIVE_KEY_PARTS
        .iter()
        .any(|part| normalized.contains(part))
}

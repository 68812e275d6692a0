//! JSON-RPC envelope decoding and encoding
//!
//! Inbound bytes become a [`Request`] whose `params` stay unparsed until a
//! method handler knows the shape it expects. Outbound [`Response`] values carry
//! exactly one of a result or an error object.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{value::RawValue, Value};
use thiserror::Error;

use crate::errors::McpError;

pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier, echoed back to the caller exactly as received.
///
/// An omitted identifier is modelled one level up as `Option::None`, so the
/// three wire states (absent, `null`, value) stay distinguishable. Numbers
/// keep their original token text so `1e2` or 20-digit ids come back unchanged.
#[derive(Debug, Clone)]
pub enum RequestId {
    Null,
    Number(Box<RawValue>),
    String(String),
}

impl RequestId {
    /// Wraps a numeric token, rejecting text that is not a single JSON number.
    pub fn number(token: &str) -> Option<Self> {
        let raw = RawValue::from_string(token.to_string()).ok()?;
        is_number_token(raw.get()).then_some(Self::Number(raw))
    }
}

fn is_number_token(text: &str) -> bool {
    text.starts_with(|first: char| first == '-' || first.is_ascii_digit())
}

impl PartialEq for RequestId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Number(left), Self::Number(right)) => left.get() == right.get(),
            (Self::String(left), Self::String(right)) => left == right,
            _ => false,
        }
    }
}

impl Serialize for RequestId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Number(raw) => raw.serialize(serializer),
            Self::String(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = raw.get();

        if text == "null" {
            Ok(Self::Null)
        } else if text.starts_with('"') {
            serde_json::from_str(text)
                .map(Self::String)
                .map_err(de::Error::custom)
        } else if is_number_token(text) {
            Ok(Self::Number(raw))
        } else {
            Err(de::Error::custom(
                "request id must be a string, a number or null",
            ))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub jsonrpc: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_present_id")]
    pub id: Option<RequestId>,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub params: Option<Box<RawValue>>,
}

impl Request {
    pub fn params(&self) -> Option<&RawValue> {
        self.params.as_deref()
    }
}

// A present `null` must decode to `Some(RequestId::Null)`, not `None`.
fn deserialize_present_id<'de, D>(deserializer: D) -> Result<Option<RequestId>, D::Error>
where
    D: Deserializer<'de>,
{
    RequestId::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(ErrorObject),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Response {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn failure(id: Option<RequestId>, error: ErrorObject) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Error(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("request body is empty")]
    Empty,
    #[error("request is not a JSON object")]
    NotAnObject,
    #[error("malformed request: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<DecodeError> for McpError {
    fn from(err: DecodeError) -> Self {
        McpError::parse(err.to_string())
    }
}

pub fn decode(bytes: &[u8]) -> Result<Request, DecodeError> {
    match bytes.iter().find(|byte| !byte.is_ascii_whitespace()) {
        None => return Err(DecodeError::Empty),
        Some(b'{') => {}
        Some(_) => return Err(DecodeError::NotAnObject),
    }

    Ok(serde_json::from_slice(bytes)?)
}

pub fn encode(response: &Response) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(response)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_integer_and_string_ids() {
        let request = decode(br#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#).expect("decode");
        assert_eq!(request.id, RequestId::number("7"));
        assert_eq!(request.method, "ping");

        let request =
            decode(br#"{"jsonrpc":"2.0","id":"abc","method":"ping"}"#).expect("decode");
        assert_eq!(request.id, Some(RequestId::String("abc".to_string())));
    }

    #[test]
    fn distinguishes_null_id_from_absent_id() {
        let request = decode(br#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).expect("decode");
        assert_eq!(request.id, Some(RequestId::Null));

        let request = decode(br#"{"jsonrpc":"2.0","method":"ping"}"#).expect("decode");
        assert_eq!(request.id, None);
    }

    #[test]
    fn tolerates_missing_version_and_params() {
        let request = decode(br#"{"id":1,"method":"tools/list"}"#).expect("decode");
        assert!(request.jsonrpc.is_none());
        assert!(request.params().is_none());

        let request =
            decode(br#"{"jsonrpc":"1.0","id":1,"method":"ping","params":null}"#).expect("decode");
        assert_eq!(request.jsonrpc, Some(json!("1.0")));
        assert!(request.params().is_none());
    }

    #[test]
    fn keeps_params_unparsed() {
        let request = decode(br#"{"id":1,"method":"tools/call","params":{"name":"x","n":[1, 2]}}"#)
            .expect("decode");
        assert_eq!(
            request.params().map(RawValue::get),
            Some(r#"{"name":"x","n":[1, 2]}"#)
        );
    }

    #[test]
    fn missing_method_decodes_as_empty_name() {
        let request = decode(br#"{"jsonrpc":"2.0","id":9}"#).expect("decode");
        assert_eq!(request.method, "");
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(matches!(decode(b""), Err(DecodeError::Empty)));
        assert!(matches!(decode(b"  \n"), Err(DecodeError::Empty)));
        assert!(matches!(decode(b"[1,2]"), Err(DecodeError::NotAnObject)));
        assert!(matches!(decode(b"\"ping\""), Err(DecodeError::NotAnObject)));
        assert!(matches!(
            decode(br#"{"jsonrpc":"2.0","id":1,"meth"#),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            decode(br#"{"jsonrpc":"2.0","id":{"a":1},"method":"ping"}"#),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_boolean_ids_and_builds_only_numeric_tokens() {
        assert!(matches!(
            decode(br#"{"jsonrpc":"2.0","id":true,"method":"ping"}"#),
            Err(DecodeError::Malformed(_))
        ));
        assert!(RequestId::number("\"7\"").is_none());
        assert!(RequestId::number("not a number").is_none());
        assert_ne!(RequestId::number("100"), RequestId::number("1e2"));
    }

    #[test]
    fn encodes_success_with_fields_in_wire_order() {
        let response = Response::success(RequestId::number("1"), json!({}));
        let bytes = encode(&response).expect("encode");
        assert_eq!(bytes, br#"{"jsonrpc":"2.0","id":1,"result":{}}"#);
    }

    #[test]
    fn encodes_error_without_result_and_with_null_id() {
        let response = Response::failure(
            Some(RequestId::Null),
            ErrorObject {
                code: -32700,
                message: "Parse error".to_string(),
                data: None,
            },
        );
        let bytes = encode(&response).expect("encode");
        assert_eq!(
            bytes,
            br#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"Parse error"}}"#
        );
    }

    #[test]
    fn absent_id_stays_absent_on_the_wire() {
        let response = Response::success(None, json!({}));
        let bytes = encode(&response).expect("encode");
        assert_eq!(bytes, br#"{"jsonrpc":"2.0","result":{}}"#);
    }

    #[test]
    fn echoes_unusual_numeric_ids_verbatim() {
        for raw in [
            "18446744073709551615",
            "18446744073709551616",
            "-9223372036854775809",
            "-42",
            "-0",
            "1.5",
            "1e2",
            "0.1e1",
            "123456789012345678901234567890",
        ] {
            let payload = format!(r#"{{"jsonrpc":"2.0","id":{raw},"method":"ping"}}"#);
            let request = decode(payload.as_bytes()).expect("decode");
            let response = Response::success(request.id, json!({}));
            let encoded = String::from_utf8(encode(&response).expect("encode")).expect("utf8");
            assert_eq!(encoded, format!(r#"{{"jsonrpc":"2.0","id":{raw},"result":{{}}}}"#));
        }
    }
}

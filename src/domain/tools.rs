//! Interactive tools exposed via Model Context Protocol
//!
//! The tool set is fixed at build time. `tools/call` looks the requested name up
//! in a static dispatch table and returns that tool's deterministic text result.

use rust_mcp_sdk::{
    macros,
    schema::{
        CallToolRequestParams, CallToolResult, ContentBlock, ListToolsResult, TextContent, Tool,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::McpError;
use crate::mcp::server::{parse_params, RequestContext};

pub const LIST_INDIAN_STORES: &str = "list_indian_stores";
pub const INDIAN_STORES: &str =
    "Flipkart, Amazon India, Reliance Digital, Myntra, Snapdeal, Tata CLiQ";

#[macros::mcp_tool(
    name = "list_indian_stores",
    description = "List popular Indian online stores"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ListIndianStoresTool {}

type ToolFn = fn(&Map<String, Value>) -> CallToolResult;

struct ToolRoute {
    name: &'static str,
    run: ToolFn,
}

const TOOL_ROUTES: &[ToolRoute] = &[ToolRoute {
    name: LIST_INDIAN_STORES,
    run: list_indian_stores,
}];

pub fn build_tools_list() -> Vec<Tool> {
    vec![ListIndianStoresTool::tool()]
}

// Arguments are accepted but do not influence the listing.
fn list_indian_stores(_arguments: &Map<String, Value>) -> CallToolResult {
    text_result(INDIAN_STORES)
}

fn text_result(text: &str) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(
            text.to_string(),
            None,
            None,
        ))],
        is_error: Some(false),
        meta: None,
        structured_content: None,
    }
}

pub fn handle_tools_list(_ctx: &RequestContext<'_>) -> Result<Value, McpError> {
    serde_json::to_value(ListToolsResult {
        meta: None,
        next_cursor: None,
        tools: build_tools_list(),
    })
    .map_err(|err| McpError::internal(format!("tools list result serialization: {err}")))
}

pub fn handle_tools_call(ctx: &RequestContext<'_>) -> Result<Value, McpError> {
    let tool_call: CallToolRequestParams = parse_params("tools/call", ctx.params)?;

    let route = TOOL_ROUTES
        .iter()
        .find(|route| route.name == tool_call.name)
        .ok_or_else(|| McpError::unknown_tool(tool_call.name.as_str()))?;

    let arguments = tool_call.arguments.unwrap_or_default();
    serde_json::to_value((route.run)(&arguments))
        .map_err(|err| McpError::internal(format!("{} tool result serialization: {err}", route.name)))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, value::RawValue};

    use super::*;
    use crate::mcp::session::Session;

    fn call(params: Option<&str>) -> Result<Value, McpError> {
        let session = Session::new();
        let raw = params.map(|text| RawValue::from_string(text.to_string()).expect("raw json"));
        let ctx = RequestContext {
            session: &session,
            params: raw.as_deref(),
        };
        handle_tools_call(&ctx)
    }

    #[test]
    fn lists_exactly_one_tool() {
        let tools = build_tools_list();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, LIST_INDIAN_STORES);
    }

    #[test]
    fn tools_list_result_has_object_input_schema() {
        let session = Session::new();
        let ctx = RequestContext {
            session: &session,
            params: None,
        };
        let result = handle_tools_list(&ctx).expect("tools list");

        assert_eq!(result["tools"][0]["name"], LIST_INDIAN_STORES);
        assert_eq!(
            result["tools"][0]["description"],
            "List popular Indian online stores"
        );
        assert_eq!(result["tools"][0]["inputSchema"]["type"], "object");
    }

    #[test]
    fn known_tool_returns_fixed_text_block() {
        let result = call(Some(r#"{"name":"list_indian_stores"}"#)).expect("tool result");

        assert_eq!(result["content"].as_array().map(Vec::len), Some(1));
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], INDIAN_STORES);
        assert_eq!(result["isError"], json!(false));
    }

    #[test]
    fn arguments_do_not_change_output() {
        let plain = call(Some(r#"{"name":"list_indian_stores"}"#)).expect("tool result");
        let with_args = call(Some(
            r#"{"name":"list_indian_stores","arguments":{"category":"fashion","limit":2}}"#,
        ))
        .expect("tool result");

        assert_eq!(plain, with_args);
    }

    #[test]
    fn unknown_tool_reports_name() {
        let error = call(Some(r#"{"name":"bogus"}"#)).expect_err("unknown tool");
        assert_eq!(error, McpError::unknown_tool("bogus"));
    }

    #[test]
    fn tool_names_are_case_sensitive() {
        let error = call(Some(r#"{"name":"List_Indian_Stores"}"#)).expect_err("unknown tool");
        assert!(matches!(error, McpError::UnknownTool { .. }));
    }

    #[test]
    fn malformed_params_are_invalid() {
        for params in [
            None,
            Some(r#"{}"#),
            Some(r#"{"name":42}"#),
            Some(r#"{"name":"list_indian_stores","arguments":"not-an-object"}"#),
            Some(r#""list_indian_stores""#),
            Some(r#"["list_indian_stores",{}]"#),
        ] {
            let error = call(params).expect_err("invalid params");
            assert!(
                matches!(error, McpError::InvalidParams { .. }),
                "unexpected error for {params:?}: {error:?}"
            );
        }
    }
}

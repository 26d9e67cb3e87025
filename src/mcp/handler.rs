//! MCP method dispatch
//!
//! Transport-independent: takes one decoded message and produces at most
//! one response.

use super::protocol::{
    JsonRpcRequest, JsonRpcResponse, McpToolDef, ToolAnnotations, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tubekit_core::ShutdownController;
use tubekit_tools::ToolRegistry;

/// Dispatches MCP requests to the tool registry
pub struct McpHandler {
    registry: Arc<ToolRegistry>,
    shutdown: Arc<ShutdownController>,
}

impl McpHandler {
    pub fn new(registry: Arc<ToolRegistry>, shutdown: Arc<ShutdownController>) -> Self {
        Self { registry, shutdown }
    }

    /// Decode and handle one raw message.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                return Some(JsonRpcResponse::err(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ))
            }
        };

        let id = value.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::err(
                id,
                INVALID_REQUEST,
                format!("Invalid request: {e}"),
            )),
        }
    }

    /// Handle a decoded request. Notifications yield `None`.
    pub async fn handle_request(&self, req: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %req.method, "MCP request");

        if req.is_notification() {
            if req.method == "notifications/initialized" {
                info!("MCP client initialized");
            }
            return None;
        }

        let response = match req.method.as_str() {
            "initialize" => self.handle_initialize(req.id, &req.params),
            "ping" => JsonRpcResponse::ok(req.id, json!({})),
            "tools/list" => self.handle_tools_list(req.id),
            "tools/call" => self.handle_tools_call(req.id, req.params).await,
            "prompts/list" => JsonRpcResponse::ok(req.id, json!({ "prompts": [] })),
            "resources/list" => JsonRpcResponse::ok(req.id, json!({ "resources": [] })),
            _ => JsonRpcResponse::err(
                req.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", req.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION);

        JsonRpcResponse::ok(
            id,
            json!({
                "protocolVersion": version,
                "capabilities": {
                    "tools": { "listChanged": false }
                },
                "serverInfo": {
                    "name": "tubekit",
                    "version": env!("CARGO_PKG_VERSION"),
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools: Vec<McpToolDef> = self
            .registry
            .list_definitions()
            .into_iter()
            .map(|def| McpToolDef {
                name: def.name.clone(),
                description: def.description.clone(),
                input_schema: def.parameters.clone(),
                annotations: ToolAnnotations {
                    read_only_hint: def.risk_level.is_read_only(),
                    destructive_hint: def.risk_level.is_destructive(),
                },
            })
            .collect();

        JsonRpcResponse::ok(id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::err(id, INVALID_PARAMS, "Missing 'name' parameter");
        };
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let _guard = self.shutdown.register_task();
        match self.registry.execute(name, arguments).await {
            Ok(result) => JsonRpcResponse::ok(id, text_content(&result.output, false)),
            Err(e) => {
                let message = e.to_string();
                warn!(tool = %name, error = %message, "Tool call failed");
                JsonRpcResponse::ok(id, text_content(&json!({ "error": message }), true))
            }
        }
    }
}

fn text_content(value: &Value, is_error: bool) -> Value {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    let mut result = json!({
        "content": [{ "type": "text", "text": text }]
    });
    if is_error {
        result["isError"] = Value::Bool(true);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubekit_tools::{RiskLevel, Tool, ToolDefinition, ToolResult};

    struct ShoutTool {
        definition: ToolDefinition,
    }

    impl ShoutTool {
        fn new() -> Self {
            Self {
                definition: ToolDefinition::new("shout", "Upper-case the input")
                    .with_parameters(json!({
                        "type": "object",
                        "properties": {"text": {"type": "string"}},
                        "required": ["text"]
                    }))
                    .with_risk_level(RiskLevel::High),
            }
        }
    }

    #[async_trait::async_trait]
    impl Tool for ShoutTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, input: Value) -> tubekit_tools::Result<ToolResult> {
            match input.get("text").and_then(Value::as_str) {
                Some(text) => Ok(ToolResult::success(json!({"text": text.to_uppercase()}), 0)),
                None => Err(tubekit_tools::Error::InvalidInput(
                    "text is required".to_string(),
                )),
            }
        }
    }

    fn handler() -> McpHandler {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(ShoutTool::new()));
        McpHandler::new(Arc::new(registry), ShutdownController::new())
    }

    async fn call(handler: &McpHandler, raw: &str) -> JsonRpcResponse {
        handler.handle_message(raw).await.expect("response")
    }

    #[tokio::test]
    async fn test_initialize() {
        let resp = call(
            &handler(),
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        )
        .await;
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "tubekit");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_initialize_echoes_client_version() {
        let resp = call(
            &handler(),
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26"}}"#,
        )
        .await;
        assert_eq!(resp.result.unwrap()["protocolVersion"], "2025-03-26");
    }

    #[tokio::test]
    async fn test_ping() {
        let resp = call(&handler(), r#"{"jsonrpc":"2.0","id":"p","method":"ping"}"#).await;
        assert_eq!(resp.id, Some(json!("p")));
        assert_eq!(resp.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let handler = handler();
        let resp = handler
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(resp.is_none());
        let resp = handler
            .handle_message(r#"{"jsonrpc":"2.0","method":"tools/list"}"#)
            .await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let resp = call(&handler(), r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).await;
        let result = resp.result.unwrap();
        let tool = &result["tools"][0];
        assert_eq!(tool["name"], "shout");
        assert_eq!(tool["inputSchema"]["required"][0], "text");
        assert_eq!(tool["annotations"]["readOnlyHint"], false);
        assert_eq!(tool["annotations"]["destructiveHint"], true);
    }

    #[tokio::test]
    async fn test_tools_call_success() {
        let resp = call(
            &handler(),
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"shout","arguments":{"text":"hi"}}}"#,
        )
        .await;
        let result = resp.result.unwrap();
        assert!(result.get("isError").is_none());
        assert_eq!(result["content"][0]["type"], "text");
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["text"], "HI");
    }

    #[tokio::test]
    async fn test_tools_call_error_is_reported_in_result() {
        let resp = call(
            &handler(),
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"shout","arguments":{}}}"#,
        )
        .await;
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        let payload: Value =
            serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(payload["error"], "invalid input: text is required");
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let resp = call(
            &handler(),
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"nope"}}"#,
        )
        .await;
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Unknown tool: nope"));
    }

    #[tokio::test]
    async fn test_tools_call_without_name() {
        let resp = call(
            &handler(),
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{}}"#,
        )
        .await;
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let resp = call(&handler(), r#"{"jsonrpc":"2.0","id":7,"method":"nonexistent"}"#).await;
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_parse_error() {
        let resp = call(&handler(), "{not json").await;
        assert!(resp.id.is_none());
        assert_eq!(resp.error.unwrap().code, PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_request_without_method() {
        let resp = call(&handler(), r#"{"jsonrpc":"2.0","id":8}"#).await;
        assert_eq!(resp.id, Some(json!(8)));
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_prompts_and_resources_are_empty() {
        let handler = handler();
        let prompts = call(&handler, r#"{"jsonrpc":"2.0","id":9,"method":"prompts/list"}"#).await;
        assert_eq!(prompts.result.unwrap()["prompts"], json!([]));
        let resources =
            call(&handler, r#"{"jsonrpc":"2.0","id":10,"method":"resources/list"}"#).await;
        assert_eq!(resources.result.unwrap()["resources"], json!([]));
    }
}

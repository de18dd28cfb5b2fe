//! MCP message handling on top of the tool registry.
//!
//! Transport-agnostic: both the stdio and HTTP transports hand raw messages
//! to [`McpServer::handle_line`] and write back whatever it returns.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use hipaa_guardian_config::AppConfig;
use hipaa_guardian_core::error::ToolError;
use hipaa_guardian_core::knowledge::{KnowledgeStore, REQUIRED_KEYS};
use hipaa_guardian_core::tool::{ToolCall, ToolRegistry};

use crate::jsonrpc::{JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse, ProtocolError};

/// Protocol revisions this server speaks, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2025-06-18", "2025-03-26", "2024-11-05"];

/// Identity reported in the `initialize` response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

pub struct McpServer {
    info: ServerInfo,
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(info: ServerInfo, registry: Arc<ToolRegistry>) -> Self {
        Self { info, registry }
    }

    /// Load the knowledge base named by `config` and build the full catalog.
    ///
    /// A knowledge base that cannot be read or parsed is fatal.
    pub fn from_config(config: &AppConfig) -> hipaa_guardian_core::Result<Self> {
        let store = KnowledgeStore::load(&config.knowledge.path)?;

        let missing = store.missing_keys(&REQUIRED_KEYS);
        if !missing.is_empty() {
            warn!(
                path = %config.knowledge.path.display(),
                missing = ?missing,
                "Knowledge base is missing sections; the matching tools will fail"
            );
        }

        let registry = hipaa_guardian_tools::default_registry(Arc::new(store))?;
        info!(
            sections = REQUIRED_KEYS.len() - missing.len(),
            tools = registry.len(),
            "Compliance tools defined"
        );

        Ok(Self::new(
            ServerInfo {
                name: config.server.name.clone(),
                version: config.server.version.clone(),
            },
            Arc::new(registry),
        ))
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one raw message. Returns the serialized response, or `None`
    /// when the message was a notification.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<Value>(line) {
            Ok(message) => self.handle_message(message).await?,
            Err(e) => {
                debug!(error = %e, "Unparseable message");
                JsonRpcResponse::failure(Value::Null, ProtocolError::Parse(e.to_string()).into())
            }
        };

        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(error = %e, "Failed to serialize response");
                None
            }
        }
    }

    /// Handle one decoded message.
    pub async fn handle_message(&self, message: Value) -> Option<JsonRpcResponse> {
        if message.is_array() {
            return Some(JsonRpcResponse::failure(
                Value::Null,
                ProtocolError::InvalidRequest("batch requests are not supported".into()).into(),
            ));
        }

        let fallback_id = message.get("id").cloned().unwrap_or(Value::Null);
        // `"id": null` deserializes like a missing id; it must not pass as a notification.
        let null_id = matches!(message.get("id"), Some(Value::Null));
        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    fallback_id,
                    ProtocolError::InvalidRequest(e.to_string()).into(),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                request.id.unwrap_or(Value::Null),
                ProtocolError::InvalidRequest(format!(
                    "unsupported jsonrpc version \"{}\"",
                    request.jsonrpc
                ))
                .into(),
            ));
        }

        if null_id {
            return Some(JsonRpcResponse::failure(
                Value::Null,
                ProtocolError::InvalidRequest("id must not be null".into()).into(),
            ));
        }

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return None;
        };

        let response = match self.handle_request(&request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::failure(id, err.into()),
        };
        Some(response)
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => info!("Client initialized"),
            "notifications/cancelled" => debug!("Client cancelled a request"),
            other => debug!(method = %other, "Ignoring notification"),
        }
    }

    async fn handle_request(&self, request: &JsonRpcRequest) -> Result<Value, ProtocolError> {
        debug!(method = %request.method, "Handling request");
        match request.method.as_str() {
            "initialize" => Ok(self.initialize(&request.params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.registry.definitions() })),
            "tools/call" => self.call_tool(&request.params).await,
            other => Err(ProtocolError::MethodNotFound(other.to_string())),
        }
    }

    fn initialize(&self, params: &Value) -> Value {
        let requested = params.get("protocolVersion").and_then(Value::as_str);
        let version = requested
            .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.iter().any(|s| s == v))
            .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0]);

        if let Some(client) = params.get("clientInfo") {
            info!(client = %client, protocol = %version, "Client connected");
        }

        json!({
            "protocolVersion": version,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": self.info,
        })
    }

    async fn call_tool(&self, params: &Value) -> Result<Value, ProtocolError> {
        let call: ToolCall = serde_json::from_value(params.clone())
            .map_err(|e| ProtocolError::invalid_params(format!("invalid tools/call params: {e}")))?;

        match self.registry.dispatch(&call).await {
            Ok(result) => serde_json::to_value(result)
                .map_err(|e| ProtocolError::Internal(e.to_string())),
            Err(ToolError::NotFound(name)) => Err(ProtocolError::invalid_params(format!(
                "Tool {name} not found"
            ))),
            Err(ToolError::InvalidArguments {
                tool_name,
                violations,
            }) => {
                let details = violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(ProtocolError::InvalidParams {
                    message: format!("Invalid arguments for tool {tool_name}: {details}"),
                    data: Some(json!({ "violations": violations })),
                })
            }
            Err(ToolError::ExecutionFailed { tool_name, .. }) => Ok(json!({
                "content": [{
                    "type": "text",
                    "text": format!("Internal error while running tool {tool_name}")
                }],
                "isError": true
            })),
            Err(err @ ToolError::Duplicate(_)) => Err(ProtocolError::Internal(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonrpc::{INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};

    fn test_server() -> McpServer {
        let store = KnowledgeStore::from_sections(
            REQUIRED_KEYS
                .iter()
                .filter(|k| **k != "hipaa_fines")
                .map(|k| (*k, format!("Section {k}"))),
        );
        let registry = hipaa_guardian_tools::default_registry(Arc::new(store)).unwrap();
        McpServer::new(
            ServerInfo {
                name: "HIPAA Compliance Guardian".into(),
                version: "2.3.0".into(),
            },
            Arc::new(registry),
        )
    }

    async fn roundtrip(server: &McpServer, message: Value) -> JsonRpcResponse {
        let line = server.handle_line(&message.to_string()).await.unwrap();
        serde_json::from_str(&line).unwrap()
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let server = test_server();
        let resp = roundtrip(
            &server,
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "inspector", "version": "0.1"}
                }
            }),
        )
        .await;
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "HIPAA Compliance Guardian");
        assert_eq!(result["serverInfo"]["version"], "2.3.0");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn unknown_protocol_version_gets_latest() {
        let server = test_server();
        let resp = roundtrip(
            &server,
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize",
                   "params": {"protocolVersion": "1999-01-01"}}),
        )
        .await;
        assert_eq!(
            resp.result.unwrap()["protocolVersion"],
            SUPPORTED_PROTOCOL_VERSIONS[0]
        );
    }

    #[tokio::test]
    async fn tools_list_enumerates_catalog() {
        let server = test_server();
        let resp = roundtrip(
            &server,
            json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"}),
        )
        .await;
        assert_eq!(resp.id, json!("a"));
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 15);
        assert_eq!(tools[0]["name"], "evaluateComplianceNeed");
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[tokio::test]
    async fn tools_call_returns_content() {
        let server = test_server();
        let resp = roundtrip(
            &server,
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
                   "params": {"name": "getComplianceRoadmap", "arguments": {}}}),
        )
        .await;
        assert_eq!(
            resp.result.unwrap(),
            json!({"content": [{"type": "text", "text": "Section becoming_hipaa_compliant"}]})
        );
    }

    #[tokio::test]
    async fn tools_call_without_arguments_member() {
        let server = test_server();
        let resp = roundtrip(
            &server,
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
                   "params": {"name": "getApiSecurityChecklist"}}),
        )
        .await;
        assert!(resp.error.is_none());
    }

    #[tokio::test]
    async fn unknown_tool_is_invalid_params() {
        let server = test_server();
        let resp = roundtrip(
            &server,
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
                   "params": {"name": "getHipaaCertificate", "arguments": {}}}),
        )
        .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, INVALID_PARAMS);
        assert!(err.message.contains("getHipaaCertificate"));
    }

    #[tokio::test]
    async fn invalid_arguments_report_fields() {
        let server = test_server();
        let resp = roundtrip(
            &server,
            json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
                   "params": {"name": "getVendorVettingChecklist", "arguments": {}}}),
        )
        .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, INVALID_PARAMS);
        assert_eq!(err.data.unwrap()["violations"][0]["field"], "vendorName");
    }

    #[tokio::test]
    async fn handler_failure_is_tool_error_result() {
        let server = test_server();
        let resp = roundtrip(
            &server,
            json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call",
                   "params": {"name": "getPenaltyInformation", "arguments": {}}}),
        )
        .await;
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("getPenaltyInformation"));
        assert!(!text.contains("hipaa_fines"));
    }

    #[tokio::test]
    async fn unknown_method() {
        let server = test_server();
        let resp = roundtrip(
            &server,
            json!({"jsonrpc": "2.0", "id": 6, "method": "resources/list"}),
        )
        .await;
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn ping_returns_empty_object() {
        let server = test_server();
        let resp = roundtrip(&server, json!({"jsonrpc": "2.0", "id": 7, "method": "ping"})).await;
        assert_eq!(resp.result.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let server = test_server();
        let out = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let server = test_server();
        let line = server.handle_line("{not json").await.unwrap();
        let resp: JsonRpcResponse = serde_json::from_str(&line).unwrap();
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.error.unwrap().code, PARSE_ERROR);
    }

    #[tokio::test]
    async fn wrong_version_and_batches_are_invalid_requests() {
        let server = test_server();
        let resp = roundtrip(&server, json!({"jsonrpc": "1.0", "id": 8, "method": "ping"})).await;
        assert_eq!(resp.id, json!(8));
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);

        let resp = roundtrip(&server, json!([{"jsonrpc": "2.0", "id": 9, "method": "ping"}])).await;
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);

        let resp = roundtrip(&server, json!({"jsonrpc": "2.0", "id": 10})).await;
        assert_eq!(resp.id, json!(10));
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }

    #[tokio::test]
    async fn null_id_is_invalid_request_not_notification() {
        let server = test_server();
        let line = server
            .handle_line(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .await
            .unwrap();
        let resp: JsonRpcResponse = serde_json::from_str(&line).unwrap();
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn from_config_fails_without_knowledge_base() {
        let mut config = AppConfig::default();
        config.knowledge.path = "/nonexistent/hipaa-content.json".into();
        let err = McpServer::from_config(&config).err().unwrap();
        assert!(matches!(err, hipaa_guardian_core::Error::Knowledge(_)));
    }
}

//! MCP Service - Core JSON-RPC 2.0 request handler.

use crate::mcp::rpc::{OutboundResponse, RpcRequest};
use crate::mcp::tools::{ToolDescriptor, ToolRegistry};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "news_api";

/// Core MCP request handler, shared by every transport.
#[derive(Clone)]
pub struct McpService {
    registry: Arc<ToolRegistry>,
}

impl McpService {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Returns `None` for notifications.
    pub async fn handle_request(&self, request: RpcRequest) -> Option<OutboundResponse> {
        let RpcRequest {
            jsonrpc,
            method,
            params,
            id,
        } = request;

        if id.is_none() {
            if jsonrpc != "2.0" {
                warn!("ignoring notification with jsonrpc version {}: {}", jsonrpc, method);
            } else {
                info!("received client notification: {}", method);
            }
            return None;
        }

        if jsonrpc != "2.0" {
            warn!("received unsupported jsonrpc version: {}", jsonrpc);
            return Some(OutboundResponse::invalid_request(
                id,
                "Unsupported jsonrpc version (expected 2.0)",
            ));
        }

        let response = match method.as_str() {
            "initialize" => self.handle_initialize(id, params),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, params).await,
            "ping" => OutboundResponse::success(id, json!({})),
            other => OutboundResponse::method_not_found(id, other),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> OutboundResponse {
        let parsed: InitializeParams = match parse_params(params) {
            Ok(value) => value,
            Err(message) => return OutboundResponse::invalid_params(id, message),
        };

        info!(
            "client requested initialization: {} v{} (protocol {})",
            parsed.client_info.name,
            parsed
                .client_info
                .version
                .clone()
                .unwrap_or_else(|| "unknown".into()),
            parsed.protocol_version
        );

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ImplementationInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
        };

        to_response(id, &result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> OutboundResponse {
        let payload = ListToolsResult {
            tools: self.registry.list_tools(),
        };
        to_response(id, &payload)
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> OutboundResponse {
        let parsed: CallToolParams = match parse_params(params) {
            Ok(value) => value,
            Err(message) => return OutboundResponse::invalid_params(id, message),
        };

        info!("calling tool '{}'", parsed.name);
        let result = self.registry.call_tool(&parsed.name, parsed.arguments).await;
        to_response(id, &result)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct InitializeParams {
    #[serde(rename = "protocolVersion", default = "default_protocol_version")]
    protocol_version: String,
    #[serde(rename = "clientInfo", default)]
    client_info: ClientInfo,
}

fn default_protocol_version() -> String {
    PROTOCOL_VERSION.to_string()
}

#[derive(Debug, Deserialize)]
struct ClientInfo {
    name: String,
    #[serde(default)]
    version: Option<String>,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            name: "unknown-client".to_string(),
            version: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    protocol_version: String,
    #[serde(rename = "serverInfo")]
    server_info: ImplementationInfo,
    capabilities: ServerCapabilities,
}

#[derive(Debug, Serialize)]
struct ImplementationInfo {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct ServerCapabilities {
    tools: ToolsCapability,
}

#[derive(Debug, Serialize)]
struct ToolsCapability {
    #[serde(rename = "listChanged")]
    list_changed: bool,
}

#[derive(Debug, Serialize)]
struct ListToolsResult {
    tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    let value = match params {
        Some(Value::Null) | None => json!({}),
        Some(value) => value,
    };
    serde_json::from_value(value).map_err(|err| format!("Invalid params: {}", err))
}

fn to_response<T: Serialize>(id: Option<Value>, payload: &T) -> OutboundResponse {
    match serde_json::to_value(payload) {
        Ok(value) => OutboundResponse::success(id, value),
        Err(err) => OutboundResponse::error(id, -32603, format!("Internal error: {}", err)),
    }
}

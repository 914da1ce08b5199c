//! JSON-RPC dispatcher for the MCP methods.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::access::{AccessError, AccessGuard};
use crate::cache::ContentCache;
use crate::config::Config;
use crate::models::jsonrpc::JSONRPC_VERSION;
use crate::models::{
    CallToolParams, InitializeResult, ListToolsResult, Request, Response, RpcError,
};
use crate::tools::ToolContext;

const SERVER_NAME: &str = env!("CARGO_PKG_NAME");
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// == MCP Server ==
/// Routes JSON-RPC messages to the MCP method handlers. Transport agnostic:
/// stdio and HTTP both feed it raw message text.
#[derive(Clone)]
pub struct McpServer {
    tools: ToolContext,
}

impl McpServer {
    pub fn new(tools: ToolContext) -> Self {
        Self { tools }
    }

    /// Builds the cache and access guard described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, AccessError> {
        let guard = AccessGuard::new(config.roots.iter().cloned(), &config.blocked_patterns)?;
        let cache = ContentCache::new(config.cache_size, config.cache_ttl);
        Ok(Self::new(ToolContext::new(Arc::new(cache), Arc::new(guard))))
    }

    pub fn tools(&self) -> &ToolContext {
        &self.tools
    }

    /// Handles one raw message. Returns `None` for notifications.
    pub async fn handle_message(&self, raw: &str) -> Option<Response> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => self.handle_value(value).await,
            Err(e) => {
                debug!(error = %e, "unparseable message");
                Some(Response::error(Value::Null, RpcError::parse_error(e.to_string())))
            }
        }
    }

    /// Handles an already parsed message.
    pub async fn handle_value(&self, value: Value) -> Option<Response> {
        if value.is_array() {
            return Some(Response::error(
                Value::Null,
                RpcError::invalid_request("batch requests are not supported"),
            ));
        }

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => return Some(Response::error(id, RpcError::invalid_request(e.to_string()))),
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(Response::error(
                id,
                RpcError::invalid_request(format!("unsupported jsonrpc version {:?}", request.jsonrpc)),
            ));
        }

        self.handle_request(request).await
    }

    pub async fn handle_request(&self, request: Request) -> Option<Response> {
        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        debug!(method = %request.method, "request");

        let outcome = match request.method.as_str() {
            "initialize" => {
                info!("client initializing");
                encode(InitializeResult::new(SERVER_NAME, SERVER_VERSION))
            }
            "ping" => Ok(json!({})),
            "tools/list" => encode(ListToolsResult {
                tools: self.tools.tools(),
            }),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(RpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => Response::success(id, result),
            Err(error) => Response::error(id, error),
        })
    }

    fn handle_notification(&self, request: &Request) {
        match request.method.as_str() {
            "notifications/initialized" => info!("client initialized"),
            "notifications/cancelled" => debug!(params = ?request.params, "request cancelled"),
            other => debug!(method = other, "ignoring notification"),
        }
    }

    /// Runs the tool on the blocking pool; filesystem work never holds up the runtime.
    async fn call_tool(&self, params: Option<Value>) -> Result<Value, RpcError> {
        let params: CallToolParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|e| RpcError::invalid_params(format!("invalid tools/call params: {}", e)))?;

        let tools = self.tools.clone();
        let result = tokio::task::spawn_blocking(move || {
            let arguments = params.arguments.unwrap_or_default();
            tools.call(&params.name, &arguments)
        })
        .await
        .map_err(|e| RpcError::internal(format!("tool task failed: {}", e)))?;

        encode(result)
    }
}

fn encode<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal(e.to_string()))
}

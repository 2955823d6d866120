#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use newsapi_mcp_server::mcp::rpc::RpcRequest;
use newsapi_mcp_server::mcp::tools::ToolRegistry;
use newsapi_mcp_server::mcp::McpService;
use newsapi_mcp_server::news::client::check_status;
use newsapi_mcp_server::news::{NewsApi, ToolError, UpstreamQuery};

pub const FAKE_API_KEY: &str = "fake-key-42";

/// In-process upstream that replays one canned outcome and records queries.
pub struct FakeNewsApi {
    outcome: Result<Value, ToolError>,
    calls: Mutex<Vec<UpstreamQuery>>,
}

impl FakeNewsApi {
    pub fn body(body: Value) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(body),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: ToolError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(err),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<UpstreamQuery> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl NewsApi for FakeNewsApi {
    async fn fetch(&self, query: &UpstreamQuery) -> Result<Value, ToolError> {
        self.calls.lock().push(query.clone());
        check_status(self.outcome.clone()?, FAKE_API_KEY)
    }
}

/// Upstream that never answers. The flag flips when the call future is dropped.
pub struct HangingNewsApi {
    pub dropped: Arc<AtomicBool>,
}

impl HangingNewsApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            dropped: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn was_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl NewsApi for HangingNewsApi {
    async fn fetch(&self, _query: &UpstreamQuery) -> Result<Value, ToolError> {
        let _guard = DropFlag(self.dropped.clone());
        futures::future::pending::<()>().await;
        unreachable!("pending future resolved")
    }
}

pub fn service_with(api: Arc<dyn NewsApi>) -> McpService {
    McpService::new(ToolRegistry::new(api))
}

pub fn request(id: i64, method: &str, params: Value) -> RpcRequest {
    serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    }))
    .expect("valid request")
}

pub fn call_tool(id: i64, name: &str, arguments: Value) -> RpcRequest {
    request(id, "tools/call", json!({ "name": name, "arguments": arguments }))
}

pub fn article(title: &str) -> Value {
    json!({
        "source": { "id": null, "name": "The Verge" },
        "author": "Sam Writer",
        "title": title,
        "description": format!("Story {}", title),
        "url": format!("https://example.com/{}", title),
        "urlToImage": null,
        "publishedAt": "2025-03-25T14:30:00Z",
        "content": "..."
    })
}

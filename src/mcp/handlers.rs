//! MCP Stateless HTTP Handlers for Actix-Web.
//!
//! Each POST is an independent JSON-RPC exchange. A client disconnect drops
//! the handler future, which aborts any in-flight upstream request.

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::mcp::rpc::{OutboundResponse, RpcRequest};
use crate::mcp::service::McpService;

/// MCP State for Actix-Web (stateless version)
pub struct McpState {
    pub service: McpService,
}

impl McpState {
    pub fn new(service: McpService) -> Self {
        Self { service }
    }
}

/// RPC handler - POST /mcp
pub async fn rpc_handler(state: web::Data<Arc<McpState>>, body: web::Bytes) -> impl Responder {
    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("rejecting unparsable MCP request: {}", err);
            return HttpResponse::Ok().json(OutboundResponse::parse_error(format!(
                "Parse error: {}",
                err
            )));
        }
    };

    let id = value.get("id").cloned();
    let request: RpcRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(err) => {
            return HttpResponse::Ok().json(OutboundResponse::invalid_request(
                id,
                format!("Invalid request: {}", err),
            ))
        }
    };

    log::info!("Received MCP request: {}", request.method);

    if let Some(response) = state.service.handle_request(request).await {
        return HttpResponse::Ok()
            .content_type("application/json")
            .json(response);
    }

    // Notifications return 202 Accepted
    HttpResponse::Accepted().finish()
}

/// Configure MCP routes (stateless)
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/mcp").route(web::post().to(rpc_handler)));
}

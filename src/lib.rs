use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;

pub mod config;
pub mod mcp;
pub mod news;

use crate::config::{NewsApiConfig, ServerConfig, Transport};
use crate::mcp::tools::ToolRegistry;
use crate::mcp::{McpService, McpState};
use crate::news::NewsApiClient;

/// Wires the upstream client into an MCP service.
pub fn build_service(config: NewsApiConfig) -> anyhow::Result<McpService> {
    let client = NewsApiClient::new(config).context("failed to build HTTP client")?;
    Ok(McpService::new(ToolRegistry::new(Arc::new(client))))
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let news_config = NewsApiConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;
    log::info!(
        "news api at {} (timeout {}s)",
        news_config.base_url,
        news_config.timeout.as_secs()
    );

    let service = build_service(news_config)?;

    match server_config.transport {
        Transport::Stdio => {
            log::info!("serving MCP over stdio");
            mcp::stdio::serve_stdio(service).await?;
        }
        Transport::Http(addr) => serve_http(service, addr).await?,
    }

    Ok(())
}

async fn serve_http(service: McpService, addr: SocketAddr) -> anyhow::Result<()> {
    let state = web::Data::new(Arc::new(McpState::new(service)));

    let prometheus = PrometheusMetricsBuilder::new("newsapi_mcp_server")
        .endpoint("/metrics")
        .build()
        .map_err(|err| anyhow::anyhow!("failed to create Prometheus metrics middleware: {}", err))?;

    log::info!("serving MCP over HTTP at http://{}/mcp", addr);

    HttpServer::new(move || {
        App::new()
            .wrap(prometheus.clone())
            .app_data(state.clone())
            .configure(mcp::config)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}

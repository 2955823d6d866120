//! HTTP client for the upstream news service.

use std::error::Error as _;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::NewsApiConfig;

use super::error::ToolError;
use super::models::UpstreamQuery;

/// Seam between the tool registry and the upstream service.
///
/// Implementations perform a single request and return the decoded body only
/// when the upstream reported `status: "ok"`.
#[async_trait]
pub trait NewsApi: Send + Sync {
    async fn fetch(&self, query: &UpstreamQuery) -> Result<Value, ToolError>;
}

pub struct NewsApiClient {
    http: reqwest::Client,
    config: NewsApiConfig,
}

impl NewsApiClient {
    pub fn new(config: NewsApiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &NewsApiConfig {
        &self.config
    }

    fn transport_error(&self, err: reqwest::Error) -> ToolError {
        if err.is_timeout() {
            return ToolError::Timeout {
                secs: self.config.timeout.as_secs(),
            };
        }

        // The request URL carries the API key, strip it before formatting.
        let err = err.without_url();
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        ToolError::Network(redact(&message, &self.config.api_key))
    }
}

#[async_trait]
impl NewsApi for NewsApiClient {
    async fn fetch(&self, query: &UpstreamQuery) -> Result<Value, ToolError> {
        let path = query.endpoint.path();
        let url = format!("{}{}", self.config.base_url, path);
        debug!("news api GET {} with {} params", path, query.params.len());

        let response = self
            .http
            .get(&url)
            .query(&query.params)
            .query(&[("apiKey", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        // Always drain the body so the connection goes back to the pool.
        let body = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;

        info!("news api GET {} -> {}", path, status.as_u16());

        match status {
            StatusCode::UNAUTHORIZED => return Err(ToolError::Auth),
            StatusCode::TOO_MANY_REQUESTS => return Err(ToolError::RateLimited),
            status if !status.is_success() => {
                let err = error_from_body(status, &body, &self.config.api_key);
                warn!("news api GET {} failed: {}", path, err);
                return Err(err);
            }
            _ => {}
        }

        let value: Value = serde_json::from_slice(&body)
            .map_err(|err| ToolError::MalformedResponse(err.to_string()))?;

        check_status(value, &self.config.api_key)
    }
}

/// Accepts a decoded body only when it reports `status: "ok"`.
///
/// Error text taken from the body is flattened and has `api_key` scrubbed.
pub fn check_status(body: Value, api_key: &str) -> Result<Value, ToolError> {
    if !body.is_object() {
        return Err(ToolError::MalformedResponse(
            "expected a JSON object".to_string(),
        ));
    }

    match body.get("status").and_then(Value::as_str) {
        Some("ok") => Ok(body),
        Some(_) => Err(upstream_error(
            &string_field(&body, "code").unwrap_or_else(|| "error".to_string()),
            &string_field(&body, "message").unwrap_or_else(|| "Unknown error".to_string()),
            api_key,
        )),
        None => Err(ToolError::MalformedResponse(
            "response is missing the status field".to_string(),
        )),
    }
}

fn error_from_body(status: StatusCode, body: &[u8], api_key: &str) -> ToolError {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|v| string_field(v, "code"))
        .map(|code| format!("HTTP {} {}", status.as_u16(), code))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    let message = parsed
        .as_ref()
        .and_then(|v| string_field(v, "message"))
        .or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_string()
        });

    upstream_error(&code, &message, api_key)
}

fn upstream_error(code: &str, message: &str, api_key: &str) -> ToolError {
    ToolError::Upstream {
        code: redact(&single_line(code), api_key),
        message: redact(&single_line(message), api_key),
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn redact(text: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        return text.to_string();
    }
    text.replace(api_key, "<redacted>")
}

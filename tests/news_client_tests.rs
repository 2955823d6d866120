//! Upstream client behaviour against a mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newsapi_mcp_server::config::NewsApiConfig;
use newsapi_mcp_server::mcp::tools::ToolRegistry;
use newsapi_mcp_server::news::{Endpoint, NewsApi, NewsApiClient, ToolError, UpstreamQuery};

const API_KEY: &str = "test-key-0123456789";

fn client_for(server: &MockServer) -> NewsApiClient {
    let config = NewsApiConfig::new(API_KEY).with_base_url(server.uri());
    NewsApiClient::new(config).unwrap()
}

fn everything(q: &str) -> UpstreamQuery {
    UpstreamQuery::new(Endpoint::Everything).param("q", q)
}

#[tokio::test]
async fn test_sends_api_key_and_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("apiKey", API_KEY))
        .and(query_param("q", "artificial intelligence"))
        .and(query_param("pageSize", "20"))
        .and(query_param("page", "1"))
        .and(query_param("language", "en"))
        .and(query_param("sortBy", "publishedAt"))
        .and(query_param_is_missing("from"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": { "id": "wired", "name": "Wired" },
                "author": null,
                "title": "Models everywhere",
                "description": "A look at AI",
                "url": "https://wired.com/ai",
                "publishedAt": "2025-03-25T14:30:00Z"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let registry = ToolRegistry::new(Arc::new(client_for(&mock_server)));
    let result = registry
        .call_tool(
            "search-news",
            Some(json!({ "query": "artificial intelligence" })),
        )
        .await;

    assert!(!result.is_error, "{}", result.text());
    let text = result.text();
    assert!(text.starts_with("Search results for 'artificial intelligence' (Found 1 articles):"));
    assert!(text.contains("Source: Wired\nAuthor: Unknown\nPublished: 2025-03-25 14:30 UTC\n"));
    assert!(!text.contains(API_KEY));
}

#[tokio::test]
async fn test_sources_endpoint_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/sources"))
        .and(query_param("category", "science"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "sources": [{
                "id": "new-scientist",
                "name": "New Scientist",
                "description": "Breaking science news",
                "url": "https://www.newscientist.com",
                "category": "science",
                "language": "en",
                "country": "us"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let registry = ToolRegistry::new(Arc::new(client_for(&mock_server)));
    let result = registry
        .call_tool("get-news-sources", Some(json!({ "category": "science" })))
        .await;

    assert!(!result.is_error, "{}", result.text());
    assert!(result
        .text()
        .starts_with("Available news sources for category: science (Found 1 sources):"));
    assert!(result.text().contains("ID: new-scientist\n"));
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid or incorrect."
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(&everything("x")).await.unwrap_err();
    assert_eq!(err, ToolError::Auth);
}

#[tokio::test]
async fn test_too_many_requests_maps_to_rate_limited() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let registry = ToolRegistry::new(Arc::new(client_for(&mock_server)));
    let result = registry
        .call_tool(
            "get-top-headlines",
            Some(json!({ "country": "us", "category": "technology" })),
        )
        .await;

    assert!(result.is_error);
    assert_eq!(
        result.text(),
        "Error: Rate limit exceeded. The News API has a limit of 100 requests per day for the free tier."
    );
}

#[tokio::test]
async fn test_bad_request_surfaces_upstream_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "code": "parametersIncompatible",
            "message": "You cannot mix the sources parameter with the country or category parameters."
        })))
        .mount(&mock_server)
        .await;

    let registry = ToolRegistry::new(Arc::new(client_for(&mock_server)));
    let result = registry
        .call_tool(
            "get-top-headlines",
            Some(json!({ "sources": "bbc-news", "country": "gb" })),
        )
        .await;

    assert!(result.is_error);
    assert_eq!(
        result.text(),
        "Error: News API error (HTTP 400 parametersIncompatible): You cannot mix the sources parameter with the country or category parameters."
    );
}

#[tokio::test]
async fn test_server_error_with_text_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(&everything("x")).await.unwrap_err();
    assert_eq!(
        err,
        ToolError::Upstream {
            code: "HTTP 500".into(),
            message: "internal failure".into()
        }
    );
}

#[tokio::test]
async fn test_ok_status_code_with_error_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "code": "maximumResultsReached",
            "message": "You have requested too many results.",
            "articles": [{ "title": "stray" }]
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(&everything("x")).await.unwrap_err();
    assert!(matches!(err, ToolError::Upstream { ref code, .. } if code == "maximumResultsReached"));
}

#[tokio::test]
async fn test_error_body_never_echoes_api_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": format!("Your API key {} is invalid.\nSee docs.", API_KEY)
        })))
        .mount(&mock_server)
        .await;

    let registry = ToolRegistry::new(Arc::new(client_for(&mock_server)));
    let result = registry
        .call_tool("search-news", Some(json!({ "query": "bitcoin" })))
        .await;

    assert!(result.is_error);
    let text = result.text();
    assert!(!text.contains(API_KEY), "{}", text);
    assert!(!text.contains('\n'), "{}", text);
    assert_eq!(
        text,
        "Error: News API error (apiKeyInvalid): Your API key <redacted> is invalid. See docs."
    );
}

#[tokio::test]
async fn test_undecodable_body_is_malformed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(&everything("x")).await.unwrap_err();
    assert!(matches!(err, ToolError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "ok", "articles": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let config = NewsApiConfig::new(API_KEY)
        .with_base_url(mock_server.uri())
        .with_timeout(Duration::from_secs(1));
    let client = NewsApiClient::new(config).unwrap();

    let err = client.fetch(&everything("x")).await.unwrap_err();
    assert_eq!(err, ToolError::Timeout { secs: 1 });
    assert_eq!(
        err.render(),
        "Error: Request timed out after 1 seconds. The News API may be experiencing delays."
    );
}

#[tokio::test]
async fn test_connection_failure_hides_api_key() {
    // Nothing listens on port 1.
    let config = NewsApiConfig::new(API_KEY).with_base_url("http://127.0.0.1:1");
    let client = NewsApiClient::new(config).unwrap();

    let err = client.fetch(&everything("x")).await.unwrap_err();
    assert!(matches!(err, ToolError::Network(_)), "{:?}", err);
    let rendered = err.render();
    assert!(rendered.starts_with("Error: Failed to connect to News API"));
    assert!(!rendered.contains(API_KEY));
    assert!(!rendered.contains("apiKey"));
}

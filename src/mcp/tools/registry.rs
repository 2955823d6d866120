//! Tool registry - central routing for MCP tools.
//!
//! Provides `list_tools()` and `call_tool()` per MCP spec. The catalog is a
//! closed set, so dispatch is a plain `match` over [`NewsTool`].

use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::mcp::content::ToolResult;
use crate::news::{NewsApi, ToolError, UpstreamQuery};

use super::arguments::ArgumentMap;
use super::news_sources::{self, NewsSourcesRequest};
use super::search_news::{self, SearchNewsRequest};
use super::top_headlines::{self, TopHeadlinesRequest};

/// Tool descriptor conforming to MCP specification.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsTool {
    SearchNews,
    TopHeadlines,
    NewsSources,
}

impl NewsTool {
    pub const ALL: [NewsTool; 3] = [
        NewsTool::SearchNews,
        NewsTool::TopHeadlines,
        NewsTool::NewsSources,
    ];

    pub fn from_name(name: &str) -> Result<Self, ToolError> {
        match name {
            search_news::TOOL_NAME => Ok(NewsTool::SearchNews),
            top_headlines::TOOL_NAME => Ok(NewsTool::TopHeadlines),
            news_sources::TOOL_NAME => Ok(NewsTool::NewsSources),
            _ => Err(ToolError::InvalidArgument {
                name: name.to_string(),
                available: Self::ALL
                    .iter()
                    .map(|tool| tool.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NewsTool::SearchNews => search_news::TOOL_NAME,
            NewsTool::TopHeadlines => top_headlines::TOOL_NAME,
            NewsTool::NewsSources => news_sources::TOOL_NAME,
        }
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        match self {
            NewsTool::SearchNews => search_news::descriptor(),
            NewsTool::TopHeadlines => top_headlines::descriptor(),
            NewsTool::NewsSources => news_sources::descriptor(),
        }
    }
}

/// A tool call with its arguments fully defaulted.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedCall {
    SearchNews(SearchNewsRequest),
    TopHeadlines(TopHeadlinesRequest),
    NewsSources(NewsSourcesRequest),
}

impl ResolvedCall {
    /// Fails only when `name` is not one of the catalog's tools.
    pub fn resolve(name: &str, arguments: Option<Value>) -> Result<Self, ToolError> {
        let tool = NewsTool::from_name(name)?;
        let args = ArgumentMap::from_value(arguments);

        Ok(match tool {
            NewsTool::SearchNews => {
                ResolvedCall::SearchNews(SearchNewsRequest::from_arguments(&args))
            }
            NewsTool::TopHeadlines => {
                ResolvedCall::TopHeadlines(TopHeadlinesRequest::from_arguments(&args))
            }
            NewsTool::NewsSources => {
                ResolvedCall::NewsSources(NewsSourcesRequest::from_arguments(&args))
            }
        })
    }

    pub fn tool(&self) -> NewsTool {
        match self {
            ResolvedCall::SearchNews(_) => NewsTool::SearchNews,
            ResolvedCall::TopHeadlines(_) => NewsTool::TopHeadlines,
            ResolvedCall::NewsSources(_) => NewsTool::NewsSources,
        }
    }

    pub fn to_query(&self) -> UpstreamQuery {
        match self {
            ResolvedCall::SearchNews(req) => req.to_query(),
            ResolvedCall::TopHeadlines(req) => req.to_query(),
            ResolvedCall::NewsSources(req) => req.to_query(),
        }
    }

    pub fn render(&self, body: Value) -> Result<String, ToolError> {
        match self {
            ResolvedCall::SearchNews(req) => req.render(body),
            ResolvedCall::TopHeadlines(req) => req.render(body),
            ResolvedCall::NewsSources(req) => req.render(body),
        }
    }
}

/// Central registry for all MCP tools.
pub struct ToolRegistry {
    api: Arc<dyn NewsApi>,
}

impl ToolRegistry {
    pub fn new(api: Arc<dyn NewsApi>) -> Self {
        Self { api }
    }

    /// List all available tools per MCP spec.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        NewsTool::ALL.iter().map(NewsTool::descriptor).collect()
    }

    /// Call a tool by name. Failures come back as an error result, never a fault.
    pub async fn call_tool(&self, name: &str, arguments: Option<Value>) -> ToolResult {
        let outcome = self.execute(name, arguments).await;
        match &outcome {
            Ok(_) => info!("tool '{}' completed", name),
            Err(err) => warn!("tool '{}' failed ({}): {}", name, err.kind(), err),
        }
        outcome.into()
    }

    /// Resolve, fetch and render. At most one upstream request is made.
    pub async fn execute(&self, name: &str, arguments: Option<Value>) -> Result<String, ToolError> {
        let call = ResolvedCall::resolve(name, arguments)?;
        let query = call.to_query();
        debug!(
            "resolved '{}' to {} with params {:?}",
            call.tool().name(),
            query.endpoint.path(),
            query.params
        );

        let body = self.api.fetch(&query).await?;
        call.render(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_names_round_trip() {
        for tool in NewsTool::ALL {
            assert_eq!(NewsTool::from_name(tool.name()).unwrap(), tool);
            assert_eq!(tool.descriptor().name, tool.name());
        }
    }

    #[test]
    fn test_unknown_tool_is_invalid_argument() {
        let err = NewsTool::from_name("get-weather").unwrap_err();
        assert_eq!(
            err.render(),
            "Unknown tool: get-weather. Available tools: search-news, get-top-headlines, get-news-sources"
        );
        assert!(ResolvedCall::resolve("get-weather", None).is_err());
    }

    #[test]
    fn test_every_tool_resolves_with_empty_arguments() {
        for tool in NewsTool::ALL {
            let call = ResolvedCall::resolve(tool.name(), Some(json!({}))).unwrap();
            assert_eq!(call.tool(), tool);
            let call = ResolvedCall::resolve(tool.name(), None).unwrap();
            assert_eq!(call.tool(), tool);
        }
    }
}

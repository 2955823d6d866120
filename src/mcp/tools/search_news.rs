//! `search-news`: full-text search over the upstream `everything` endpoint.

use serde_json::{json, Value};

use super::arguments::{ArgumentMap, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use super::registry::ToolDescriptor;
use crate::news::format::{render_articles, search_title};
use crate::news::models::ArticlesResponse;
use crate::news::{Endpoint, ToolError, UpstreamQuery};

pub const TOOL_NAME: &str = "search-news";

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_SORT_BY: &str = "publishedAt";

pub const LANGUAGES: &[&str] = &[
    "ar", "de", "en", "es", "fr", "he", "it", "nl", "no", "pt", "ru", "sv", "ud", "zh",
];

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: "Search for news articles on any topic".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Keywords or phrases to search for in the article title and body"
                },
                "from_date": {
                    "type": "string",
                    "description": "Start date for article search (YYYY-MM-DD format)",
                    "pattern": "^\\d{4}-\\d{2}-\\d{2}$"
                },
                "to_date": {
                    "type": "string",
                    "description": "End date for article search (YYYY-MM-DD format)",
                    "pattern": "^\\d{4}-\\d{2}-\\d{2}$"
                },
                "sources": {
                    "type": "string",
                    "description": "Comma-separated list of news sources to filter by (e.g., 'bbc-news,cnn')"
                },
                "language": {
                    "type": "string",
                    "description": "Language of the articles",
                    "enum": LANGUAGES,
                    "default": DEFAULT_LANGUAGE
                },
                "sort_by": {
                    "type": "string",
                    "description": "Sort articles by relevancy, popularity, or publishedAt",
                    "enum": ["relevancy", "popularity", "publishedAt"],
                    "default": DEFAULT_SORT_BY
                },
                "page_size": {
                    "type": "integer",
                    "description": "Number of results to return per page (max 100)",
                    "default": DEFAULT_PAGE_SIZE,
                    "minimum": 1,
                    "maximum": MAX_PAGE_SIZE
                },
                "page": {
                    "type": "integer",
                    "description": "Page number for pagination",
                    "default": DEFAULT_PAGE,
                    "minimum": 1
                }
            },
            "required": ["query"]
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchNewsRequest {
    pub query: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub sources: Option<String>,
    pub language: String,
    pub sort_by: String,
    pub page_size: u32,
    pub page: u32,
}

impl SearchNewsRequest {
    pub fn from_arguments(args: &ArgumentMap) -> Self {
        Self {
            query: args.string("query"),
            from_date: args.string("from_date"),
            to_date: args.string("to_date"),
            sources: args.string("sources"),
            language: args
                .string("language")
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            sort_by: args
                .string("sort_by")
                .unwrap_or_else(|| DEFAULT_SORT_BY.to_string()),
            page_size: args.page_size(),
            page: args.page(),
        }
    }

    pub fn to_query(&self) -> UpstreamQuery {
        UpstreamQuery::new(Endpoint::Everything)
            .optional("q", self.query.as_deref())
            .param("pageSize", self.page_size)
            .param("page", self.page)
            .param("language", &self.language)
            .param("sortBy", &self.sort_by)
            .optional("from", self.from_date.as_deref())
            .optional("to", self.to_date.as_deref())
            .optional("sources", self.sources.as_deref())
    }

    pub fn render(&self, body: Value) -> Result<String, ToolError> {
        let response: ArticlesResponse = serde_json::from_value(body)
            .map_err(|err| ToolError::MalformedResponse(err.to_string()))?;
        Ok(render_articles(&search_title(self.query.as_deref()), &response))
    }
}

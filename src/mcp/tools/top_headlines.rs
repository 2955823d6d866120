//! `get-top-headlines`: breaking headlines filtered by country, category or source.

use serde_json::{json, Value};

use super::arguments::{ArgumentMap, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use super::registry::ToolDescriptor;
use crate::news::format::{filtered_title, render_articles};
use crate::news::models::ArticlesResponse;
use crate::news::{Endpoint, ToolError, UpstreamQuery};

pub const TOOL_NAME: &str = "get-top-headlines";

pub const COUNTRIES: &[&str] = &[
    "ae", "ar", "at", "au", "be", "bg", "br", "ca", "ch", "cn", "co", "cu", "cz", "de", "eg",
    "fr", "gb", "gr", "hk", "hu", "id", "ie", "il", "in", "it", "jp", "kr", "lt", "lv", "ma",
    "mx", "my", "ng", "nl", "no", "nz", "ph", "pl", "pt", "ro", "rs", "ru", "sa", "se", "sg",
    "si", "sk", "th", "tr", "tw", "ua", "us", "ve", "za",
];

pub const CATEGORIES: &[&str] = &[
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: "Get top headlines by country, category, or source".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "country": {
                    "type": "string",
                    "description": "2-letter ISO 3166-1 country code",
                    "enum": COUNTRIES
                },
                "category": {
                    "type": "string",
                    "description": "Category to get headlines for",
                    "enum": CATEGORIES
                },
                "sources": {
                    "type": "string",
                    "description": "Comma-separated list of news source IDs (e.g., 'bbc-news,cnn')"
                },
                "query": {
                    "type": "string",
                    "description": "Keywords or phrases to search for in headlines"
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
            }
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopHeadlinesRequest {
    pub country: Option<String>,
    pub category: Option<String>,
    pub sources: Option<String>,
    pub query: Option<String>,
    pub page_size: u32,
    pub page: u32,
}

impl TopHeadlinesRequest {
    pub fn from_arguments(args: &ArgumentMap) -> Self {
        Self {
            country: args.string("country"),
            category: args.string("category"),
            sources: args.string("sources"),
            query: args.string("query"),
            page_size: args.page_size(),
            page: args.page(),
        }
    }

    /// `sources` combined with `country`/`category` is forwarded as-is; the
    /// upstream decides whether it accepts the combination.
    pub fn to_query(&self) -> UpstreamQuery {
        UpstreamQuery::new(Endpoint::TopHeadlines)
            .param("pageSize", self.page_size)
            .param("page", self.page)
            .optional("country", self.country.as_deref())
            .optional("category", self.category.as_deref())
            .optional("sources", self.sources.as_deref())
            .optional("q", self.query.as_deref())
    }

    pub fn title(&self) -> String {
        filtered_title(
            "Top headlines",
            &[
                ("country", self.country.as_ref().map(|c| c.to_uppercase())),
                ("category", self.category.clone()),
                ("sources", self.sources.clone()),
                ("query", self.query.as_ref().map(|q| format!("'{}'", q))),
            ],
        )
    }

    pub fn render(&self, body: Value) -> Result<String, ToolError> {
        let response: ArticlesResponse = serde_json::from_value(body)
            .map_err(|err| ToolError::MalformedResponse(err.to_string()))?;
        Ok(render_articles(&self.title(), &response))
    }
}

//! `get-news-sources`: publishers the upstream indexes.

use serde_json::{json, Value};

use super::arguments::ArgumentMap;
use super::registry::ToolDescriptor;
use super::search_news::LANGUAGES;
use super::top_headlines::{CATEGORIES, COUNTRIES};
use crate::news::format::{filtered_title, render_sources};
use crate::news::models::SourcesResponse;
use crate::news::{Endpoint, ToolError, UpstreamQuery};

pub const TOOL_NAME: &str = "get-news-sources";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: "Get available news sources".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Find sources that display news of this category",
                    "enum": CATEGORIES
                },
                "language": {
                    "type": "string",
                    "description": "Find sources that display news in a specific language",
                    "enum": LANGUAGES
                },
                "country": {
                    "type": "string",
                    "description": "Find sources that display news in a specific country",
                    "enum": COUNTRIES
                }
            }
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsSourcesRequest {
    pub category: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
}

impl NewsSourcesRequest {
    pub fn from_arguments(args: &ArgumentMap) -> Self {
        Self {
            category: args.string("category"),
            language: args.string("language"),
            country: args.string("country"),
        }
    }

    pub fn to_query(&self) -> UpstreamQuery {
        UpstreamQuery::new(Endpoint::Sources)
            .optional("category", self.category.as_deref())
            .optional("language", self.language.as_deref())
            .optional("country", self.country.as_deref())
    }

    pub fn title(&self) -> String {
        filtered_title(
            "Available news sources",
            &[
                ("category", self.category.clone()),
                ("language", self.language.clone()),
                ("country", self.country.as_ref().map(|c| c.to_uppercase())),
            ],
        )
    }

    pub fn render(&self, body: Value) -> Result<String, ToolError> {
        let response: SourcesResponse = serde_json::from_value(body)
            .map_err(|err| ToolError::MalformedResponse(err.to_string()))?;
        Ok(render_sources(&self.title(), &response))
    }
}

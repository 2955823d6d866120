//! Upstream request and response shapes.

use serde::{Deserialize, Deserializer};

/// Upstream endpoint targeted by a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Everything,
    TopHeadlines,
    Sources,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Everything => "/v2/everything",
            Endpoint::TopHeadlines => "/v2/top-headlines",
            Endpoint::Sources => "/v2/sources",
        }
    }
}

/// Query parameters for one upstream call, in insertion order.
///
/// The API key is not part of this value; the client appends it when sending.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamQuery {
    pub endpoint: Endpoint,
    pub params: Vec<(&'static str, String)>,
}

impl UpstreamQuery {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    pub fn optional(self, name: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub source: Option<ArticleSource>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Successful `/v2/everything` or `/v2/top-headlines` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_results: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub articles: Vec<Article>,
}

/// Successful `/v2/sources` body.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<NewsSource>,
}

/// Reads an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

//! Upstream news service: request shapes, HTTP client, error taxonomy and
//! text rendering.

pub mod client;
pub mod error;
pub mod format;
pub mod models;

pub use client::{NewsApi, NewsApiClient};
pub use error::ToolError;
pub use models::{Endpoint, UpstreamQuery};

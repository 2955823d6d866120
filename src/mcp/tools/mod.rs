//! MCP Tools module - defines tools exposed via JSON-RPC.
//!
//! Each tool module provides:
//! - Tool descriptor (name, description, input schema)
//! - Argument defaulting into a typed request
//! - Upstream query construction and result rendering

pub mod arguments;
pub mod news_sources;
pub mod registry;
pub mod search_news;
pub mod top_headlines;

pub use registry::{NewsTool, ResolvedCall, ToolDescriptor, ToolRegistry};

use thiserror::Error;

/// Every way a tool call can fail. The `Display` text is what the caller sees.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ToolError {
    #[error("Unknown tool: {name}. Available tools: {available}")]
    InvalidArgument { name: String, available: String },
    #[error("Unauthorized. API key invalid or expired.")]
    Auth,
    #[error("Rate limit exceeded. The News API has a limit of 100 requests per day for the free tier.")]
    RateLimited,
    #[error("Request timed out after {secs} seconds. The News API may be experiencing delays.")]
    Timeout { secs: u64 },
    #[error("Failed to connect to News API: {0}")]
    Network(String),
    #[error("News API error ({code}): {message}")]
    Upstream { code: String, message: String },
    #[error("Malformed response from News API: {0}")]
    MalformedResponse(String),
}

impl ToolError {
    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::InvalidArgument { .. } => "invalid_argument",
            ToolError::Auth => "auth",
            ToolError::RateLimited => "rate_limited",
            ToolError::Timeout { .. } => "timeout",
            ToolError::Network(_) => "network",
            ToolError::Upstream { .. } => "upstream",
            ToolError::MalformedResponse(_) => "malformed_response",
        }
    }

    /// The single line rendered back to the caller.
    pub fn render(&self) -> String {
        match self {
            ToolError::InvalidArgument { .. } => self.to_string(),
            _ => format!("Error: {}", self),
        }
    }
}

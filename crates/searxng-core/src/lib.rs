//! Backend-agnostic pieces of the SearXNG adapter.
//!
//! Nothing in here does IO: the HTTP fallback executor lives in `searxng-local`,
//! the MCP surface in `searxng-mcp`.

use serde::{Deserialize, Serialize};

pub mod endpoint;
pub mod format;
pub mod query;
pub mod result;
pub mod validate;

pub use endpoint::EndpointList;
pub use format::{format_result, format_results};
pub use query::{SearchQuery, TimeRange};
pub use result::{Decoded, RawResult, ResultSet};
pub use validate::is_web_search_args;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
    #[error("Invalid tool or arguments: expected 'web_search'")]
    UnknownTool,
    #[error("Invalid arguments for web_search")]
    InvalidArguments,
    #[error(
        "All SearXNG instances failed. Please ensure SearXNG is running on one of these instances: {}",
        join_endpoints(.attempts)
    )]
    AllEndpointsFailed { attempts: Vec<EndpointFailure> },
}

pub type Result<T> = std::result::Result<T, Error>;

/// One failed endpoint attempt, kept for diagnostics on the aggregate error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointFailure {
    pub endpoint: String,
    pub reason: String,
}

fn join_endpoints(attempts: &[EndpointFailure]) -> String {
    attempts
        .iter()
        .map(|a| a.endpoint.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search(&self, q: &SearchQuery) -> Result<ResultSet>;
}

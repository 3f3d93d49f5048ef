use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    transport::stdio,
    ErrorData as McpError, RoleServer, ServiceExt,
};
use searxng_core::{
    format_results, is_web_search_args, Error as SearxngError, SearchBackend, SearchQuery,
};
use searxng_local::{FallbackSearcher, SearxngConfig};
use std::sync::Arc;

mod tool;
pub(crate) use tool::{web_search_tool, WEB_SEARCH};

#[derive(Clone)]
pub(crate) struct SearxngMcp {
    backend: Arc<dyn SearchBackend>,
}

impl SearxngMcp {
    pub(crate) fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Every failure, input or network, becomes an error result; nothing escapes as a protocol error.
    pub(crate) async fn call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        match self.web_search(name, arguments).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                tracing::error!(tool = name, error = %e, "search failed");
                CallToolResult::error(vec![Content::text(e.to_string())])
            }
        }
    }

    async fn web_search(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<String, SearxngError> {
        let args = match arguments {
            Some(a) if name == WEB_SEARCH => serde_json::Value::Object(a),
            _ => return Err(SearxngError::UnknownTool),
        };
        if !is_web_search_args(&args) {
            return Err(SearxngError::InvalidArguments);
        }
        let q = SearchQuery::from_args(&args);
        tracing::debug!(
            backend = self.backend.name(),
            query = %q.query,
            page = q.page,
            "web_search"
        );
        let results = self.backend.search(&q).await?;
        Ok(format_results(&results.results))
    }
}

impl rmcp::ServerHandler for SearxngMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "SearXNG meta search. One tool, web_search; configured instances are tried in order until one returns results."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(vec![web_search_tool()]))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call(&request.name, request.arguments).await)
    }
}

pub(crate) async fn serve_stdio(config: SearxngConfig) -> Result<(), McpError> {
    let backend = FallbackSearcher::new(&config)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    let svc = SearxngMcp::new(Arc::new(backend));
    let running = svc
        .serve(stdio())
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    tracing::info!(
        instances = %config.endpoints.as_slice().join(", "),
        timeout_ms = config.attempt_timeout.as_millis() as u64,
        "SearXNG Search MCP Server running on stdio"
    );
    // Keep the stdio server alive until the client closes.
    running
        .waiting()
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(())
}

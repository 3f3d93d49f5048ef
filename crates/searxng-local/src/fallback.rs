use crate::SearxngConfig;
use reqwest::header::{ACCEPT, USER_AGENT};
use searxng_core::{
    EndpointFailure, EndpointList, Error, Result, ResultSet, SearchBackend, SearchQuery,
};
use std::time::{Duration, Instant};

/// Why a single endpoint attempt did not produce results.
#[derive(thiserror::Error, Debug)]
pub enum AttemptError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("connection failed: {0}")]
    Transport(String),
    #[error("timed out after {0}ms")]
    Timeout(u128),
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("no results")]
    NoResults,
}

/// Tries each configured SearXNG instance in order; the first non-empty result set wins.
#[derive(Debug, Clone)]
pub struct FallbackSearcher {
    client: reqwest::Client,
    endpoints: EndpointList,
    user_agent: String,
    attempt_timeout: Duration,
}

impl FallbackSearcher {
    pub fn new(config: &SearxngConfig) -> Result<Self> {
        let client = crate::build_client(config)?;
        Ok(Self::with_client(
            client,
            config.endpoints.clone(),
            config.user_agent.clone(),
            config.attempt_timeout,
        ))
    }

    pub fn with_client(
        client: reqwest::Client,
        endpoints: EndpointList,
        user_agent: String,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            client,
            endpoints,
            user_agent,
            attempt_timeout,
        }
    }

    pub fn endpoints(&self) -> &EndpointList {
        &self.endpoints
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    pub async fn search(&self, q: &SearchQuery) -> Result<ResultSet> {
        let mut attempts = Vec::with_capacity(self.endpoints.len());
        for endpoint in self.endpoints.iter() {
            let t0 = Instant::now();
            match self.search_at_endpoint(endpoint, q).await {
                Ok(results) => {
                    tracing::debug!(
                        endpoint,
                        results = results.len(),
                        elapsed_ms = t0.elapsed().as_millis() as u64,
                        "searxng search succeeded"
                    );
                    return Ok(results);
                }
                Err(e) => {
                    match &e {
                        AttemptError::Status(status) => tracing::warn!(
                            endpoint,
                            status = status.as_u16(),
                            "searxng instance returned {status}; check that SearXNG is running"
                        ),
                        AttemptError::NoResults => {
                            tracing::warn!(endpoint, "searxng instance returned no results")
                        }
                        other => tracing::warn!(
                            endpoint,
                            error = %other,
                            "failed to query searxng instance; check that SearXNG is running"
                        ),
                    }
                    attempts.push(EndpointFailure {
                        endpoint: endpoint.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Err(Error::AllEndpointsFailed { attempts })
    }

    /// One bounded attempt. The timeout covers connect, send and body decode;
    /// when it fires the in-flight request future is dropped.
    pub async fn search_at_endpoint(
        &self,
        endpoint: &str,
        q: &SearchQuery,
    ) -> std::result::Result<ResultSet, AttemptError> {
        let url = EndpointList::search_url(endpoint)
            .map_err(|e| AttemptError::InvalidEndpoint(e.to_string()))?;
        let params = q.form_params();

        let attempt = async {
            let resp = self
                .client
                .post(url)
                .header(ACCEPT, "application/json")
                .header(USER_AGENT, &self.user_agent)
                .form(&params)
                .send()
                .await
                .map_err(|e| AttemptError::Transport(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(AttemptError::Status(status));
            }

            let body: serde_json::Value = resp
                .json()
                .await
                .map_err(|e| AttemptError::Decode(e.to_string()))?;
            let decoded = ResultSet::decode(&body)
                .ok_or_else(|| AttemptError::Decode("missing results array".to_string()))?;
            if decoded.dropped > 0 {
                tracing::debug!(
                    endpoint,
                    dropped = decoded.dropped,
                    "dropped result records without title/url"
                );
            }
            if decoded.results.is_empty() {
                return Err(AttemptError::NoResults);
            }
            Ok(decoded.results)
        };

        match tokio::time::timeout(self.attempt_timeout, attempt).await {
            Ok(r) => r,
            Err(_) => Err(AttemptError::Timeout(self.attempt_timeout.as_millis())),
        }
    }
}

#[async_trait::async_trait]
impl SearchBackend for FallbackSearcher {
    fn name(&self) -> &'static str {
        "searxng"
    }

    async fn search(&self, q: &SearchQuery) -> Result<ResultSet> {
        FallbackSearcher::search(self, q).await
    }
}

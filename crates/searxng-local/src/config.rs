use searxng_core::{EndpointList, Result};
use std::time::Duration;

pub const ENV_INSTANCES: &str = "SEARXNG_INSTANCES";
pub const ENV_USER_AGENT: &str = "SEARXNG_USER_AGENT";
pub const ENV_TLS_REJECT_UNAUTHORIZED: &str = "SEARXNG_TLS_REJECT_UNAUTHORIZED";
pub const ENV_TIMEOUT_MS: &str = "SEARXNG_TIMEOUT_MS";

pub const DEFAULT_USER_AGENT: &str = "MCP-SearXNG/1.0";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct SearxngConfig {
    pub endpoints: EndpointList,
    pub user_agent: String,
    /// Skip TLS certificate verification (self-signed local instances).
    pub accept_invalid_certs: bool,
    /// Ceiling for a single endpoint attempt.
    pub attempt_timeout: Duration,
}

impl Default for SearxngConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointList::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
            attempt_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl SearxngConfig {
    pub fn from_parts(
        instances: Option<&str>,
        user_agent: Option<&str>,
        accept_invalid_certs: bool,
        timeout_ms: Option<u64>,
    ) -> Result<Self> {
        let endpoints = EndpointList::parse_csv(instances)?;
        let user_agent = user_agent
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_USER_AGENT)
            .to_string();
        Ok(Self {
            endpoints,
            user_agent,
            accept_invalid_certs,
            attempt_timeout: attempt_timeout_from_ms(timeout_ms),
        })
    }

    pub fn from_env() -> Result<Self> {
        let instances = env_nonempty(ENV_INSTANCES);
        let user_agent = env_nonempty(ENV_USER_AGENT);
        let timeout_ms = env_nonempty(ENV_TIMEOUT_MS).and_then(|s| s.parse::<u64>().ok());
        Self::from_parts(
            instances.as_deref(),
            user_agent.as_deref(),
            tls_verification_disabled(env_nonempty(ENV_TLS_REJECT_UNAUTHORIZED).as_deref()),
            timeout_ms,
        )
    }
}

fn env_nonempty(k: &str) -> Option<String> {
    std::env::var(k)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `SEARXNG_TLS_REJECT_UNAUTHORIZED=0` (or `false`/`no`/`off`) turns verification off.
pub fn tls_verification_disabled(v: Option<&str>) -> bool {
    matches!(
        v.unwrap_or_default().trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

pub fn attempt_timeout_from_ms(ms: Option<u64>) -> Duration {
    Duration::from_millis(ms.unwrap_or(DEFAULT_TIMEOUT_MS).clamp(100, 60_000))
}

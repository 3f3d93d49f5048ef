//! reqwest implementations for the SearXNG adapter.

use searxng_core::{Error, Result};
use std::time::Duration;

pub mod config;
pub mod fallback;

pub use config::SearxngConfig;
pub use fallback::{AttemptError, FallbackSearcher};

/// Shared HTTP client for all endpoint attempts.
///
/// The per-attempt ceiling is applied by [`FallbackSearcher`]; the client-level
/// timeouts here are only a backstop against stalled connections.
pub fn build_client(config: &SearxngConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(10))
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(60));
    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled for SearXNG instances");
        builder = builder.danger_accept_invalid_certs(true);
    }
    builder
        .build()
        .map_err(|e| Error::NotConfigured(format!("http client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_client_in_both_tls_modes() {
        let mut c = SearxngConfig::default();
        assert!(build_client(&c).is_ok());
        c.accept_invalid_certs = true;
        assert!(build_client(&c).is_ok());
    }
}

use serde::Serialize;
use searxng_core::Error as SearxngError;

pub(crate) const SCHEMA_VERSION: u64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidParams,
    InvalidUrl,
    NotConfigured,
    SearchFailed,
}

impl ErrorCode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParams => "invalid_params",
            Self::InvalidUrl => "invalid_url",
            Self::NotConfigured => "not_configured",
            Self::SearchFailed => "search_failed",
        }
    }

    pub(crate) fn retryable(self) -> bool {
        match self {
            Self::SearchFailed => true,
            // Configuration + invalid input are not retryable without changing something.
            Self::InvalidParams | Self::InvalidUrl | Self::NotConfigured => false,
        }
    }

    pub(crate) fn for_error(e: &SearxngError) -> Self {
        match e {
            SearxngError::InvalidUrl(_) => Self::InvalidUrl,
            SearxngError::NotConfigured(_) => Self::NotConfigured,
            SearxngError::UnknownTool | SearxngError::InvalidArguments => Self::InvalidParams,
            SearxngError::AllEndpointsFailed { .. } => Self::SearchFailed,
        }
    }

    pub(crate) fn default_hint(self) -> &'static str {
        match self {
            Self::InvalidParams => "Pass an object with a string `query` field.",
            Self::InvalidUrl => {
                "SEARXNG_INSTANCES must be a comma-separated list of http(s) base URLs."
            }
            Self::NotConfigured => "Set SEARXNG_INSTANCES (or pass --instances).",
            Self::SearchFailed => {
                "Check that at least one SearXNG instance is running and has the JSON format enabled."
            }
        }
    }
}

pub(crate) fn add_envelope_fields(payload: &mut serde_json::Value, kind: &str, elapsed_ms: u128) {
    payload["schema_version"] = serde_json::json!(SCHEMA_VERSION);
    payload["kind"] = serde_json::json!(kind);
    payload["elapsed_ms"] = serde_json::json!(elapsed_ms);
    if payload.get("request").is_none() {
        payload["request"] = serde_json::Value::Null;
    }
}

pub(crate) fn error_obj(code: ErrorCode, message: impl ToString, hint: impl ToString) -> serde_json::Value {
    #[derive(Serialize)]
    struct ErrorObject {
        code: &'static str,
        message: String,
        hint: String,
        retryable: bool,
    }

    let e = ErrorObject {
        code: code.as_str(),
        message: message.to_string(),
        hint: hint.to_string(),
        retryable: code.retryable(),
    };
    match serde_json::to_value(e) {
        Ok(v) => v,
        Err(_) => serde_json::json!({
            "code": code.as_str(),
            "message": message.to_string(),
            "hint": hint.to_string(),
            "retryable": code.retryable()
        }),
    }
}

/// Error object for a search failure, with per-endpoint reasons when available.
pub(crate) fn error_from(e: &SearxngError) -> serde_json::Value {
    let code = ErrorCode::for_error(e);
    let mut v = error_obj(code, e, code.default_hint());
    if let SearxngError::AllEndpointsFailed { attempts } = e {
        v["attempts"] = serde_json::json!(attempts);
    }
    v
}

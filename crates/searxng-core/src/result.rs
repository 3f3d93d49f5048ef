use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One record from a SearXNG `results` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawResult {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
}

impl RawResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: None,
            engine: None,
        }
    }

    /// Map one untrusted JSON record; `None` unless `title` and `url` are strings.
    pub fn from_value(v: &Value) -> Option<Self> {
        let title = v.get("title")?.as_str()?;
        let url = v.get("url")?.as_str()?;
        let opt = |k: &str| v.get(k).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            title: title.to_string(),
            url: url.to_string(),
            content: opt("content"),
            engine: opt("engine"),
        })
    }
}

/// Result records from one endpoint, in upstream order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultSet {
    pub results: Vec<RawResult>,
}

/// Outcome of decoding a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub results: ResultSet,
    /// Records dropped for missing/non-string `title` or `url`.
    pub dropped: usize,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Decode-and-validate an untrusted SearXNG body.
    ///
    /// Returns `None` when the body has no `results` array at all.
    pub fn decode(body: &Value) -> Option<Decoded> {
        let raw = body.get("results")?.as_array()?;
        let results: Vec<RawResult> = raw.iter().filter_map(RawResult::from_value).collect();
        let dropped = raw.len() - results.len();
        Some(Decoded {
            results: ResultSet { results },
            dropped,
        })
    }
}

impl FromIterator<RawResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = RawResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

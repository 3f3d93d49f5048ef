use crate::{Error, Result};
use url::Url;

pub const DEFAULT_INSTANCE: &str = "http://localhost:8080";

/// Ordered, non-empty list of SearXNG base addresses.
///
/// Order is fallback priority. The list is validated on construction and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointList {
    endpoints: Vec<String>,
}

impl EndpointList {
    pub fn new<I, S>(endpoints: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for raw in endpoints {
            let s = raw.as_ref().trim();
            if s.is_empty() {
                continue;
            }
            let parsed = Url::parse(s).map_err(|e| Error::InvalidUrl(format!("{s}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
                return Err(Error::InvalidUrl(format!(
                    "{s}: expected an http(s) base address"
                )));
            }
            let s = s.to_string();
            if !out.contains(&s) {
                out.push(s);
            }
        }
        if out.is_empty() {
            return Err(Error::NotConfigured(
                "no SearXNG instances configured".to_string(),
            ));
        }
        Ok(Self { endpoints: out })
    }

    /// Parse a comma-separated list; blank input falls back to [`DEFAULT_INSTANCE`].
    pub fn parse_csv(csv: Option<&str>) -> Result<Self> {
        let entries: Vec<&str> = csv
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if entries.is_empty() {
            return Self::new([DEFAULT_INSTANCE]);
        }
        Self::new(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.endpoints.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.endpoints
    }

    /// Resolve the fixed `/search` path against a base address.
    ///
    /// Any path on the base is replaced, not appended to.
    pub fn search_url(base: &str) -> Result<Url> {
        Url::parse(base.trim())
            .and_then(|u| u.join("/search"))
            .map_err(|e| Error::InvalidUrl(format!("{base}: {e}")))
    }
}

impl Default for EndpointList {
    fn default() -> Self {
        Self {
            endpoints: vec![DEFAULT_INSTANCE.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_csv_falls_back_to_local_default() {
        for raw in [None, Some(""), Some(" , ,")] {
            let eps = EndpointList::parse_csv(raw).unwrap();
            assert_eq!(eps.as_slice(), &[DEFAULT_INSTANCE.to_string()]);
        }
    }

    #[test]
    fn csv_keeps_order_and_drops_duplicates() {
        let eps =
            EndpointList::parse_csv(Some("http://b:8080, https://a.example ,http://b:8080")).unwrap();
        assert_eq!(
            eps.iter().collect::<Vec<_>>(),
            vec!["http://b:8080", "https://a.example"]
        );
    }

    #[test]
    fn rejects_non_http_and_garbage() {
        assert!(matches!(
            EndpointList::parse_csv(Some("not a url")),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            EndpointList::parse_csv(Some("ftp://example.com")),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn empty_explicit_list_is_not_configured() {
        let none: [&str; 0] = [];
        assert!(matches!(
            EndpointList::new(none),
            Err(Error::NotConfigured(_))
        ));
    }

    #[test]
    fn search_path_replaces_base_path() {
        assert_eq!(
            EndpointList::search_url("http://localhost:8080").unwrap().as_str(),
            "http://localhost:8080/search"
        );
        assert_eq!(
            EndpointList::search_url("https://searx.example/some/prefix/")
                .unwrap()
                .as_str(),
            "https://searx.example/search"
        );
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_LANGUAGE: &str = "all";
pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_SAFESEARCH: u8 = 1;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    #[serde(rename = "")]
    Any,
    Day,
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Some(Self::Any),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

/// A normalized search request. Every field except `query` carries a default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub page: u32,
    pub language: String,
    pub categories: Vec<String>,
    pub time_range: TimeRange,
    pub safesearch: u8,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            language: DEFAULT_LANGUAGE.to_string(),
            categories: vec![DEFAULT_CATEGORY.to_string()],
            time_range: TimeRange::Any,
            safesearch: DEFAULT_SAFESEARCH,
        }
    }

    /// Build a query from tool arguments that already passed
    /// [`crate::is_web_search_args`].
    ///
    /// Optional fields are read leniently: wrong types fall back to defaults.
    /// `page`, `language` and `categories` treat falsy values as absent;
    /// `safesearch` only defaults when absent or null, so an explicit `0` survives.
    pub fn from_args(args: &Value) -> Self {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let mut q = Self::new(query);

        if let Some(page) = args.get("page").and_then(positive_int) {
            q.page = u32::try_from(page).unwrap_or(u32::MAX);
        }
        if let Some(lang) = args
            .get("language")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            q.language = lang.to_string();
        }
        if let Some(cats) = args.get("categories").and_then(Value::as_array) {
            let cats: Vec<String> = cats
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !cats.is_empty() {
                q.categories = cats;
            }
        }
        if let Some(tr) = args
            .get("time_range")
            .and_then(Value::as_str)
            .and_then(TimeRange::parse)
        {
            q.time_range = tr;
        }
        match args.get("safesearch") {
            None | Some(Value::Null) => {}
            Some(v) => {
                if let Some(n) = v.as_f64() {
                    q.safesearch = n.clamp(0.0, 2.0) as u8;
                }
            }
        }
        q
    }

    pub fn categories_csv(&self) -> String {
        let joined = self.categories.join(",");
        if joined.is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            joined
        }
    }

    /// Form fields for `POST /search`, in a fixed order.
    pub fn form_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.query.clone()),
            ("pageno", self.page.to_string()),
            ("language", self.language.clone()),
            ("categories", self.categories_csv()),
            ("time_range", self.time_range.as_str().to_string()),
            ("safesearch", self.safesearch.to_string()),
            ("format", "json".to_string()),
        ]
    }
}

fn positive_int(v: &Value) -> Option<u64> {
    if let Some(n) = v.as_u64() {
        return (n > 0).then_some(n);
    }
    let f = v.as_f64()?;
    (f >= 1.0).then_some(f as u64)
}

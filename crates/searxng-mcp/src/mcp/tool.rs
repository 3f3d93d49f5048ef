use rmcp::model::{JsonObject, Tool};
use schemars::JsonSchema;

pub(crate) const WEB_SEARCH: &str = "web_search";

const WEB_SEARCH_DESCRIPTION: &str = "Performs a web search using SearXNG, ideal for general queries, news, articles and online content. \
Supports multiple search categories, languages, time ranges and safe search filtering. \
Returns relevant results from multiple search engines combined.";

// Schema-only mirror of the accepted arguments. Calls are not deserialized into
// this type: validation is a shape check and normalization is lenient.
#[allow(dead_code)]
#[derive(JsonSchema)]
pub(crate) struct WebSearchArgs {
    /// Search query
    query: String,
    /// Page number (default 1)
    #[schemars(range(min = 1), extend("default" = 1))]
    page: Option<u32>,
    /// Search language code (e.g. 'en', 'zh', 'jp', 'all')
    #[schemars(extend("default" = "all"))]
    language: Option<String>,
    /// Result categories
    #[schemars(extend("default" = ["general"]))]
    categories: Option<Vec<Category>>,
    /// Only return results from this recent window ("" for no limit)
    #[schemars(extend("default" = ""))]
    time_range: Option<TimeRange>,
    /// 0: None, 1: Moderate, 2: Strict
    #[schemars(range(min = 0, max = 2), extend("default" = 1))]
    safesearch: Option<u8>,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Category {
    General,
    News,
    Science,
    Files,
    Images,
    Videos,
    Music,
    #[serde(rename = "social media")]
    SocialMedia,
    It,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TimeRange {
    #[serde(rename = "")]
    Any,
    Day,
    Week,
    Month,
    Year,
}

pub(crate) fn input_schema() -> JsonObject {
    let schema = schemars::generate::SchemaSettings::draft2020_12()
        .with(|s| s.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<WebSearchArgs>();
    let mut obj = match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(m)) => m,
        _ => JsonObject::new(),
    };
    obj.remove("$schema");
    obj.insert("type".to_string(), serde_json::json!("object"));
    obj
}

pub(crate) fn web_search_tool() -> Tool {
    Tool::new(WEB_SEARCH, WEB_SEARCH_DESCRIPTION, input_schema())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_only_query() {
        let s = input_schema();
        assert_eq!(s["type"], "object");
        assert_eq!(s["required"], serde_json::json!(["query"]));
        let props = s["properties"].as_object().expect("properties");
        for k in ["query", "page", "language", "categories", "time_range", "safesearch"] {
            assert!(props.contains_key(k), "missing property {k}");
        }
        assert_eq!(props["query"]["type"], "string");
        assert_eq!(props["page"]["default"], 1);
        assert_eq!(props["language"]["default"], "all");
        assert_eq!(props["categories"]["default"], serde_json::json!(["general"]));
        assert_eq!(props["time_range"]["default"], "");
        assert_eq!(props["safesearch"]["default"], 1);
    }

    #[test]
    fn category_and_time_range_enums_use_wire_names() {
        let text = serde_json::Value::Object(input_schema()).to_string();
        assert!(text.contains("\"social media\""));
        assert!(text.contains("\"it\""));
        assert!(text.contains("\"week\""));
        assert!(!text.contains("$ref"));
    }

    #[test]
    fn tool_is_named_web_search() {
        let t = web_search_tool();
        assert_eq!(t.name, WEB_SEARCH);
        assert!(t.description.as_deref().unwrap_or("").contains("SearXNG"));
    }
}

use serde_json::Value;

/// Shape check for `web_search` arguments: an object whose `query` is a string.
///
/// The empty string is accepted; everything else about the arguments is left to
/// [`crate::SearchQuery::from_args`].
pub fn is_web_search_args(args: &Value) -> bool {
    args.as_object()
        .and_then(|m| m.get("query"))
        .is_some_and(Value::is_string)
}

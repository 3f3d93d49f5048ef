use crate::RawResult;

/// Render one record as `Title:`/`URL:` lines plus optional `Content:`/`Source:`.
pub fn format_result(r: &RawResult) -> String {
    let mut parts = vec![format!("Title: {}", r.title), format!("URL: {}", r.url)];
    if let Some(content) = r.content.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("Content: {content}"));
    }
    if let Some(engine) = r.engine.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("Source: {engine}"));
    }
    parts.join("\n")
}

/// Blocks are separated by exactly one blank line.
pub fn format_results(results: &[RawResult]) -> String {
    results
        .iter()
        .map(format_result)
        .collect::<Vec<_>>()
        .join("\n\n")
}

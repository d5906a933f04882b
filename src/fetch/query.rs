// ABOUTME: Query string construction for gateway requests.
// ABOUTME: Percent-encodes keys and values and appends them only when present.

/// Encode `params` as `key=value&...`, or `None` when there are none.
pub fn build_query(params: &[(String, String)]) -> Option<String> {
    if params.is_empty() {
        return None;
    }
    let query = params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    Some(query)
}

/// `path` with the encoded query appended after `?`.
pub fn with_query(path: &str, params: &[(String, String)]) -> String {
    match build_query(params) {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    }
}

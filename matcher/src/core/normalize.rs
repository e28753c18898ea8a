//! Normalization of free-text profile fields

/// Lowercase and trim a topic; empty results are dropped by callers
pub fn topic(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalized, de-duplicated topics in first-seen order
pub fn topics(raw: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(raw.len());
    for item in raw {
        let normalized = topic(item);
        if !normalized.is_empty() && !seen.contains(&normalized) {
            seen.push(normalized);
        }
    }
    seen
}

/// Topics present in both lists, in the order they appear in `a`
pub fn shared_topics(a: &[String], b: &[String]) -> Vec<String> {
    let b = topics(b);
    topics(a).into_iter().filter(|t| b.contains(t)).collect()
}

/// Categorical label: lowercase, trimmed, spaces and dashes folded to `_`.
///
/// Returns `None` for absent or blank values.
pub fn label(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }
    Some(
        value
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect(),
    )
}

/// Case-insensitive affiliation key
pub fn affiliation(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_lowercase())
    }
}

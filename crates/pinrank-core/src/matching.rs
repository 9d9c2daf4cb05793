//! Query/keyword normalization and the mutual substring containment rule.

/// Normalize a raw user query: trim surrounding whitespace and lowercase.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize a single pin keyword. Returns `None` for keywords that are empty
/// after trimming.
pub fn normalize_keyword(raw: &str) -> Option<String> {
    let kw = raw.trim().to_lowercase();
    if kw.is_empty() { None } else { Some(kw) }
}

/// Split editor input such as `"leddy 60, Aquael Tank"` into normalized
/// keywords. Order and duplicates are preserved; empty segments are dropped.
pub fn parse_keywords(text: &str) -> Vec<String> {
    text.split(',').filter_map(normalize_keyword).collect()
}

/// True if either string contains the other. `query` is expected to be
/// normalized already; `keyword` is lowercased here. Empty keywords and empty
/// queries never match.
pub fn mutually_contains(query: &str, keyword: &str) -> bool {
    let keyword = keyword.trim();
    if keyword.is_empty() || query.is_empty() {
        return false;
    }
    let keyword = keyword.to_lowercase();
    query.contains(keyword.as_str()) || keyword.contains(query)
}

// key path helpers for "/"-delimited object store prefixes
//
// paths handled here are plain strings. nothing is decoded or sanitized:
// ".." and friends reach the store untouched and its key space decides.

/// normalize a requested prefix: no leading "/", a trailing "/" unless empty
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

/// compute the parent prefix of a path, "" when the parent is the root
pub fn parent(path: &str) -> String {
    let stripped = path.strip_suffix('/').unwrap_or(path);
    match stripped.rfind('/') {
        Some(idx) if !stripped[..idx].is_empty() => format!("{}/", &stripped[..idx]),
        _ => String::new(),
    }
}

/// split a path into its segments, ignoring surrounding "/"
pub fn segments(path: &str) -> Vec<&str> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// last segment of a key or prefix, used as its display name
pub fn last_segment(path: &str) -> &str {
    let stripped = path.strip_suffix('/').unwrap_or(path);
    stripped.rsplit('/').next().unwrap_or(stripped)
}

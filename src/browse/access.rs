// naming-convention access rule for top-level folders

use crate::utils::paths::segments;

/// folders whose name starts with this marker are reserved
pub const RESERVED_PREFIX: &str = "PRIVATE_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
}

/// decide whether `path` may be listed
///
/// only a path that is exactly one reserved top-level folder is denied.
/// deeper paths are allowed even when their last segment is reserved.
pub fn decide(path: &str) -> AccessDecision {
    let denied = matches!(segments(path).as_slice(), [only] if is_reserved(only));
    AccessDecision { allowed: !denied }
}

/// whether a folder name carries the reserved marker
pub fn is_reserved(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denies_top_level_reserved_folder() {
        for path in ["PRIVATE_x/", "PRIVATE_/", "PRIVATE_backups", "/PRIVATE_x/"] {
            assert!(!decide(path).allowed, "expected denial for {path:?}");
        }
    }

    #[test]
    fn test_allows_nested_reserved_folder() {
        for path in ["PRIVATE_x/inner/", "public/PRIVATE_y/", "a/b/PRIVATE_z/"] {
            assert!(decide(path).allowed, "expected access for {path:?}");
        }
    }

    #[test]
    fn test_allows_root_and_ordinary_paths() {
        assert!(decide("").allowed);
        assert!(decide("photos/").allowed);
        assert!(decide("private_lowercase/").allowed);
        assert!(decide("NOT_PRIVATE_x/").allowed);
    }
}

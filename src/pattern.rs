//! Name pattern matching for ground-plane and ignore tags.
//!
//! Patterns are a small glob subset: exact (`wall`), prefix (`wall*`),
//! suffix (`*wall`) and substring (`*wall*`). A lone `*` matches anything.

/// Test `name` against a single pattern.
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    match (pattern.starts_with('*'), pattern.ends_with('*')) {
        (false, false) => name == pattern,
        (true, true) => name.contains(&pattern[1..pattern.len() - 1]),
        (true, false) => name.ends_with(&pattern[1..]),
        (false, true) => name.starts_with(&pattern[..pattern.len() - 1]),
    }
}

/// Test `name` against a list of patterns, `true` if any matches.
pub fn matches_any<S: AsRef<str>>(name: &str, patterns: &[S]) -> bool {
    patterns.iter().any(|p| matches_pattern(name, p.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(matches_pattern("wall", "wall"));
        assert!(!matches_pattern("wall_1", "wall"));
        assert!(!matches_pattern("wall", "walls"));
    }

    #[test]
    fn prefix_match() {
        assert!(matches_pattern("wall_north", "wall*"));
        assert!(!matches_pattern("north_wall", "wall*"));
    }

    #[test]
    fn suffix_match() {
        assert!(matches_pattern("north_wall", "*wall"));
        assert!(!matches_pattern("wall_north", "*wall"));
    }

    #[test]
    fn substring_match() {
        assert!(matches_pattern("big_wall_north", "*wall*"));
        assert!(matches_pattern("wall", "*wall*"));
        assert!(!matches_pattern("ceiling", "*wall*"));
    }

    #[test]
    fn lone_star_matches_everything() {
        assert!(matches_pattern("anything", "*"));
        assert!(matches_pattern("", "*"));
    }

    #[test]
    fn any_of_list() {
        let tags = ["ground*", "*floor*"];
        assert!(matches_any("ground_plane", &tags));
        assert!(matches_any("second_floor_slab", &tags));
        assert!(!matches_any("crate", &tags));
        assert!(!matches_any("crate", &[] as &[&str]));
    }
}

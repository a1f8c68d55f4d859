//! Path pattern matching.
//!
//! # Responsibilities
//! - Compile a declared path into literal segments
//! - Match request path segments exactly, or by prefix for catch-all patterns
//!
//! # Design Decisions
//! - Segment comparison is case-sensitive
//! - Empty segments are ignored, so `/a/`, `//a` and `/a` are the same path
//! - No parameter syntax and no regex: a trailing `*` is the only wildcard

/// A compiled route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches exactly these segments.
    Exact(Vec<String>),
    /// Matches any path starting with these segments (`/static/*`, or `/*` for everything).
    Prefix(Vec<String>),
}

impl PathPattern {
    /// Compile `"/a/b"` (exact) or `"/a/*"` (catch-all under `/a`).
    pub fn parse(pattern: &str) -> Self {
        let mut segments: Vec<String> = split_segments(pattern).map(str::to_string).collect();
        if segments.last().is_some_and(|s| s == "*") {
            segments.pop();
            PathPattern::Prefix(segments)
        } else {
            PathPattern::Exact(segments)
        }
    }

    /// Matches everything.
    pub fn any() -> Self {
        PathPattern::Prefix(Vec::new())
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, PathPattern::Prefix(_))
    }

    /// Returns true if the request path segments satisfy this pattern.
    pub fn matches(&self, path: &[&str]) -> bool {
        match self {
            PathPattern::Exact(segments) => {
                segments.len() == path.len() && segments.iter().zip(path).all(|(a, b)| a == b)
            }
            PathPattern::Prefix(segments) => {
                segments.len() <= path.len() && segments.iter().zip(path).all(|(a, b)| a == b)
            }
        }
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (segments, wildcard) = match self {
            PathPattern::Exact(s) => (s, false),
            PathPattern::Prefix(s) => (s, true),
        };
        for segment in segments {
            write!(f, "/{}", segment)?;
        }
        match (segments.is_empty(), wildcard) {
            (_, true) => f.write_str("/*"),
            (true, false) => f.write_str("/"),
            (false, false) => Ok(()),
        }
    }
}

/// Non-empty segments of a path.
pub fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(path: &str) -> Vec<&str> {
        split_segments(path).collect()
    }

    #[test]
    fn test_exact_matcher() {
        let pattern = PathPattern::parse("/api/users");
        assert!(pattern.matches(&segs("/api/users")));
        assert!(pattern.matches(&segs("/api/users/")));
        assert!(!pattern.matches(&segs("/api/users/1")));
        assert!(!pattern.matches(&segs("/API/users")));

        let root = PathPattern::parse("/");
        assert!(root.matches(&segs("/")));
        assert!(!root.matches(&segs("/x")));
    }

    #[test]
    fn test_prefix_matcher() {
        let pattern = PathPattern::parse("/static/*");
        assert!(pattern.is_catch_all());
        assert!(pattern.matches(&segs("/static")));
        assert!(pattern.matches(&segs("/static/css/site.css")));
        assert!(!pattern.matches(&segs("/images")));

        assert!(PathPattern::any().matches(&segs("/anything/at/all")));
    }

    #[test]
    fn test_display_round_trip() {
        for raw in ["/", "/a/b", "/a/*", "/*"] {
            assert_eq!(PathPattern::parse(raw).to_string(), raw);
        }
    }
}

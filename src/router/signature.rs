//! Segment splitting and first-letter signatures.
//!
//! A signature is one character per segment. Wildcard segments contribute
//! [`WILDCARD_SENTINEL`] instead of their first character so that every route
//! holding a wildcard sorts after the static routes sharing its prefix.

use std::cmp::Ordering;

/// Stand-in character for a wildcard segment inside a signature.
///
/// `U+10FFFE` is the highest valid code point minus one, so it compares greater
/// than any character a literal segment can start with.
pub const WILDCARD_SENTINEL: char = '\u{10FFFE}';

/// A single component of a registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Matches any path segment; holds the name with the marker stripped.
    Wildcard(String),
}

impl Segment {
    /// Classify a raw route segment against the configured wildcard marker.
    pub fn parse(raw: &str, marker: Option<char>) -> Self {
        match marker {
            Some(m) if raw.starts_with(m) => Segment::Wildcard(raw[m.len_utf8()..].to_owned()),
            _ => Segment::Literal(raw.to_owned()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard(_))
    }

    // Does this route segment accept `path_segment` in its position?
    pub(crate) fn accepts(&self, path_segment: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == path_segment,
            Segment::Wildcard(_) => true,
        }
    }
}

/// Split `input` on `separator`, or return it whole when no separator is set.
///
/// Empty segments are kept: `"/a"` split on `"/"` yields `["", "a"]`.
pub fn split<'a>(input: &'a str, separator: Option<&str>) -> Vec<&'a str> {
    match separator {
        Some(sep) => input.split(sep).collect(),
        None => vec![input],
    }
}

/// Signature of a route: first character per segment, wildcards replaced by
/// [`WILDCARD_SENTINEL`]. Empty segments contribute nothing.
pub fn route_signature(segments: &[Segment]) -> String {
    segments
        .iter()
        .filter_map(|seg| match seg {
            Segment::Wildcard(_) => Some(WILDCARD_SENTINEL),
            Segment::Literal(lit) => lit.chars().next(),
        })
        .collect()
}

/// Signature of a concrete path: plain first characters, no substitution.
pub fn path_signature(segments: &[&str]) -> String {
    segments.iter().filter_map(|s| s.chars().next()).collect()
}

/// Total order used for sorting and searching signatures.
///
/// Lexicographic by code point; a strict prefix sorts before the longer string.
/// This is exactly Rust's `str` ordering, since UTF-8 byte order preserves
/// code-point order.
pub fn compare_strings(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(raw: &[&str], marker: Option<char>) -> Vec<Segment> {
        raw.iter().map(|s| Segment::parse(s, marker)).collect()
    }

    // ── split ────────────────────────────────────────────────────────────────

    #[test]
    fn split_on_separator() {
        assert_eq!(split("get/a/b", Some("/")), vec!["get", "a", "b"]);
    }

    #[test]
    fn split_without_separator_is_whole_string() {
        assert_eq!(split("get/a/b", None), vec!["get/a/b"]);
    }

    #[test]
    fn split_keeps_empty_segments() {
        assert_eq!(split("/a/", Some("/")), vec!["", "a", ""]);
    }

    #[test]
    fn split_multi_char_separator() {
        assert_eq!(split("a::b::c", Some("::")), vec!["a", "b", "c"]);
    }

    // ── Segment ──────────────────────────────────────────────────────────────

    #[test]
    fn segment_parse_wildcard_strips_marker() {
        assert_eq!(
            Segment::parse(":id", Some(':')),
            Segment::Wildcard("id".into())
        );
    }

    #[test]
    fn segment_parse_without_marker_is_literal() {
        assert_eq!(Segment::parse(":id", None), Segment::Literal(":id".into()));
    }

    #[test]
    fn segment_accepts() {
        assert!(Segment::Literal("a".into()).accepts("a"));
        assert!(!Segment::Literal("a".into()).accepts("b"));
        assert!(Segment::Wildcard("x".into()).accepts("anything"));
    }

    // ── signatures ───────────────────────────────────────────────────────────

    #[test]
    fn route_signature_plain() {
        let segs = parse_all(&["get", "b", "a"], Some(':'));
        assert_eq!(route_signature(&segs), "gba");
    }

    #[test]
    fn route_signature_substitutes_sentinel() {
        let segs = parse_all(&["get", "a", ":b"], Some(':'));
        let sig = route_signature(&segs);
        assert_eq!(sig, format!("ga{WILDCARD_SENTINEL}"));
    }

    #[test]
    fn route_signature_without_marker_keeps_colon() {
        let segs = parse_all(&["get", ":b"], None);
        assert_eq!(route_signature(&segs), "g:");
    }

    #[test]
    fn signature_skips_empty_segments() {
        assert_eq!(path_signature(&["", "users", ""]), "u");
    }

    #[test]
    fn path_signature_is_first_letters() {
        assert_eq!(path_signature(&["patch", "c", "b3"]), "pcb");
    }

    // ── compare_strings ──────────────────────────────────────────────────────

    #[test]
    fn compare_prefix_sorts_first() {
        assert_eq!(compare_strings("ga", "gab"), Ordering::Less);
        assert_eq!(compare_strings("gab", "ga"), Ordering::Greater);
        assert_eq!(compare_strings("gab", "gab"), Ordering::Equal);
    }

    #[test]
    fn sentinel_sorts_after_ordinary_characters() {
        let wild = format!("g{WILDCARD_SENTINEL}");
        for c in ['a', 'z', '~', 'é', '中', '\u{FFFD}'] {
            assert_eq!(compare_strings(&format!("g{c}"), &wild), Ordering::Less);
        }
    }
}

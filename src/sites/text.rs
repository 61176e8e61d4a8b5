use std::sync::LazyLock;

use regex::Regex;

static POSTAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\d{5}(?:-\d{4})?$").expect("postal suffix regex"));
static TRAILING_PAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)$").expect("trailing paren regex"));

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Turn a section heading into a lookup key: lowercase, keep only ASCII
/// letters, digits and whitespace, then replace each whitespace run with `_`.
/// Only the heading itself is trimmed, so "Skills :" keeps its trailing `_`.
pub fn normalize_header(header: &str) -> String {
    let kept: String = header
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    WHITESPACE_RUN.replace_all(&kept, "_").into_owned()
}

/// "San Francisco, CA 94105" -> "San Francisco, CA"
pub fn strip_postal_code(location: &str) -> String {
    POSTAL_SUFFIX.replace(location.trim(), "").trim().to_string()
}

/// "Backend Engineer (W)" -> "Backend Engineer"
pub fn strip_trailing_parenthetical(s: &str) -> String {
    TRAILING_PAREN.replace(s.trim(), "").trim().to_string()
}

pub fn collapse_whitespace(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                if !buf.is_empty() { buf.push(' '); }
                in_ws = true;
            }
        } else {
            buf.push(ch);
            in_ws = false;
        }
    }
    buf.trim().to_string()
}

// trim every line and drop blank ones; keeps paragraph/list structure of section bodies
pub fn normalize_block(s: &str) -> String {
    let mut out = String::new();
    for line in s.lines() {
        let trimmed = collapse_whitespace(line);
        if trimmed.is_empty() { continue; }
        if !out.is_empty() { out.push('\n'); }
        out.push_str(&trimmed);
    }
    out
}

pub fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_keys() {
        assert_eq!(normalize_header("Required Skills:"), "required_skills");
        assert_eq!(normalize_header("Nice-to-Haves!"), "nicetohaves");
        assert_eq!(normalize_header("  What   You'll Do  "), "what_youll_do");
        assert_eq!(normalize_header("Skills :"), "skills_");
        assert_eq!(normalize_header("Who You Are -"), "who_you_are_");
        assert_eq!(normalize_header("- Perks"), "_perks");
        assert_eq!(normalize_header("!!!"), "");
    }

    #[test]
    fn postal_codes_are_stripped() {
        assert_eq!(strip_postal_code("San Francisco, CA 94105"), "San Francisco, CA");
        assert_eq!(strip_postal_code("New York, NY 10001-1234"), "New York, NY");
        assert_eq!(strip_postal_code("Remote"), "Remote");
        // only a trailing code counts
        assert_eq!(strip_postal_code("94105 Main St, Springfield"), "94105 Main St, Springfield");
    }

    #[test]
    fn trailing_parenthetical() {
        assert_eq!(strip_trailing_parenthetical("Backend Engineer (W) "), "Backend Engineer");
        assert_eq!(strip_trailing_parenthetical("Engineer (Platform) Lead"), "Engineer (Platform) Lead");
    }

    #[test]
    fn block_keeps_lines() {
        let got = normalize_block("\n   First   line \n\n\t second\n  ");
        assert_eq!(got, "First line\nsecond");
    }
}

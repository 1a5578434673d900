// src/domain/level.rs

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// True when `needle` occurs in `haystack` once whitespace is removed and case is ignored.
///
/// Serves both header recognition and grade filtering. Because whitespace is
/// dropped, `"CGC 7"` also matches `"CGC70"`; callers accept that over-match.
pub fn matches(needle: &str, haystack: &str) -> bool {
    squash(haystack).contains(&squash(needle))
}

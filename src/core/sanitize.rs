// src/core/sanitize.rs

/// Trim any run of characters drawn from `set` off both ends.
/// The set is a bag of characters, not a substring.
pub fn strip_set<'a>(s: &'a str, set: &str) -> &'a str {
    s.trim_matches(|c: char| set.contains(c))
}

/// Apply several `strip_set` passes in order.
pub fn strip_passes<'a>(s: &'a str, passes: &[&str]) -> &'a str {
    passes.iter().fold(s, |acc, set| strip_set(acc, set))
}

/// Last `n` characters (whole string when shorter).
pub fn tail_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((i, _)) => &s[i..],
        None => s,
    }
}

/// Everything from the `n`th character on.
pub fn skip_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[i..],
        None => "",
    }
}

/// Largest char boundary at or below `i`.
pub fn floor_boundary(s: &str, mut i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Site names go into the sheet as identifiers: spaces → `_`, no dots.
pub fn site_key(name: &str) -> String {
    name.replace(' ', "_").replace('.', "")
}

/// Length in characters, not bytes.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn take_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Cuts `s` to `max` characters and appends `...` when it was longer.
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if char_len(s) > max {
        format!("{}...", take_chars(s, max))
    } else {
        s.to_string()
    }
}

/// Sentences split on `.`, trimmed, keeping those longer than `min_len` characters.
pub fn split_sentences(text: &str, min_len: usize) -> Vec<&str> {
    text.split('.')
        .map(str::trim)
        .filter(|s| char_len(s) > min_len)
        .collect()
}

use std::collections::HashSet;

use crate::utils::text::char_len;

pub const MAX_CONCEPTS: usize = 30;

const TOKEN_TRIM: &[char] = &[
    '.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '"', '\'', '-',
];

/// Candidate key terms in first-seen order, deduplicated and capped at
/// [`MAX_CONCEPTS`]. A token qualifies when it is title-cased and longer than
/// 3 characters, or longer than 7 characters and purely alphabetic.
pub fn extract_key_concepts(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut concepts = Vec::new();

    for raw in text.split_whitespace() {
        let word = raw.trim_matches(TOKEN_TRIM);
        if !is_candidate(word) {
            continue;
        }
        if seen.insert(word) {
            concepts.push(word.to_string());
            if concepts.len() == MAX_CONCEPTS {
                break;
            }
        }
    }

    tracing::debug!(count = concepts.len(), "extracted key concepts");
    concepts
}

fn is_candidate(word: &str) -> bool {
    let len = char_len(word);
    (is_title_case(word) && len > 3) || (len > 7 && word.chars().all(char::is_alphabetic))
}

/// Uppercase letters may only follow uncased characters and lowercase letters
/// only cased ones; at least one cased character must be present.
fn is_title_case(word: &str) -> bool {
    let mut saw_cased = false;
    let mut previous_cased = false;

    for c in word.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            saw_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            saw_cased = true;
        } else {
            previous_cased = false;
        }
    }

    saw_cased
}

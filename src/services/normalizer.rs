use regex::Regex;
use std::sync::OnceLock;

use crate::utils::text::char_len;

/// Lines at or under this many characters are treated as noise.
const MIN_LINE_LEN: usize = 10;

fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s.,;:!?()\-]").expect("static regex"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Cleans raw extracted text into a single line.
///
/// Characters outside word characters, whitespace and `.,;:!?()-` are
/// removed first, then whitespace runs collapse to one space. Once collapsed
/// the text is a single line, so the short-line filter drops the whole
/// result when it is too short to be useful.
pub fn normalize_text(raw: &str) -> String {
    let stripped = disallowed_chars().replace_all(raw, "");
    let collapsed = whitespace_runs().replace_all(&stripped, " ");

    collapsed
        .split('\n')
        .map(str::trim)
        .filter(|line| char_len(line) > MIN_LINE_LEN)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_strips_symbols() {
        let raw = "  The   Krebs cycle\n\n produces ATP & NADH @ the mitochondria.  ";
        assert_eq!(
            normalize_text(raw),
            "The Krebs cycle produces ATP NADH the mitochondria."
        );
    }

    #[test]
    fn keeps_allowed_punctuation() {
        let raw = "Question: is (this) allowed? Yes; it is - mostly!";
        assert_eq!(normalize_text(raw), raw);
    }

    #[test]
    fn drops_text_that_is_too_short() {
        assert_eq!(normalize_text("tiny text"), "");
        assert_eq!(normalize_text("   \n\t "), "");
        assert_eq!(normalize_text("exactly 10"), "");
        assert_eq!(normalize_text("eleven char"), "eleven char");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "Photosynthesis converts light energy. Chlorophyll absorbs light!",
            "a  &  b   c   d   e   f   g   h",
            "Ünïcödé wörds   stay — dashes go. ©2024 Company Inc.",
            "",
        ];
        for raw in samples {
            let once = normalize_text(raw);
            assert_eq!(normalize_text(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn symbol_removal_does_not_leave_double_spaces() {
        assert_eq!(normalize_text("alpha & beta & gamma"), "alpha beta gamma");
    }
}

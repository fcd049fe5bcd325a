use regex::Regex;
use std::sync::OnceLock;

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Normalize text before it reaches the model: collapse whitespace and make
/// sure the text ends with sentence punctuation.
pub fn prepare_text(text: &str) -> String {
    let mut prepared = whitespace_pattern()
        .replace_all(text, " ")
        .trim()
        .to_string();

    if let Some(last) = prepared.chars().last() {
        if !matches!(last, '.' | '!' | '?') {
            prepared.push('.');
        }
    }

    prepared
}

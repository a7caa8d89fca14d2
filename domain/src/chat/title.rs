//! Session title derivation

use crate::core::string::truncate;

/// Number of leading words taken from the first user message
const TITLE_WORDS: usize = 5;

/// Longest title kept verbatim; longer ones are cut with `...`
const TITLE_MAX_CHARS: usize = 30;

/// Build a session title from the first message sent in it.
pub fn derive_title(content: &str) -> String {
    let head = content
        .split_whitespace()
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    truncate(&head, TITLE_MAX_CHARS)
}

//! String utilities for the domain layer.

/// Truncate a string to at most `max_chars` characters, ending with `...`
/// when anything was cut.
///
/// Counts Unicode scalar values rather than bytes, so titles made of
/// multibyte text get the same visible length as ASCII ones.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let keep = max_chars.saturating_sub(3);
        let head: String = s.chars().take(keep).collect();
        format!("{}...", head)
    }
}

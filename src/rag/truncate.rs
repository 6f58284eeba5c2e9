//! Sentence-safe truncation
//!
//! Lengths are counted in `char`s; cuts always land on a UTF-8 boundary.

/// Truncate `text` to at most `max_chars` characters, cutting after the last
/// `.` inside the window. With no `.` in the window the cut is hard.
pub fn truncate_at_sentence(text: &str, max_chars: usize) -> &str {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text;
    };

    let window = &text[..cut];
    match window.rfind('.') {
        Some(idx) => &window[..=idx],
        None => window,
    }
}

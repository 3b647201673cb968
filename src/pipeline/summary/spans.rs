//! Character ↔ byte offset conversion.
//!
//! Offsets crossing the JSON boundary count Unicode scalar values, which is
//! what the model sees. Rust strings slice on byte offsets.

/// Byte offset of the `char_idx`-th character, or `None` past the end.
///
/// `char_idx == char count` maps to `text.len()`.
pub fn char_to_byte(text: &str, char_idx: usize) -> Option<usize> {
    if char_idx == 0 {
        return Some(0);
    }
    let mut count = 0;
    for (byte_idx, _) in text.char_indices() {
        if count == char_idx {
            return Some(byte_idx);
        }
        count += 1;
    }
    (count == char_idx).then_some(text.len())
}

/// Number of characters before byte offset `byte_idx`.
///
/// `byte_idx` must lie on a char boundary; regex match bounds always do.
pub fn byte_to_char(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx.min(text.len())].chars().count()
}

/// Convert a character span to a byte span, rejecting empty, inverted or
/// out-of-range spans.
pub fn char_span_to_bytes(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    if start >= end {
        return None;
    }
    let start_b = char_to_byte(text, start)?;
    let end_b = char_to_byte(text, end)?;
    Some((start_b, end_b))
}

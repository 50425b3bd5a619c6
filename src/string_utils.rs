//! Character/byte offset conversion
//!
//! Match positions are exchanged as character offsets, while the regex
//! engine and `str` slicing work in UTF-8 byte offsets. These helpers convert
//! between the two without ever slicing inside a multi-byte character.
//!
//! # Example
//! ```ignore
//! let text = "Hei på deg"; // 'å' is 2 bytes
//! assert_eq!(char_index_to_byte_index(text, 6), 7);
//! assert_eq!(byte_index_to_char_index(text, 7), 6);
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundaries
// ─────────────────────────────────────────────────────────────────────────────

/// Check if a byte is the start of a UTF-8 character.
///
/// Continuation bytes look like `10xxxxxx`; everything else starts a character.
#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    (byte & 0b11000000) != 0b10000000
}

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary, capped at the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }

    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

/// Byte length of the character starting at byte `index`.
///
/// Returns 0 at or past the end of the string, or inside a character.
#[inline]
pub fn char_len_at(s: &str, index: usize) -> usize {
    let Some(&b) = s.as_bytes().get(index) else {
        return 0;
    };
    if !is_utf8_char_start(b) {
        return 0;
    }

    if b < 0x80 {
        1
    } else if b < 0xE0 {
        2
    } else if b < 0xF0 {
        3
    } else {
        4
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a character offset to a byte offset.
///
/// Offsets past the last character map to the string length.
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert a byte offset to a character offset.
///
/// A byte offset inside a character counts only the characters before it.
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    s[..byte_index].chars().count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

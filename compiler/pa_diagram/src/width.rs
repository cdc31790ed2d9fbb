//! Display width of diagram text.
//!
//! Half-width code points take one column and everything else takes two.
//! Columns are counted per Unicode scalar value.

/// Columns taken by `c`.
#[inline]
pub fn char_width(c: char) -> usize {
    match u32::from(c) {
        0x0000..=0x0080 | 0xF8F0..=0xF8F3 | 0xFF61..=0xFF9F => 1,
        _ => 2,
    }
}

/// Columns taken by `text`.
pub fn text_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

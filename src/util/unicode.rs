//! Unicode utilities
//!
//! Character classes needed by string-to-number conversion and the
//! code-unit based string payloads.

/// Check if a code point is a line terminator
#[inline]
pub fn is_line_terminator(c: u32) -> bool {
    matches!(c, 0x000A | 0x000D | 0x2028 | 0x2029)
}

/// Check if a code point is whitespace (WhiteSpace or LineTerminator)
#[inline]
pub fn is_whitespace(c: u32) -> bool {
    matches!(
        c,
        0x0009  // Tab
        | 0x000B // Vertical Tab
        | 0x000C // Form Feed
        | 0x0020 // Space
        | 0x00A0 // No-Break Space
        | 0xFEFF // BOM
    ) || is_line_terminator(c)
        || is_unicode_space(c)
}

/// Check if a code point is a Unicode space character (category Zs)
#[inline]
pub fn is_unicode_space(c: u32) -> bool {
    matches!(c, 0x1680 | 0x2000..=0x200A | 0x202F | 0x205F | 0x3000)
}

/// Check if a code unit is a UTF-16 lead (high) surrogate
#[inline]
pub const fn is_lead_surrogate(cu: u16) -> bool {
    cu >= 0xD800 && cu <= 0xDBFF
}

/// Check if a code unit is a UTF-16 trail (low) surrogate
#[inline]
pub const fn is_trail_surrogate(cu: u16) -> bool {
    cu >= 0xDC00 && cu <= 0xDFFF
}

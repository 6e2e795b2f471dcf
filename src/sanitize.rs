//! Merchant name and city normalization.
//!
//! Payment code text fields only reliably support a restricted Latin set.
//! Free text is decomposed (NFD), stripped of combining marks and filtered
//! down to ASCII letters, digits, `_`, `-`, `.` and spaces.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Maximum length of the merchant name field (tag 59).
pub const MAX_NAME_LEN: usize = 25;

/// Maximum length of the merchant city field (tag 60).
pub const MAX_CITY_LEN: usize = 15;

/// Substituted when a name sanitizes to nothing.
pub const FALLBACK_NAME: &str = "PAGAMENTO";

/// Substituted when a city sanitizes to nothing.
pub const FALLBACK_CITY: &str = "BRASIL";

/// Sanitizes a merchant name: never empty, at most 25 characters.
pub fn sanitize_name(text: &str) -> String {
    sanitize_field(text, MAX_NAME_LEN, FALLBACK_NAME)
}

/// Sanitizes a merchant city: never empty, at most 15 characters.
pub fn sanitize_city(text: &str) -> String {
    sanitize_field(text, MAX_CITY_LEN, FALLBACK_CITY)
}

/// Whitespace and line terminators as scanning apps' text rules define them.
///
/// Narrower than `char::is_whitespace`: U+0085 (NEL) is dropped rather than
/// turned into a space, and U+FEFF counts as a space.
fn is_separator(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{000B}'
            | '\u{000C}'
            | '\r'
            | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

fn sanitize_field(text: &str, max_len: usize, fallback: &str) -> String {
    let cleaned: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter_map(|c| {
            if is_separator(c) {
                // Tabs and other separators would otherwise reach the payload.
                Some(' ')
            } else if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    // Every remaining char is ASCII, so byte slicing is char slicing.
    let trimmed = cleaned.trim();
    let truncated = &trimmed[..trimmed.len().min(max_len)];
    let result = truncated.trim_end();

    if result.is_empty() {
        fallback.to_string()
    } else {
        result.to_string()
    }
}

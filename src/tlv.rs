//! Tag-length-value encoding with 2-digit decimal tags and lengths.
//!
//! Field layout: `[tag (2 digits)] [length (2 digits)] [value]`. A nested
//! group is a TLV whose value is the concatenation of inner TLVs.
//!
//! Lengths count UTF-16 code units, which is what scanning apps measure and
//! coincides with the character count for the ASCII values the assembler
//! produces.

use crate::error::{PayloadError, Result};

/// Largest value length a 2-digit length field can declare.
pub const MAX_VALUE_LEN: usize = 99;

/// Size of a field header: 2-digit tag plus 2-digit length.
const HEADER_LEN: usize = 4;

/// Length of `value` as declared in a length field.
pub fn value_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Encodes one field as `tag + zero-padded length + value`.
///
/// `tag` must be two ASCII digits and `value` at most 99 code units long;
/// the assembler guarantees both.
pub fn tlv(tag: &str, value: &str) -> String {
    let len = value_len(value);
    debug_assert!(
        tag.len() == 2 && tag.bytes().all(|b| b.is_ascii_digit()),
        "tag {:?} is not two digits",
        tag
    );
    debug_assert!(len <= MAX_VALUE_LEN, "value for tag {} is {} long", tag, len);

    let mut out = String::with_capacity(HEADER_LEN + value.len());
    out.push_str(tag);
    out.push_str(&format!("{:02}", len));
    out.push_str(value);
    out
}

/// A field recovered by [`TlvReader`], borrowing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvField<'a> {
    /// Two-digit tag.
    pub tag: &'a str,

    /// Raw value, possibly a nested group.
    pub value: &'a str,

    /// Byte offset of the tag within the input.
    pub offset: usize,
}

impl<'a> TlvField<'a> {
    /// Iterates the fields nested inside this field's value.
    pub fn children(&self) -> TlvReader<'a> {
        TlvReader::with_base(self.value, self.offset + HEADER_LEN)
    }
}

/// Iterator over consecutive TLV fields of a string.
///
/// Yields an error and stops on a malformed header or a length that runs
/// past the end of the input.
#[derive(Debug, Clone)]
pub struct TlvReader<'a> {
    input: &'a str,
    pos: usize,
    base: usize,
    failed: bool,
}

impl<'a> TlvReader<'a> {
    /// Creates a reader over `input`.
    pub fn new(input: &'a str) -> Self {
        Self::with_base(input, 0)
    }

    fn with_base(input: &'a str, base: usize) -> Self {
        TlvReader {
            input,
            pos: 0,
            base,
            failed: false,
        }
    }

    fn read_field(&mut self) -> Result<TlvField<'a>> {
        let offset = self.base + self.pos;
        let rest = &self.input[self.pos..];

        let header = match rest.get(..HEADER_LEN) {
            Some(h) => h,
            None if rest.len() < HEADER_LEN => return Err(PayloadError::Truncated { offset }),
            None => {
                return Err(PayloadError::InvalidHeader {
                    offset,
                    header: rest.chars().take(HEADER_LEN).collect(),
                })
            }
        };
        if !header.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PayloadError::InvalidHeader {
                offset,
                header: header.to_string(),
            });
        }

        let tag = &header[..2];
        // Safety: both bytes checked as ASCII digits above
        let declared: usize = header[2..].parse().expect("two ASCII digits");

        let body = &rest[HEADER_LEN..];
        let mut units = 0;
        let mut end = body.len();
        for (idx, c) in body.char_indices() {
            if units >= declared {
                end = idx;
                break;
            }
            units += c.len_utf16();
        }
        // Short input, or a declared length that splits a surrogate pair.
        if units != declared {
            return Err(PayloadError::LengthOverrun {
                tag: tag.to_string(),
                offset,
                declared,
                available: units,
            });
        }

        self.pos += HEADER_LEN + end;
        Ok(TlvField {
            tag,
            value: &body[..end],
            offset,
        })
    }
}

impl<'a> Iterator for TlvReader<'a> {
    type Item = Result<TlvField<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.input.len() {
            return None;
        }
        let field = self.read_field();
        self.failed = field.is_err();
        Some(field)
    }
}

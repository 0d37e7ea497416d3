//! Text decoding with a fixed list of fallback encodings.
//!
//! Decoding is strict: a buffer either decodes cleanly under one of the
//! encodings in [`TextEncoding::PRIORITY`] or it is reported as undecodable.
//! The first encoding that accepts the bytes wins, so a buffer that is valid
//! under several encodings is always read as the earliest one.

use encoding_rs::{DecoderResult, Encoding, SHIFT_JIS, UTF_8};

/// Encodings tried by [`decode_text`], in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, with a leading byte-order mark stripped when present.
    Utf8,
    /// Shift_JIS as browsers decode it (the Windows-31J / CP932 superset).
    ShiftJis,
}

impl TextEncoding {
    pub const PRIORITY: [TextEncoding; 2] = [TextEncoding::Utf8, TextEncoding::ShiftJis];

    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::ShiftJis => "shift_jis",
        }
    }

    fn encoding(self) -> &'static Encoding {
        match self {
            Self::Utf8 => UTF_8,
            Self::ShiftJis => SHIFT_JIS,
        }
    }

    /// Strictly decode `bytes`.
    ///
    /// When `last` is false the buffer is treated as a prefix of a longer
    /// stream, so a multi-byte sequence cut off at the end is not an error.
    fn decode_strict(self, bytes: &[u8], last: bool) -> Option<String> {
        let mut decoder = match self {
            Self::Utf8 => UTF_8.new_decoder_with_bom_removal(),
            Self::ShiftJis => SHIFT_JIS.new_decoder_without_bom_handling(),
        };
        let capacity = decoder.max_utf8_buffer_length_without_replacement(bytes.len())?;
        let mut text = String::with_capacity(capacity);
        let (result, _read) = decoder.decode_to_string_without_replacement(bytes, &mut text, last);
        match result {
            DecoderResult::InputEmpty => Some(text),
            DecoderResult::OutputFull | DecoderResult::Malformed(_, _) => None,
        }
    }

    /// Decode `bytes`, substituting U+FFFD for malformed sequences.
    pub fn decode_lossy(self, bytes: &[u8]) -> String {
        let (text, _had_errors) = match self {
            Self::Utf8 => UTF_8.decode_with_bom_removal(bytes),
            Self::ShiftJis => self.encoding().decode_without_bom_handling(bytes),
        };
        text.into_owned()
    }
}

/// Successfully decoded text and the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Decode a complete buffer with the first encoding that accepts it.
pub fn decode_text(bytes: &[u8]) -> Option<Decoded> {
    decode_with(bytes, true)
}

/// Decode a leading sample of a file.
///
/// Unlike [`decode_text`], a character split by the end of the sample does
/// not make the sample undecodable.
pub fn decode_prefix(bytes: &[u8]) -> Option<Decoded> {
    decode_with(bytes, false)
}

fn decode_with(bytes: &[u8], last: bool) -> Option<Decoded> {
    TextEncoding::PRIORITY.iter().find_map(|&encoding| {
        encoding.decode_strict(bytes, last).map(|text| Decoded { text, encoding })
    })
}

/// Decode arbitrary bytes for display, never failing.
///
/// Used for command output, where the caller always needs a string.
pub fn decode_or_replace(bytes: &[u8]) -> String {
    match decode_text(bytes) {
        Some(decoded) => decoded.text,
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

//! Shared helpers: decoding, classification, hashing

pub mod classify;
pub mod encoding;
pub mod hashing;

pub use classify::{classify_content, ExclusionRules};
pub use encoding::{decode_or_replace, decode_text, Decoded, TextEncoding};
pub use hashing::sha256_file;

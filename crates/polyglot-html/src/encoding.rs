//! Encoding detection and transcoding.
//!
//! Turns the raw input bytes into text before tokenization. Detection order:
//!
//! 1. An encoding supplied by the caller wins. A byte order mark for that same
//!    encoding is skipped.
//! 2. A byte order mark (`EF BB BF`, `FE FF`, `FF FE`).
//! 3. UTF-16 without a BOM, recognised by the `<?` of a declaration
//!    (`3C 00 3F 00` or `00 3C 00 3F`).
//! 4. The `encoding="..."` pseudo-attribute of an `<?xml ...?>` declaration,
//!    read from the ASCII-compatible prefix of the input.
//! 5. UTF-8.
//!
//! Transcoding goes through `encoding_rs` with replacement disabled: a byte
//! sequence that is invalid for the chosen encoding is an error, never U+FFFD.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use thiserror::Error;

/// How far into the input the XML declaration is searched for.
const DECLARATION_SCAN_LIMIT: usize = 1024;

/// The declared or sniffed encoding cannot decode the byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("encoding error: {message}")]
pub struct EncodingError {
    /// A human-readable description of the encoding error.
    pub message: String,
}

impl EncodingError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Resolve an encoding label (`"utf-8"`, `"ISO-8859-1"`, `"latin1"`, ...)
/// using the WHATWG Encoding Standard label table.
///
/// # Errors
///
/// Returns an error if the label is not recognised.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding, EncodingError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| EncodingError::new(format!("unsupported encoding: {label}")))
}

/// Detect the encoding of `bytes` without a caller override.
///
/// Returns the encoding and the number of leading BOM bytes to skip.
#[must_use]
pub fn sniff_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return (encoding, bom_len);
    }

    if bytes.starts_with(&[0x3C, 0x00, 0x3F, 0x00]) {
        return (UTF_16LE, 0);
    }
    if bytes.starts_with(&[0x00, 0x3C, 0x00, 0x3F]) {
        return (UTF_16BE, 0);
    }

    let declared = declared_encoding(bytes).and_then(|label| Encoding::for_label(label.as_bytes()));
    match declared {
        // A UTF-16 label inside ASCII-compatible bytes is a lie; the bytes
        // we just read it from prove the document is not UTF-16.
        Some(encoding) if encoding == UTF_16LE || encoding == UTF_16BE => (UTF_8, 0),
        Some(encoding) => (encoding, 0),
        None => (UTF_8, 0),
    }
}

/// Decode `bytes` to text, with an optional caller-supplied encoding label.
///
/// # Errors
///
/// Returns an error if the label is unknown or the bytes are not valid in
/// the selected encoding.
pub fn decode_bytes(bytes: &[u8], encoding: Option<&str>) -> Result<String, EncodingError> {
    let (encoding, skip) = match encoding {
        Some(label) => {
            let encoding = encoding_for_label(label)?;
            let skip = match Encoding::for_bom(bytes) {
                Some((bom_encoding, bom_len)) if bom_encoding == encoding => bom_len,
                _ => 0,
            };
            (encoding, skip)
        }
        None => sniff_encoding(bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[skip..])
        .map(Cow::into_owned)
        .ok_or_else(|| {
            EncodingError::new(format!(
                "malformed byte sequence for encoding {}",
                encoding.name()
            ))
        })
}

/// Extracts the `encoding` pseudo-attribute from an XML declaration at the
/// start of `bytes`, treating them as ASCII.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let scan = &bytes[..bytes.len().min(DECLARATION_SCAN_LIMIT)];
    if !scan.starts_with(b"<?xml") {
        return None;
    }

    let decl_end = scan.windows(2).position(|w| w == b"?>")?;
    let decl = &scan[..decl_end];

    let needle = b"encoding";
    let enc_pos = decl.windows(needle.len()).position(|w| w == needle)?;
    let after_enc = skip_ascii_whitespace(&decl[enc_pos + needle.len()..]);
    let after_eq = skip_ascii_whitespace(after_enc.strip_prefix(b"=")?);

    let quote = *after_eq.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value = &after_eq[1..];
    let end = value.iter().position(|&b| b == quote)?;
    let label = &value[..end];

    if label.is_ascii() {
        Some(String::from_utf8_lossy(label).into_owned())
    } else {
        None
    }
}

/// Skips leading ASCII whitespace bytes (space, tab, CR, LF).
fn skip_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .count();
    &bytes[skip..]
}

#[cfg(test)]
mod tests {
    use encoding_rs::WINDOWS_1252;

    use super::*;

    #[test]
    fn test_sniff_utf8_bom() {
        let (encoding, skip) = sniff_encoding(b"\xEF\xBB\xBF<p/>");
        assert_eq!(encoding, UTF_8);
        assert_eq!(skip, 3);
    }

    #[test]
    fn test_sniff_utf16le_bom() {
        let (encoding, skip) = sniff_encoding(b"\xFF\xFE<\x00p\x00");
        assert_eq!(encoding, UTF_16LE);
        assert_eq!(skip, 2);
    }

    #[test]
    fn test_sniff_utf16be_without_bom() {
        let (encoding, skip) = sniff_encoding(b"\x00<\x00?\x00x\x00m\x00l");
        assert_eq!(encoding, UTF_16BE);
        assert_eq!(skip, 0);
    }

    #[test]
    fn test_sniff_declaration() {
        let (encoding, _) = sniff_encoding(b"<?xml version=\"1.0\" encoding = 'ISO-8859-1'?><p/>");
        // The WHATWG label table maps ISO-8859-1 to windows-1252
        assert_eq!(encoding, WINDOWS_1252);
    }

    #[test]
    fn test_sniff_ignores_utf16_label_in_ascii_bytes() {
        let (encoding, _) = sniff_encoding(b"<?xml version=\"1.0\" encoding=\"UTF-16\"?><p/>");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn test_default_is_utf8() {
        assert_eq!(sniff_encoding(b"<p>hi</p>"), (UTF_8, 0));
        assert_eq!(sniff_encoding(b""), (UTF_8, 0));
    }

    #[test]
    fn test_decode_latin1_override() {
        let text = decode_bytes(b"caf\xE9", Some("latin1")).unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn test_decode_override_skips_matching_bom() {
        let text = decode_bytes(b"\xEF\xBB\xBFok", Some("utf-8")).unwrap();
        assert_eq!(text, "ok");
    }

    #[test]
    fn test_decode_invalid_utf8_is_error() {
        let err = decode_bytes(b"<p>\xFF</p>", None).unwrap_err();
        assert!(err.message.contains("UTF-8"));
    }

    #[test]
    fn test_unknown_label_is_error() {
        let err = decode_bytes(b"x", Some("no-such-charset")).unwrap_err();
        assert_eq!(err.message, "unsupported encoding: no-such-charset");
    }
}

//! Quoted-string escaping shared by the notation parser and formatter.
//!
//! Control bytes and every byte outside printable ASCII are written as
//! `\xNN`, with the seven C escapes (`\a \b \t \n \v \f \r`) used for their
//! bytes. The single quote and backslash are backslash-escaped. Everything
//! else, including the double quote, is written verbatim. The output of
//! [`escape_string`] is therefore always printable ASCII.
use alloc::{string::String, vec::Vec};

use crate::{
    error::{NotationError, NotationErrorKind},
    escape_buffer::HexEscapeBuffer,
    memory_stream::MemoryStream,
};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Escapes `bytes` into `out`. `quote` names one more byte that must be
/// backslash-escaped, used for the double-quoted URI form.
pub(crate) fn escape_into(bytes: &[u8], quote: Option<u8>, out: &mut Vec<u8>) {
    for &b in bytes {
        let short = match b {
            0x07 => b'a',
            0x08 => b'b',
            0x09 => b't',
            0x0A => b'n',
            0x0B => b'v',
            0x0C => b'f',
            0x0D => b'r',
            b'\'' | b'\\' => b,
            _ if quote == Some(b) => b,
            0x00..=0x06 | 0x0E..=0x1F | 0x7F..=0xFF => {
                out.extend_from_slice(&[
                    b'\\',
                    b'x',
                    HEX_DIGITS[usize::from(b >> 4)],
                    HEX_DIGITS[usize::from(b & 0x0F)],
                ]);
                continue;
            }
            _ => {
                out.push(b);
                continue;
            }
        };
        out.extend_from_slice(&[b'\\', short]);
    }
}

/// Escapes a string for use between single quotes.
///
/// ```rust
/// use llsd_codec::escape_string;
///
/// assert_eq!(escape_string("parcel '' is naughty."), r"parcel \'\' is naughty.");
/// assert_eq!(escape_string("tab\there"), r"tab\there");
/// assert_eq!(escape_string("é"), r"\xc3\xa9");
/// ```
#[must_use]
pub fn escape_string(s: &str) -> String {
    let mut out = Vec::with_capacity(s.len());
    escape_into(s.as_bytes(), None, &mut out);
    bytes_to_string(out)
}

/// Reverses [`escape_string`].
///
/// Any escaped character other than the C escapes and `\x` stands for
/// itself, so `\'`, `\"` and `\\` all decode to the quoted character.
///
/// # Errors
///
/// Returns an error when the input ends inside an escape sequence or a
/// `\x` escape is followed by something other than two hex digits. Bad hex
/// digits are rejected rather than decoded as zero, so `'\xZZ'` fails to
/// parse instead of yielding a NUL byte.
pub fn unescape_string(s: &str) -> Result<String, NotationError> {
    let mut stream = MemoryStream::new(s.as_bytes());
    read_escaped(&mut stream, None).map(bytes_to_string)
}

fn unescape_char(b: u8) -> u8 {
    match b {
        b'a' => 0x07,
        b'b' => 0x08,
        b'f' => 0x0C,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        b'v' => 0x0B,
        other => other,
    }
}

/// Reads escaped bytes up to the unescaped `delim`, consuming it. With no
/// delimiter the whole stream is decoded.
pub(crate) fn read_escaped(
    stream: &mut MemoryStream<'_>,
    delim: Option<u8>,
) -> Result<Vec<u8>, NotationError> {
    let mut out = Vec::new();
    let mut hex = HexEscapeBuffer::new();
    let mut escaped = false;
    loop {
        let Some(b) = stream.get() else {
            if delim.is_none() && !escaped && !hex.is_pending() {
                return Ok(out);
            }
            return Err(NotationError::new(
                NotationErrorKind::UnexpectedEnd,
                stream.position(),
            ));
        };
        if hex.is_pending() {
            match hex.feed(b) {
                Ok(Some(byte)) => out.push(byte),
                Ok(None) => {}
                Err(kind) => return Err(NotationError::new(kind, stream.position() - 1)),
            }
        } else if escaped {
            escaped = false;
            if b == b'x' {
                hex.begin();
            } else {
                out.push(unescape_char(b));
            }
        } else if b == b'\\' {
            escaped = true;
        } else if Some(b) == delim {
            return Ok(out);
        } else {
            out.push(b);
        }
    }
}

/// Converts decoded string bytes, replacing invalid UTF-8 sequences.
pub(crate) fn bytes_to_string(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => {
            log::warn!("replacing invalid UTF-8 in string value: {}", err.utf8_error());
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

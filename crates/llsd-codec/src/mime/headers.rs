use alloc::string::{String, ToString};

use bstr::ByteSlice;

use crate::error::MimeError;

pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const MIME_VERSION: &str = "MIME-Version";
pub const CONTENT_TRANSFER_ENCODING: &str = "Content-Transfer-Encoding";
pub const CONTENT_ID: &str = "Content-ID";
pub const CONTENT_DESCRIPTION: &str = "Content-Description";

const KNOWN_HEADERS: [&str; 6] = [
    CONTENT_LENGTH,
    CONTENT_TYPE,
    MIME_VERSION,
    CONTENT_TRANSFER_ENCODING,
    CONTENT_ID,
    CONTENT_DESCRIPTION,
];

/// Bytes that end an unquoted boundary parameter.
const BOUNDARY_TERMINATORS: &[u8] = b" ;\r\n\t";

/// Maps a header name to its canonical spelling when it is one of the
/// known MIME headers; other names are returned as given.
///
/// ```rust
/// use llsd_codec::canonical_header_name;
///
/// assert_eq!(canonical_header_name("content-type"), "Content-Type");
/// assert_eq!(canonical_header_name("mime-VERSION"), "MIME-Version");
/// assert_eq!(canonical_header_name("X-Custom"), "X-Custom");
/// ```
#[must_use]
pub fn canonical_header_name(name: &str) -> &str {
    for known in KNOWN_HEADERS {
        if known.eq_ignore_ascii_case(name) {
            return known;
        }
    }
    name
}

/// Extracts the `boundary` parameter of a multipart content type.
///
/// A quoted boundary runs to the closing quote; an unquoted one ends at a
/// space, semicolon, tab, CR or LF.
///
/// ```rust
/// use llsd_codec::boundary_parameter;
///
/// let quoted = boundary_parameter(r#"multipart/mixed; boundary="segment""#).unwrap();
/// let bare = boundary_parameter("multipart/mixed; boundary=segment; x=y").unwrap();
/// assert_eq!(quoted.as_deref(), Some("segment"));
/// assert_eq!(bare, quoted);
/// ```
///
/// # Errors
///
/// Returns [`MimeError::UnterminatedBoundary`] when a quoted boundary has no
/// closing quote.
pub fn boundary_parameter(content_type: &str) -> Result<Option<String>, MimeError> {
    let bytes = content_type.as_bytes();
    let Some(at) = bytes.to_ascii_lowercase().find("boundary=") else {
        return Ok(None);
    };
    let rest = &content_type[at + "boundary=".len()..];
    if let Some(quoted) = rest.strip_prefix('"') {
        let end = quoted.find('"').ok_or(MimeError::UnterminatedBoundary)?;
        return Ok(Some(quoted[..end].to_string()));
    }
    let end = rest
        .as_bytes()
        .find_byteset(BOUNDARY_TERMINATORS)
        .unwrap_or(rest.len());
    Ok(Some(rest[..end].to_string()))
}

//! Header and offset indexing of MIME entities.
//!
//! [`MimeParser`] walks a byte stream holding a MIME entity, possibly
//! multipart and possibly nested, and records for every entity its headers
//! and the offset of its body. Body bytes are skipped, never copied; the
//! caller slices them out of its own buffer using the recorded offsets.
mod headers;
mod index;
mod parser;

pub use headers::{
    CONTENT_DESCRIPTION, CONTENT_ID, CONTENT_LENGTH, CONTENT_TRANSFER_ENCODING, CONTENT_TYPE,
    MIME_VERSION, boundary_parameter, canonical_header_name,
};
pub use index::{Headers, MimeIndex};
pub use parser::MimeParser;

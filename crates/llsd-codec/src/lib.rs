//! Codecs for LLSD structured data and MIME entity indexing.
//!
//! - [`Value`] is the LLSD value tree.
//! - [`NotationParser`] and [`NotationFormatter`] read and write the LLSD
//!   notation text format.
//! - [`MimeParser`] builds a [`MimeIndex`] of headers and body offsets.
//! - [`MemoryStream`] is the byte cursor both parsers read from.
//!
//! The parsers fail softly: [`NotationParser::parse`] returns a count of
//! parsed values, with [`PARSE_FAILURE`] for malformed input, and
//! [`MimeParser::parse_index`] returns a boolean. `Result` based entry
//! points ([`from_notation`], [`NotationParser::try_parse`],
//! [`MimeParser::try_parse_index`]) are layered on top.
//!
//! ```rust
//! use llsd_codec::{from_notation, to_notation, Value};
//!
//! let value = from_notation(b"{'region_x':i8192, 'connect':true}").unwrap();
//! assert_eq!(value["region_x"], Value::Integer(8192));
//! assert_eq!(to_notation(&value), b"{'connect':true,'region_x':i8192}");
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod date;
mod error;
mod escape_buffer;
mod memory_stream;
mod mime;
mod notation;
mod options;
mod value;

#[cfg(test)]
mod tests;

pub use date::Date;
pub use error::{MimeError, NotationError, NotationErrorKind};
pub use memory_stream::MemoryStream;
pub use mime::{
    CONTENT_DESCRIPTION, CONTENT_ID, CONTENT_LENGTH, CONTENT_TRANSFER_ENCODING, CONTENT_TYPE,
    Headers, MIME_VERSION, MimeIndex, MimeParser, boundary_parameter, canonical_header_name,
};
pub use notation::{
    NotationFormatter, NotationParser, PARSE_FAILURE, escape_string, from_notation, to_notation,
    unescape_string,
};
pub use options::{FormatterOptions, MimeOptions, NotationOptions};
pub use value::{Array, Map, Uri, Value, ValueType};

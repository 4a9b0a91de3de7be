//! The LLSD notation text format.
//!
//! | Value | Text |
//! |---|---|
//! | undefined | `!` |
//! | boolean | `true`, `false` (also `t`, `T`, `TRUE`, `1`, `0`, ... on input) |
//! | integer | `i42` |
//! | real | `r1.5` |
//! | uuid | `u3c115e51-04f4-523c-9fa6-98aff1034730` |
//! | string | `'escaped'`, `"escaped"` or `s(5)"raw.."` |
//! | date | `d"2006-02-01T14:29:53.43Z"` |
//! | uri | `l"http://example.com/"` |
//! | binary | `b(6)"random"`, `b64"cmFuZG9t"` or `b16"72616e646f6d"` |
//! | array | `[i1,i2]` |
//! | map | `{'key':value}` |
mod escape;
mod formatter;
mod parser;

use alloc::vec::Vec;

pub use escape::{escape_string, unescape_string};
pub use formatter::NotationFormatter;
pub use parser::{NotationParser, PARSE_FAILURE};

use crate::{error::NotationError, memory_stream::MemoryStream, value::Value};

/// Formats `value` with the default options.
///
/// ```rust
/// use llsd_codec::{to_notation, Value};
///
/// let value = Value::Array(vec![Value::Integer(1), Value::from("hi")]);
/// assert_eq!(to_notation(&value), b"[i1,'hi']");
/// ```
#[must_use]
pub fn to_notation(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    NotationFormatter::default().format(value, &mut out);
    out
}

/// Parses the first value in `input` with the default options. Bytes after
/// that value are ignored.
///
/// # Errors
///
/// Returns the kind and offset of the first malformed token, or
/// [`UnexpectedEnd`](crate::NotationErrorKind::UnexpectedEnd) when `input` is
/// blank or ends inside a value.
pub fn from_notation(input: &[u8]) -> Result<Value, NotationError> {
    NotationParser::default().try_parse(&mut MemoryStream::new(input), input.len())
}

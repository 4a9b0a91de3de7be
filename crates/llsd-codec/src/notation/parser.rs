#![allow(clippy::missing_errors_doc)]

use alloc::vec::Vec;
use core::str;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use uuid::Uuid;

use super::escape::{bytes_to_string, read_escaped};
use crate::{
    date::Date,
    error::{NotationError, NotationErrorKind},
    memory_stream::MemoryStream,
    options::NotationOptions,
    value::{Array, Map, Uri, Value},
};

/// Count returned by [`NotationParser::parse`] for malformed input.
pub const PARSE_FAILURE: i32 = -1;

const UUID_TEXT_LEN: usize = 36;

/// C `isspace`: the ASCII set plus vertical tab.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Parser for the LLSD notation text format.
///
/// The parser reads exactly one value per call and never reads past the
/// byte limit it is given, so concatenated documents can be read one after
/// the other from the same stream.
///
/// # Examples
///
/// ```rust
/// use llsd_codec::{MemoryStream, NotationParser, Value};
///
/// let text = b"[f,t,0,1,{'foo':t,'bar':f}]";
/// let mut stream = MemoryStream::new(text);
/// let mut value = Value::Undefined;
/// let count = NotationParser::default().parse(&mut stream, &mut value, text.len());
/// assert_eq!(count, 8);
/// assert_eq!(value.size(), 5);
/// assert!(value[4]["foo"].as_boolean());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NotationParser {
    options: NotationOptions,
}

impl NotationParser {
    #[must_use]
    pub fn new(options: NotationOptions) -> Self {
        Self { options }
    }

    /// Parses one value from `stream`, reading at most `max_bytes` bytes.
    ///
    /// Returns the number of values parsed: one for each scalar and one for
    /// each container plus everything inside it. Returns `0` when only
    /// whitespace remains and [`PARSE_FAILURE`] when the input is malformed
    /// or ends early. On failure `value` still holds whatever was parsed
    /// before the error, so a truncated map keeps its complete entries.
    ///
    /// The stream is advanced past every byte the parser consumed.
    pub fn parse(&self, stream: &mut MemoryStream<'_>, value: &mut Value, max_bytes: usize) -> i32 {
        let mut view = stream.bounded(max_bytes);
        let result = self.parse_root(&mut view, value);
        stream.skip(view.position());
        match result {
            Ok(count) => {
                log::debug!("notation parser parsed {count} objects");
                i32::try_from(count).unwrap_or(i32::MAX)
            }
            Err(err) => {
                log::info!("notation parse failure: {err}");
                PARSE_FAILURE
            }
        }
    }

    /// Parses one value from `stream`, reading at most `max_bytes` bytes.
    ///
    /// Unlike [`parse`](Self::parse), a stream holding only whitespace is an
    /// [`UnexpectedEnd`](NotationErrorKind::UnexpectedEnd) error, and the
    /// partially parsed value is discarded.
    pub fn try_parse(
        &self,
        stream: &mut MemoryStream<'_>,
        max_bytes: usize,
    ) -> Result<Value, NotationError> {
        let mut view = stream.bounded(max_bytes);
        let mut value = Value::Undefined;
        let result = self.parse_root(&mut view, &mut value);
        stream.skip(view.position());
        match result? {
            0 => Err(end_of_input(&view)),
            _ => Ok(value),
        }
    }

    fn parse_root(&self, s: &mut MemoryStream<'_>, out: &mut Value) -> Result<usize, NotationError> {
        s.take_while(is_space);
        if s.is_eof() {
            return Ok(0);
        }
        self.parse_value(s, out, 0)
    }

    fn parse_value(
        &self,
        s: &mut MemoryStream<'_>,
        out: &mut Value,
        depth: usize,
    ) -> Result<usize, NotationError> {
        s.take_while(is_space);
        let start = s.position();
        let Some(tag) = s.get() else {
            return Err(end_of_input(s));
        };
        *out = Value::Undefined;
        match tag {
            b'{' => {
                self.check_depth(depth, start)?;
                let mut map = Map::new();
                let result = self.parse_map(s, &mut map, depth + 1);
                *out = Value::Map(map);
                return result.map(|count| count + 1);
            }
            b'[' => {
                self.check_depth(depth, start)?;
                let mut array = Array::new();
                let result = self.parse_array(s, &mut array, depth + 1);
                *out = Value::Array(array);
                return result.map(|count| count + 1);
            }
            _ => {}
        }
        *out = parse_scalar(s, tag, start)?;
        Ok(1)
    }

    fn check_depth(&self, depth: usize, offset: usize) -> Result<(), NotationError> {
        match self.options.max_depth {
            Some(max) if depth >= max => Err(NotationError::new(
                NotationErrorKind::DepthExceeded(max),
                offset,
            )),
            _ => Ok(()),
        }
    }

    /// Parses map entries after the opening `{`. While looking for a key,
    /// bytes that cannot start a string are skipped; whitespace and `:` are
    /// skipped between a key and its value.
    fn parse_map(
        &self,
        s: &mut MemoryStream<'_>,
        map: &mut Map,
        depth: usize,
    ) -> Result<usize, NotationError> {
        let mut count = 0;
        loop {
            let Some(c) = s.get() else {
                return Err(end_of_input(s));
            };
            match c {
                b'}' => return Ok(count),
                b'\'' | b'"' | b's' => {
                    s.unget();
                    let key = bytes_to_string(read_string(s)?);
                    s.take_while(|b| is_space(b) || b == b':');
                    let mut child = Value::Undefined;
                    match self.parse_value(s, &mut child, depth) {
                        Ok(n) => {
                            count += n;
                            map.insert(key, child);
                        }
                        Err(err) => {
                            if child.size() > 0 {
                                map.insert(key, child);
                            }
                            return Err(err);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Parses array elements after the opening `[`, skipping whitespace and
    /// commas between them.
    fn parse_array(
        &self,
        s: &mut MemoryStream<'_>,
        array: &mut Array,
        depth: usize,
    ) -> Result<usize, NotationError> {
        let mut count = 0;
        loop {
            s.take_while(|b| is_space(b) || b == b',');
            if s.peek() == Some(b']') {
                s.get();
                return Ok(count);
            }
            let mut child = Value::Undefined;
            match self.parse_value(s, &mut child, depth) {
                Ok(n) => {
                    count += n;
                    array.push(child);
                }
                Err(err) => {
                    if child.size() > 0 {
                        array.push(child);
                    }
                    return Err(err);
                }
            }
        }
    }
}

/// Parses every non-container value after its tag byte. Kept out of line
/// so the recursive map and array frames stay small.
#[inline(never)]
fn parse_scalar(s: &mut MemoryStream<'_>, tag: u8, start: usize) -> Result<Value, NotationError> {
    let value = match tag {
        b'!' => Value::Undefined,
        b'0' => Value::Boolean(false),
        b'1' => Value::Boolean(true),
        b'f' | b'F' => {
            s.take_while(|b| b.is_ascii_alphabetic());
            Value::Boolean(false)
        }
        b't' | b'T' => {
            s.take_while(|b| b.is_ascii_alphabetic());
            Value::Boolean(true)
        }
        b'i' => Value::Integer(parse_integer(s)?),
        b'r' => Value::Real(parse_real(s)?),
        b'u' => Value::Uuid(parse_uuid(s)?),
        b'\'' | b'"' | b's' => {
            s.unget();
            Value::String(bytes_to_string(read_string(s)?))
        }
        b'l' => {
            let text = read_tagged_delimited(s)?;
            Value::Uri(Uri::new(bytes_to_string(text)))
        }
        b'd' => {
            let text = read_tagged_delimited(s)?;
            let date = str::from_utf8(&text)
                .ok()
                .and_then(Date::parse)
                .ok_or_else(|| NotationError::new(NotationErrorKind::InvalidDate, start))?;
            Value::Date(date)
        }
        b'b' => Value::Binary(parse_binary(s)?),
        other => {
            return Err(NotationError::new(
                NotationErrorKind::UnrecognizedTag(other),
                start,
            ));
        }
    };
    Ok(value)
}

fn end_of_input(s: &MemoryStream<'_>) -> NotationError {
    NotationError::new(NotationErrorKind::UnexpectedEnd, s.position())
}

/// Consumes one byte that must be one of `wanted`.
fn expect(s: &mut MemoryStream<'_>, wanted: &[u8], what: &'static str) -> Result<u8, NotationError> {
    match s.get() {
        Some(b) if wanted.contains(&b) => Ok(b),
        Some(_) => Err(NotationError::new(
            NotationErrorKind::Unterminated(what),
            s.position() - 1,
        )),
        None => Err(end_of_input(s)),
    }
}

/// Fails with `kind` at `start`, or with an end-of-input error when the
/// token was cut short by the end of the stream.
fn invalid(s: &MemoryStream<'_>, kind: NotationErrorKind, start: usize) -> NotationError {
    if s.is_eof() {
        end_of_input(s)
    } else {
        NotationError::new(kind, start)
    }
}

fn parse_integer(s: &mut MemoryStream<'_>) -> Result<i32, NotationError> {
    let start = s.position();
    let mut first = true;
    let token = s.take_while(|b| {
        let accept = b.is_ascii_digit() || (first && matches!(b, b'-' | b'+'));
        first = false;
        accept
    });
    str::from_utf8(token)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| invalid(s, NotationErrorKind::InvalidInteger, start))
}

/// Reals take the shortest decimal form plus `nan`, `inf` and `-inf`.
fn parse_real(s: &mut MemoryStream<'_>) -> Result<f64, NotationError> {
    let start = s.position();
    let token = s.take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'));
    str::from_utf8(token)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| invalid(s, NotationErrorKind::InvalidReal, start))
}

fn parse_uuid(s: &mut MemoryStream<'_>) -> Result<Uuid, NotationError> {
    let start = s.position();
    let text = s.read(UUID_TEXT_LEN);
    if text.len() < UUID_TEXT_LEN {
        return Err(end_of_input(s));
    }
    Uuid::try_parse_ascii(text).map_err(|_| NotationError::new(NotationErrorKind::InvalidUuid, start))
}

/// Reads a decimal byte count, as in `s(12)` and `b(12)`.
fn read_length(s: &mut MemoryStream<'_>) -> Result<usize, NotationError> {
    let start = s.position();
    let digits = s.take_while(|b| b.is_ascii_digit());
    str::from_utf8(digits)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| invalid(s, NotationErrorKind::InvalidLength, start))
}

/// Reads exactly `len` bytes.
fn read_exact<'a>(s: &mut MemoryStream<'a>, len: usize) -> Result<&'a [u8], NotationError> {
    let payload = s.read(len);
    if payload.len() < len {
        return Err(end_of_input(s));
    }
    Ok(payload)
}

/// Reads a quoted string (`'…'` or `"…"`) or a raw string (`s(N)"…"`).
fn read_string(s: &mut MemoryStream<'_>) -> Result<Vec<u8>, NotationError> {
    let start = s.position();
    match s.get() {
        Some(quote @ (b'\'' | b'"')) => read_escaped(s, Some(quote)),
        Some(b's') => {
            expect(s, b"(", "string length")?;
            let len = read_length(s)?;
            expect(s, b")", "string length")?;
            expect(s, b"\"'", "string")?;
            let payload = read_exact(s, len)?.to_vec();
            expect(s, b"\"'", "string")?;
            Ok(payload)
        }
        Some(other) => Err(NotationError::new(
            NotationErrorKind::UnrecognizedTag(other),
            start,
        )),
        None => Err(end_of_input(s)),
    }
}

/// Reads the body of `l"…"` or `d"…"`; the byte after the tag is the
/// delimiter.
fn read_tagged_delimited(s: &mut MemoryStream<'_>) -> Result<Vec<u8>, NotationError> {
    let delim = s.get().ok_or_else(|| end_of_input(s))?;
    read_escaped(s, Some(delim))
}

/// Reads binary after the `b` tag: `b(N)"raw"`, `b64"…"` or `b16"…"`.
fn parse_binary(s: &mut MemoryStream<'_>) -> Result<Vec<u8>, NotationError> {
    let start = s.position();
    if s.peek() == Some(b'(') {
        s.get();
        let len = read_length(s)?;
        expect(s, b")", "binary length")?;
        expect(s, b"\"", "binary")?;
        let payload = read_exact(s, len)?.to_vec();
        expect(s, b"\"", "binary")?;
        return Ok(payload);
    }

    let base = s.take_while(|b| b.is_ascii_digit());
    if base != b"64" && base != b"16" {
        return Err(invalid(s, NotationErrorKind::InvalidBinary, start));
    }
    let base64 = base == b"64";
    expect(s, b"\"", "binary")?;
    let encoded = s.take_while(|b| b != b'"');
    expect(s, b"\"", "binary")?;
    let decoded = if base64 {
        STANDARD.decode(encoded).ok()
    } else {
        hex::decode(encoded).ok()
    };
    decoded.ok_or_else(|| NotationError::new(NotationErrorKind::InvalidBinary, start))
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use rstest::rstest;

    use super::{NotationParser, PARSE_FAILURE};
    use crate::{MemoryStream, NotationErrorKind, NotationOptions, Value};

    fn parse(text: &str) -> (i32, Value) {
        let mut stream = MemoryStream::new(text.as_bytes());
        let mut value = Value::Undefined;
        let count = NotationParser::default().parse(&mut stream, &mut value, text.len());
        (count, value)
    }

    #[rstest]
    #[case("!", Value::Undefined)]
    #[case("true", Value::Boolean(true))]
    #[case("TRUE", Value::Boolean(true))]
    #[case("True", Value::Boolean(true))]
    #[case("t", Value::Boolean(true))]
    #[case("T", Value::Boolean(true))]
    #[case("1", Value::Boolean(true))]
    #[case("false", Value::Boolean(false))]
    #[case("FALSE", Value::Boolean(false))]
    #[case("f", Value::Boolean(false))]
    #[case("0", Value::Boolean(false))]
    #[case("i-17", Value::Integer(-17))]
    #[case("i+3", Value::Integer(3))]
    #[case("r1.5e3", Value::Real(1500.0))]
    #[case("r-inf", Value::Real(f64::NEG_INFINITY))]
    #[case("'it\\'s'", Value::from("it's"))]
    #[case("\"g'day\"", Value::from("g'day"))]
    #[case("s(5)\"a'b\"c\"", Value::from("a'b\"c"))]
    #[case("s(3)'x\\y'", Value::from("x\\y"))]
    #[case("b(0)\"\"", Value::Binary(vec![]))]
    #[case("b16\"DEADbeef\"", Value::Binary(vec![0xde, 0xad, 0xbe, 0xef]))]
    #[case("b64\"cmFuZG9t\"", Value::Binary(b"random".to_vec()))]
    fn scalar_literals(#[case] text: &str, #[case] expected: Value) {
        let (count, value) = parse(text);
        assert_eq!(count, 1);
        assert_eq!(value, expected);
    }

    #[test]
    fn whitespace_only_counts_zero() {
        assert_eq!(parse(" \t\r\n").0, 0);
        assert_eq!(parse("").0, 0);
    }

    #[test]
    fn nan_real() {
        let (count, value) = parse("rnan");
        assert_eq!(count, 1);
        assert!(value.as_real().is_nan());
    }

    #[test]
    fn binary_payload_is_opaque() {
        let (count, value) = parse("b(5)\"{[]}\"\"");
        assert_eq!(count, 1);
        assert_eq!(value, Value::Binary(b"{[]}\"".to_vec()));
    }

    #[test]
    fn limit_is_a_hard_stop() {
        let text = b"'abc'i5";
        let mut stream = MemoryStream::new(text);
        let mut value = Value::Undefined;
        let parser = NotationParser::default();
        assert_eq!(parser.parse(&mut stream, &mut value, 4), PARSE_FAILURE);
        assert_eq!(stream.position(), 4);

        stream.reset(text);
        assert_eq!(parser.parse(&mut stream, &mut value, 5), 1);
        assert_eq!(value, Value::from("abc"));
        assert_eq!(parser.parse(&mut stream, &mut value, 2), 1);
        assert_eq!(value, Value::Integer(5));
        assert_eq!(parser.parse(&mut stream, &mut value, 10), 0);
    }

    #[test]
    fn truncated_map_keeps_complete_entries() {
        let (count, value) = parse("{'a':i1,'b':[i2,i3");
        assert_eq!(count, PARSE_FAILURE);
        assert_eq!(value["a"], Value::Integer(1));
        assert_eq!(value["b"], Value::Array(vec![Value::Integer(2), Value::Integer(3)]));
    }

    #[test]
    fn try_parse_reports_offset() {
        let text = b"[i1, i2, ?]";
        let mut stream = MemoryStream::new(text);
        let err = NotationParser::default()
            .try_parse(&mut stream, text.len())
            .unwrap_err();
        assert_eq!(err.kind, NotationErrorKind::UnrecognizedTag(b'?'));
        assert_eq!(err.offset, 9);
    }

    #[test]
    fn depth_limit() {
        let parser = NotationParser::new(NotationOptions { max_depth: Some(2) });
        let mut value = Value::Undefined;

        let ok = b"[[i1]]";
        assert_eq!(parser.parse(&mut MemoryStream::new(ok), &mut value, ok.len()), 3);

        let deep = b"[[[i1]]]";
        let err = parser
            .try_parse(&mut MemoryStream::new(deep), deep.len())
            .unwrap_err();
        assert_eq!(err.kind, NotationErrorKind::DepthExceeded(2));
        assert_eq!(err.offset, 2);
    }

    /// Nesting right at the default limit parses on a thread with the
    /// default stack size, and one level more fails softly.
    #[test]
    fn default_depth_limit_fits_thread_stack() {
        let handle = std::thread::spawn(|| {
            let Some(max) = NotationOptions::default().max_depth else {
                panic!("default depth limit is unset");
            };
            let nested = |depth: usize| {
                let mut text = "[".repeat(depth);
                text.push_str(&"]".repeat(depth));
                text
            };

            let (count, _) = parse(&nested(max));
            assert_eq!(count, i32::try_from(max).unwrap());

            let (count, value) = parse(&nested(max + 1));
            assert_eq!(count, PARSE_FAILURE);
            assert!(value.is_array());
        });
        handle.join().unwrap();
    }
}

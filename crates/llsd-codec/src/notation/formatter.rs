use alloc::{format, vec::Vec};

use super::escape::escape_into;
use crate::{options::FormatterOptions, value::Value};

/// Writes values in the LLSD notation text format.
///
/// Output reads back through [`NotationParser`](crate::NotationParser) to an
/// equal value. Binary payloads are written raw with a byte count and never
/// pass through string escaping.
///
/// ```rust
/// use llsd_codec::{NotationFormatter, Value};
///
/// let mut out = Vec::new();
/// let count = NotationFormatter::default().format(&Value::Binary(b"random".to_vec()), &mut out);
/// assert_eq!(count, 1);
/// assert_eq!(out, b"b(6)\"random\"");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NotationFormatter {
    options: FormatterOptions,
}

impl NotationFormatter {
    #[must_use]
    pub fn new(options: FormatterOptions) -> Self {
        Self { options }
    }

    /// Appends the notation form of `value` to `out` and returns the number
    /// of values written, counting every container and every value inside
    /// one.
    pub fn format(&self, value: &Value, out: &mut Vec<u8>) -> i32 {
        let count = self.write_value(value, out);
        i32::try_from(count).unwrap_or(i32::MAX)
    }

    fn write_value(&self, value: &Value, out: &mut Vec<u8>) -> usize {
        match value {
            Value::Undefined => out.push(b'!'),
            Value::Boolean(b) => out.extend_from_slice(match (self.options.bool_alpha, *b) {
                (true, true) => b"true",
                (true, false) => b"false",
                (false, true) => b"1",
                (false, false) => b"0",
            }),
            Value::Integer(i) => out.extend_from_slice(format!("i{i}").as_bytes()),
            Value::Real(r) => {
                out.push(b'r');
                self.write_real(*r, out);
            }
            Value::Uuid(u) => out.extend_from_slice(format!("u{}", u.hyphenated()).as_bytes()),
            Value::String(s) => {
                out.push(b'\'');
                escape_into(s.as_bytes(), None, out);
                out.push(b'\'');
            }
            Value::Date(d) => out.extend_from_slice(format!("d\"{d}\"").as_bytes()),
            Value::Uri(u) => {
                out.extend_from_slice(b"l\"");
                escape_into(u.as_str().as_bytes(), Some(b'"'), out);
                out.push(b'"');
            }
            Value::Binary(bytes) => {
                out.extend_from_slice(format!("b({})\"", bytes.len()).as_bytes());
                out.extend_from_slice(bytes);
                out.push(b'"');
            }
            Value::Array(array) => {
                let mut count = 1;
                out.push(b'[');
                for (i, item) in array.iter().enumerate() {
                    if i > 0 {
                        out.push(b',');
                    }
                    count += self.write_value(item, out);
                }
                out.push(b']');
                return count;
            }
            Value::Map(map) => {
                let mut count = 1;
                out.push(b'{');
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(b',');
                    }
                    out.push(b'\'');
                    escape_into(key.as_bytes(), None, out);
                    out.extend_from_slice(b"':");
                    count += self.write_value(item, out);
                }
                out.push(b'}');
                return count;
            }
        }
        1
    }

    fn write_real(&self, r: f64, out: &mut Vec<u8>) {
        if r.is_nan() {
            out.extend_from_slice(b"nan");
            return;
        }
        let text = match self.options.real_precision {
            Some(precision) if r.is_finite() => format!("{r:.precision$}"),
            _ => format!("{r}"),
        };
        out.extend_from_slice(text.as_bytes());
    }
}

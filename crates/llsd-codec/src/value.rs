//! LLSD value types and conversions.
//!
//! This module defines the [`Value`] enum, a self-describing tagged union of
//! scalars and containers, together with the loose conversions the LLSD
//! model defines between them (`as_integer` on a string parses it, `as_boolean`
//! on undefined is `false`, and so on).
use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};
use core::{fmt, ops::Index};

use bstr::BStr;
use uuid::Uuid;

use crate::{date::Date, notation};

pub type Map = BTreeMap<String, Value>;
pub type Array = Vec<Value>;

/// A URI value. Stored verbatim; no validation is performed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uri(String);

impl Uri {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Uri {
    fn from(uri: &str) -> Self {
        Self(uri.into())
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Undefined,
    Boolean,
    Integer,
    Real,
    String,
    Uuid,
    Date,
    Uri,
    Binary,
    Array,
    Map,
}

/// A structured data value.
///
/// The `Value` enum can represent any LLSD type:
///
/// - Undefined (the absence of a value)
/// - Boolean
/// - Integer (32-bit signed)
/// - Real (double precision)
/// - String
/// - UUID
/// - Date
/// - URI
/// - Binary
/// - Array
/// - Map
///
/// # Examples
///
/// ```
/// use llsd_codec::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("region_x".to_string(), Value::Integer(8192));
/// let v = Value::Map(map);
/// assert_eq!(v.to_string(), "{'region_x':i8192}");
/// assert_eq!(v["region_x"].as_integer(), 8192);
/// assert!(v["missing"].is_undefined());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Boolean(bool),
    Integer(i32),
    Real(f64),
    String(String),
    Uuid(Uuid),
    Date(Date),
    Uri(Uri),
    Binary(Vec<u8>),
    Array(Array),
    Map(Map),
}

static UNDEFINED: Value = Value::Undefined;

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<Date> for Value {
    fn from(v: Date) -> Self {
        Self::Date(v)
    }
}

impl From<Uri> for Value {
    fn from(v: Uri) -> Self {
        Self::Uri(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Binary(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Map(v)
    }
}

impl Value {
    /// Creates an empty map.
    #[must_use]
    pub fn empty_map() -> Self {
        Self::Map(Map::new())
    }

    /// Creates an empty array.
    #[must_use]
    pub fn empty_array() -> Self {
        Self::Array(Array::new())
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Undefined => ValueType::Undefined,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Integer(_) => ValueType::Integer,
            Self::Real(_) => ValueType::Real,
            Self::String(_) => ValueType::String,
            Self::Uuid(_) => ValueType::Uuid,
            Self::Date(_) => ValueType::Date,
            Self::Uri(_) => ValueType::Uri,
            Self::Binary(_) => ValueType::Binary,
            Self::Array(_) => ValueType::Array,
            Self::Map(_) => ValueType::Map,
        }
    }

    /// Returns `true` if the value is [`Undefined`].
    ///
    /// [`Undefined`]: Value::Undefined
    ///
    /// ```
    /// use llsd_codec::Value;
    ///
    /// assert!(Value::Undefined.is_undefined());
    /// assert!(!Value::Boolean(false).is_undefined());
    /// ```
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    #[must_use]
    pub fn is_defined(&self) -> bool {
        !self.is_undefined()
    }

    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(..))
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(..))
    }

    /// Loose boolean conversion.
    ///
    /// Undefined is `false`; numbers are `true` when non-zero; strings are
    /// `true` when non-empty.
    #[must_use]
    pub fn as_boolean(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Real(r) => *r != 0.0 && !r.is_nan(),
            Self::String(s) => !s.is_empty(),
            _ => false,
        }
    }

    /// Loose integer conversion. Reals truncate toward zero and strings are
    /// parsed; anything unconvertible is `0`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_integer(&self) -> i32 {
        match self {
            Self::Boolean(b) => i32::from(*b),
            Self::Integer(i) => *i,
            Self::Real(r) => *r as i32,
            Self::String(s) => parse_leading_integer(s),
            _ => 0,
        }
    }

    /// Loose real conversion.
    #[must_use]
    pub fn as_real(&self) -> f64 {
        match self {
            Self::Boolean(b) => f64::from(u8::from(*b)),
            Self::Integer(i) => f64::from(*i),
            Self::Real(r) => *r,
            Self::String(s) => s.trim().parse().unwrap_or(0.0),
            Self::Date(d) => d.seconds_since_epoch(),
            _ => 0.0,
        }
    }

    /// Textual rendering of scalars; containers and undefined are empty.
    #[must_use]
    pub fn as_string(&self) -> String {
        match self {
            Self::Boolean(b) => String::from(if *b { "true" } else { "false" }),
            Self::Integer(i) => i.to_string(),
            Self::Real(r) => r.to_string(),
            Self::String(s) => s.clone(),
            Self::Uuid(u) => u.hyphenated().to_string(),
            Self::Date(d) => d.to_string(),
            Self::Uri(u) => u.as_str().into(),
            _ => String::new(),
        }
    }

    /// Strings holding a UUID convert; everything else is the nil UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        match self {
            Self::Uuid(u) => *u,
            Self::String(s) => Uuid::parse_str(s).unwrap_or_default(),
            _ => Uuid::nil(),
        }
    }

    #[must_use]
    pub fn as_binary(&self) -> Vec<u8> {
        match self {
            Self::Binary(b) => b.clone(),
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Date {
        match self {
            Self::Date(d) => *d,
            Self::String(s) => Date::parse(s).unwrap_or_default(),
            Self::Integer(i) => Date::from_seconds(f64::from(*i)),
            Self::Real(r) => Date::from_seconds(*r),
            _ => Date::EPOCH,
        }
    }

    #[must_use]
    pub fn as_uri(&self) -> Uri {
        match self {
            Self::Uri(u) => u.clone(),
            Self::String(s) => Uri::new(s.clone()),
            _ => Uri::default(),
        }
    }

    /// Number of children of a container; scalars have none.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Array(a) => a.len(),
            Self::Map(m) => m.len(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        matches!(self, Self::Map(m) if m.contains_key(key))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(m) => m.get(key),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Array(a) => a.get(index),
            _ => None,
        }
    }

    /// Inserts into a map. An undefined value becomes an empty map first;
    /// any other non-map value is left untouched and `false` is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> bool {
        if self.is_undefined() {
            *self = Self::empty_map();
        }
        match self {
            Self::Map(m) => {
                m.insert(key.into(), value);
                true
            }
            _ => false,
        }
    }

    /// Appends to an array. An undefined value becomes an empty array
    /// first; any other non-array value is left untouched and `false` is
    /// returned.
    pub fn append(&mut self, value: Value) -> bool {
        if self.is_undefined() {
            *self = Self::empty_array();
        }
        match self {
            Self::Array(a) => {
                a.push(value);
                true
            }
            _ => false,
        }
    }

    /// Resets to undefined.
    pub fn clear(&mut self) {
        *self = Self::Undefined;
    }
}

/// Parses an optional sign and leading digits, ignoring the rest.
fn parse_leading_integer(s: &str) -> i32 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    s[..end].parse().unwrap_or(0)
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&UNDEFINED)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.get_index(index).unwrap_or(&UNDEFINED)
    }
}

impl fmt::Display for Value {
    /// Writes the notation form. Binary payloads that are not valid UTF-8
    /// are rendered lossily; use [`to_notation`](crate::to_notation) for the
    /// exact bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = notation::to_notation(self);
        fmt::Display::fmt(BStr::new(&bytes), f)
    }
}

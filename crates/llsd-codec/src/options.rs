/// Options controlling notation output.
///
/// # Examples
///
/// ```rust
/// use llsd_codec::{FormatterOptions, NotationFormatter, Value};
///
/// let formatter = NotationFormatter::new(FormatterOptions {
///     bool_alpha: false,
///     ..Default::default()
/// });
/// let mut out = Vec::new();
/// formatter.format(&Value::Boolean(true), &mut out);
/// assert_eq!(out, b"1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatterOptions {
    /// Emit booleans as `true`/`false` rather than `1`/`0`.
    ///
    /// # Default
    ///
    /// `true`
    pub bool_alpha: bool,

    /// Fixed number of digits after the decimal point for reals.
    ///
    /// When `None` the shortest text that reads back to the same `f64` is
    /// written.
    ///
    /// # Default
    ///
    /// `None`
    pub real_precision: Option<usize>,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            bool_alpha: true,
            real_precision: None,
        }
    }
}

/// Options controlling the notation parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotationOptions {
    /// Maximum nesting of maps and arrays. Deeper input is rejected as
    /// malformed instead of exhausting the call stack. `None` disables the
    /// check.
    ///
    /// # Default
    ///
    /// `Some(256)`, which fits the default 2 MiB thread stack in debug
    /// builds.
    pub max_depth: Option<usize>,
}

impl Default for NotationOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(256),
        }
    }
}

/// Options controlling the MIME indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimeOptions {
    /// Longest header or separator line read in one piece. Longer lines are
    /// consumed in several reads.
    ///
    /// # Default
    ///
    /// `1024`
    pub line_buffer_length: usize,
}

impl Default for MimeOptions {
    fn default() -> Self {
        Self {
            line_buffer_length: 1024,
        }
    }
}

//! Buffering and decoding of two-digit `\xHH` escape sequences.
//!
//! The [`HexEscapeBuffer`] type accumulates up to two ASCII hexadecimal
//! digits (`0-9`, `A-F`, `a-f`) and yields the byte they encode once the
//! second digit arrives. [`begin`](HexEscapeBuffer::begin) arms it when the
//! `\x` prefix is read; after a successful conversion the buffer resets
//! itself so it can decode the next escape.
//!
//! # Errors
//!
//! Feeding a byte that is not an ASCII hex digit returns
//! [`NotationErrorKind::InvalidEscape`] and leaves the buffer empty.
use crate::error::NotationErrorKind;

#[derive(Debug, Default)]
/// Buffer for the two hex digits following `\x` inside a quoted notation
/// string.
pub(crate) struct HexEscapeBuffer {
    pending: bool,
    high: Option<u8>,
}

impl HexEscapeBuffer {
    pub fn new() -> Self {
        Self {
            pending: false,
            high: None,
        }
    }

    /// Starts a new escape after `\x`.
    pub fn begin(&mut self) {
        self.pending = true;
        self.high = None;
    }

    /// Clears a half-decoded escape.
    pub fn reset(&mut self) {
        self.pending = false;
        self.high = None;
    }

    /// Returns `true` between [`begin`](Self::begin) and the second digit.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Feeds one hex digit.
    ///
    /// - Returns `Ok(None)` after the first digit.
    /// - Returns `Ok(Some(byte))` after the second digit and resets.
    pub fn feed(&mut self, digit: u8) -> Result<Option<u8>, NotationErrorKind> {
        let Some(nybble) = hex_nybble(digit) else {
            self.reset();
            return Err(NotationErrorKind::InvalidEscape);
        };
        match self.high.take() {
            None => {
                self.high = Some(nybble);
                Ok(None)
            }
            Some(high) => {
                self.pending = false;
                Ok(Some((high << 4) | nybble))
            }
        }
    }
}

fn hex_nybble(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

//! A read cursor over a caller-owned byte buffer.
//!
//! [`MemoryStream`] presents a borrowed `&[u8]` as a byte stream without
//! copying it and without taking ownership. Every parser in this crate reads
//! through it. Reading past the end never touches memory outside the bound
//! slice: the single-byte operations return `None` and the bulk operations
//! return short reads.
//!
//! # Examples
//!
//! ```rust
//! use llsd_codec::MemoryStream;
//!
//! let mut stream = MemoryStream::new(b"i42,");
//! assert_eq!(stream.peek(), Some(b'i'));
//! assert_eq!(stream.get(), Some(b'i'));
//! assert_eq!(stream.read(2), b"42");
//! assert_eq!(stream.remaining(), 1);
//! ```

/// Cursor over a borrowed byte buffer.
///
/// The stream tracks a read position and never reads beyond the end of the
/// slice it was built from. Bounded sub-views created with
/// [`bounded`](Self::bounded) share the same memory but stop at a caller
/// chosen limit.
#[derive(Debug, Clone, Copy)]
pub struct MemoryStream<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> MemoryStream<'a> {
    /// Creates a stream positioned at the start of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Rebinds the stream to a different buffer and rewinds it.
    pub fn reset(&mut self, buf: &'a [u8]) {
        self.buf = buf;
        self.pos = 0;
    }

    /// Returns a view of at most `limit` bytes starting at the current
    /// position. The returned stream reports positions relative to its own
    /// start.
    #[must_use]
    pub fn bounded(&self, limit: usize) -> MemoryStream<'a> {
        let end = self.pos.saturating_add(limit).min(self.buf.len());
        MemoryStream::new(&self.buf[self.pos..end])
    }

    /// Number of bytes consumed so far.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left before end-of-input.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Length of the bound buffer.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if the bound buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns `true` once every byte has been consumed.
    #[inline]
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Looks at the next byte without consuming it.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    /// Consumes and returns the next byte.
    #[inline]
    pub fn get(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Steps back over the last consumed byte. Returns `false` at the start
    /// of the buffer.
    #[inline]
    pub fn unget(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos -= 1;
        true
    }

    /// Consumes up to `n` bytes and returns them. The result is shorter than
    /// `n` only when the stream runs out.
    pub fn read(&mut self, n: usize) -> &'a [u8] {
        let end = self.pos.saturating_add(n).min(self.buf.len());
        let out = &self.buf[self.pos..end];
        self.pos = end;
        out
    }

    /// Discards up to `n` bytes, returning how many were skipped.
    pub fn skip(&mut self, n: usize) -> usize {
        self.read(n).len()
    }

    /// Consumes bytes through the next `\n` (inclusive), reading no more than
    /// `max` bytes. Returns `None` at end-of-input.
    pub fn read_line(&mut self, max: usize) -> Option<&'a [u8]> {
        if self.is_eof() || max == 0 {
            return None;
        }
        let window = &self.buf[self.pos..self.buf.len().min(self.pos.saturating_add(max))];
        let take = match window.iter().position(|&b| b == b'\n') {
            Some(i) => i + 1,
            None => window.len(),
        };
        Some(self.read(take))
    }

    /// Consumes bytes while `predicate` holds and returns them.
    pub fn take_while<F>(&mut self, mut predicate: F) -> &'a [u8]
    where
        F: FnMut(u8) -> bool,
    {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !predicate(b) {
                break;
            }
            self.pos += 1;
        }
        &self.buf[start..self.pos]
    }

    /// The unread part of the buffer.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}

#[cfg(feature = "std")]
impl std::io::Read for MemoryStream<'_> {
    fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
        let chunk = MemoryStream::read(self, out.len());
        out[..chunk.len()].copy_from_slice(chunk);
        Ok(chunk.len())
    }
}

#[cfg(feature = "std")]
impl std::io::BufRead for MemoryStream<'_> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        Ok(self.rest())
    }

    fn consume(&mut self, amt: usize) {
        self.skip(amt);
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStream;

    #[test]
    fn reads_stop_at_end_of_buffer() {
        let mut stream = MemoryStream::new(b"ab");
        assert_eq!(stream.get(), Some(b'a'));
        assert_eq!(stream.get(), Some(b'b'));
        assert_eq!(stream.get(), None);
        assert_eq!(stream.peek(), None);
        assert!(stream.is_eof());
        assert_eq!(stream.read(10), b"");
    }

    #[test]
    fn unget_restores_previous_byte() {
        let mut stream = MemoryStream::new(b"xy");
        assert!(!stream.unget());
        stream.get();
        assert!(stream.unget());
        assert_eq!(stream.get(), Some(b'x'));
    }

    #[test]
    fn short_bulk_read() {
        let mut stream = MemoryStream::new(b"hello");
        assert_eq!(stream.read(3), b"hel");
        assert_eq!(stream.read(3), b"lo");
        assert_eq!(stream.position(), 5);
    }

    #[test]
    fn reset_rebinds_and_rewinds() {
        let first = b"first";
        let second = b"2nd";
        let mut stream = MemoryStream::new(first);
        stream.skip(4);
        stream.reset(second);
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.len(), 3);
        assert_eq!(stream.get(), Some(b'2'));
    }

    #[test]
    fn bounded_view_hides_trailing_bytes() {
        let mut stream = MemoryStream::new(b"0123456789");
        stream.skip(2);
        let mut view = stream.bounded(3);
        assert_eq!(view.read(10), b"234");
        assert_eq!(view.get(), None);
        // the parent is untouched
        assert_eq!(stream.peek(), Some(b'2'));

        let huge = stream.bounded(usize::MAX);
        assert_eq!(huge.remaining(), 8);
    }

    #[test]
    fn read_line_is_bounded() {
        let mut stream = MemoryStream::new(b"one\r\ntwo-long\r\n");
        assert_eq!(stream.read_line(100), Some(&b"one\r\n"[..]));
        assert_eq!(stream.read_line(3), Some(&b"two"[..]));
        assert_eq!(stream.read_line(100), Some(&b"-long\r\n"[..]));
        assert_eq!(stream.read_line(100), None);
    }

    #[test]
    fn take_while_stops_at_predicate() {
        let mut stream = MemoryStream::new(b"1234,5");
        assert_eq!(stream.take_while(|b| b.is_ascii_digit()), b"1234");
        assert_eq!(stream.peek(), Some(b','));
    }

    #[cfg(feature = "std")]
    #[test]
    fn std_read_impl() {
        use std::io::{BufRead, Read};

        let mut stream = MemoryStream::new(b"line one\nline two");
        let mut first = std::string::String::new();
        BufRead::read_line(&mut stream, &mut first).unwrap();
        assert_eq!(first, "line one\n");

        let mut rest = std::vec::Vec::new();
        stream.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"line two");
    }
}

use alloc::{format, string::String, vec::Vec};

use super::{
    headers::{boundary_parameter, canonical_header_name},
    index::{Headers, MimeIndex},
};
use crate::{error::MimeError, memory_stream::MemoryStream, options::MimeOptions};

fn trim_crlf(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn split_header(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let colon = line.iter().position(|&b| b == b':')?;
    Some((&line[..colon], &line[colon + 1..]))
}

/// Builds a [`MimeIndex`] tree from a MIME entity without copying any body
/// bytes.
///
/// Every read is bounded by the byte limit given to
/// [`parse_index`](Self::parse_index), less what has already been scanned,
/// so a truncated or hostile stream cannot cause scanning past the limit.
/// Running out of input is not an error: the entities indexed so far are
/// kept. A header line without a colon, an unterminated quoted boundary and
/// a missing CRLF after sized content abort the parse.
///
/// # Examples
///
/// ```rust
/// use llsd_codec::{MimeIndex, MimeParser};
///
/// let message = b"Content-Type: multipart/mixed; boundary=\"segment\"\r\n\
///     \r\n\
///     --segment\r\n\
///     Content-Type: text/plain\r\n\
///     Content-Length: 5\r\n\
///     \r\n\
///     hello\r\n\
///     --segment--\r\n";
///
/// let mut index = MimeIndex::new();
/// assert!(MimeParser::default().parse_buffer(message, &mut index));
/// assert!(index.is_multipart());
/// assert_eq!(index.sub_part_count(), 1);
///
/// let part = index.sub_part(0).unwrap();
/// assert_eq!(part.content_length(), 5);
/// assert_eq!(&message[part.offset()..part.offset() + 5], b"hello");
/// ```
#[derive(Debug, Clone)]
pub struct MimeParser {
    options: MimeOptions,
    scan_count: usize,
    more: bool,
    error: Option<MimeError>,
}

impl Default for MimeParser {
    fn default() -> Self {
        Self::new(MimeOptions::default())
    }
}

impl MimeParser {
    #[must_use]
    pub fn new(options: MimeOptions) -> Self {
        Self {
            options,
            scan_count: 0,
            more: true,
            error: None,
        }
    }

    /// Clears the state of a previous parse.
    pub fn reset(&mut self) {
        self.scan_count = 0;
        self.more = true;
        self.error = None;
    }

    /// The error that stopped the last parse, if any.
    #[must_use]
    pub fn error(&self) -> Option<&MimeError> {
        self.error.as_ref()
    }

    /// Bytes consumed by the last parse.
    #[must_use]
    pub fn scan_count(&self) -> usize {
        self.scan_count
    }

    /// Indexes the entity at the current stream position, reading at most
    /// `limit` bytes. Offsets stored in the index are relative to the
    /// starting position.
    ///
    /// Returns `false` when nothing could be indexed or a hard error was
    /// found; see [`error`](Self::error).
    pub fn parse_index(
        &mut self,
        stream: &mut MemoryStream<'_>,
        limit: usize,
        index: &mut MimeIndex,
    ) -> bool {
        self.reset();
        let parsed = self.parse_entity(stream, limit, "", false, index);
        if let Some(err) = &self.error {
            log::info!("mime parse failure: {err}");
        }
        parsed && self.error.is_none()
    }

    /// Indexes the whole of `buffer`.
    pub fn parse_buffer(&mut self, buffer: &[u8], index: &mut MimeIndex) -> bool {
        self.parse_index(&mut MemoryStream::new(buffer), buffer.len(), index)
    }

    /// Like [`parse_index`](Self::parse_index), returning the index or the
    /// reason it could not be built.
    ///
    /// # Errors
    ///
    /// Returns the hard error that aborted the parse, or [`MimeError::Empty`]
    /// when the stream held no headers.
    pub fn try_parse_index(
        &mut self,
        stream: &mut MemoryStream<'_>,
        limit: usize,
    ) -> Result<MimeIndex, MimeError> {
        let mut index = MimeIndex::new();
        if self.parse_index(stream, limit, &mut index) {
            return Ok(index);
        }
        Err(self.error.clone().unwrap_or(MimeError::Empty))
    }

    fn continue_parse(&self) -> bool {
        self.error.is_none() && self.more
    }

    fn remaining(&self, limit: usize) -> usize {
        limit.saturating_sub(self.scan_count)
    }

    fn parse_entity(
        &mut self,
        s: &mut MemoryStream<'_>,
        limit: usize,
        separator: &str,
        is_sub_part: bool,
        index: &mut MimeIndex,
    ) -> bool {
        let Some(headers) = self.parse_headers(s, limit) else {
            return false;
        };
        *index = MimeIndex::with_headers(headers, self.scan_count);
        if index.is_multipart() {
            match boundary_parameter(&index.content_type()) {
                Ok(Some(boundary)) => {
                    self.scan_past_separator(s, limit, &boundary);
                    while self.continue_parse() {
                        let mut part = MimeIndex::new();
                        if !self.parse_entity(s, limit, &boundary, true, &mut part) {
                            break;
                        }
                        index.attach_sub_part(part);
                    }
                    // a nested multipart ends at its own closing boundary;
                    // resume scanning for the enclosing one
                    if is_sub_part && self.error.is_none() && self.remaining(limit) > 0 {
                        self.more = true;
                        self.scan_past_separator(s, limit, separator);
                    }
                }
                Ok(None) => {
                    log::info!("multipart entity without a boundary parameter");
                    self.more = false;
                }
                Err(err) => self.error = Some(err),
            }
        } else {
            self.scan_past_content(s, limit, index);
            if is_sub_part {
                self.scan_past_separator(s, limit, separator);
            }
        }
        self.error.is_none()
    }

    /// Reads one piece of a line: through `\n`, or up to the line buffer
    /// length or the limit, whichever comes first.
    fn read_piece<'a>(&mut self, s: &mut MemoryStream<'a>, limit: usize) -> Option<&'a [u8]> {
        let max = self.options.line_buffer_length.max(1).min(self.remaining(limit));
        let piece = s.read_line(max)?;
        self.scan_count += piece.len();
        if self.scan_count >= limit {
            self.more = false;
        }
        Some(piece)
    }

    /// Reads a whole line, joining pieces of over-long lines.
    fn read_line(&mut self, s: &mut MemoryStream<'_>, limit: usize) -> Option<Vec<u8>> {
        let mut line: Option<Vec<u8>> = None;
        while let Some(piece) = self.read_piece(s, limit) {
            let buf = line.get_or_insert_with(Vec::new);
            buf.extend_from_slice(piece);
            if piece.ends_with(b"\n") {
                break;
            }
        }
        line
    }

    /// Reads header lines up to the blank line. Returns `None` when no
    /// bytes could be read or a line has no colon.
    fn parse_headers(&mut self, s: &mut MemoryStream<'_>, limit: usize) -> Option<Headers> {
        let mut headers = Headers::new();
        let mut parsed_something = false;
        while self.continue_parse() {
            let line_start = self.scan_count;
            let Some(line) = self.read_line(s, limit) else {
                self.more = false;
                break;
            };
            parsed_something = true;
            if !line.ends_with(b"\n") {
                // ran out of input in the middle of a header line
                self.more = false;
                break;
            }
            let line = trim_crlf(&line);
            if line.is_empty() {
                return Some(headers);
            }
            let Some((name, value)) = split_header(line) else {
                self.error = Some(MimeError::MissingColon(line_start));
                return None;
            };
            let name = String::from_utf8_lossy(name);
            let value = String::from_utf8_lossy(value);
            headers.insert(
                canonical_header_name(name.trim()).into(),
                value.trim_start().into(),
            );
        }
        parsed_something.then_some(headers)
    }

    /// Skips the declared `Content-Length` bytes and the CRLF after them.
    fn scan_past_content(&mut self, s: &mut MemoryStream<'_>, limit: usize, index: &MimeIndex) {
        let Ok(length) = usize::try_from(index.content_length()) else {
            return;
        };
        let skipped = s.skip(length.min(self.remaining(limit)));
        self.scan_count += skipped;
        if skipped < length {
            log::info!("mime content of {length} bytes runs past the end of input");
            self.more = false;
            return;
        }

        let crlf_at = self.scan_count;
        let crlf = s.read(2.min(self.remaining(limit)));
        self.scan_count += crlf.len();
        if self.scan_count >= limit {
            self.more = false;
        }
        if crlf == b"\r\n" {
            return;
        }
        if crlf.len() < 2 && b"\r\n".starts_with(crlf) {
            self.more = false;
            return;
        }
        self.error = Some(MimeError::MissingCrlf(crlf_at));
    }

    /// Skips to just past the next `--separator` line. Stops further parsing
    /// at the closing `--separator--` line or when input runs out.
    fn scan_past_separator(&mut self, s: &mut MemoryStream<'_>, limit: usize, separator: &str) {
        let marker = format!("--{separator}");
        let mut at_line_start = true;
        while self.continue_parse() {
            let Some(piece) = self.read_piece(s, limit) else {
                self.more = false;
                return;
            };
            let line_start = at_line_start;
            at_line_start = piece.ends_with(b"\n");
            if !line_start {
                continue;
            }
            let Some(rest) = piece.strip_prefix(marker.as_bytes()) else {
                continue;
            };
            if rest.starts_with(b"--") {
                self.more = false;
                return;
            }
            if trim_crlf(rest).iter().all(|&b| b == b' ' || b == b'\t') {
                return;
            }
        }
    }
}

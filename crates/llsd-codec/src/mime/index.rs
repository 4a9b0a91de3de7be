use alloc::{collections::BTreeMap, rc::Rc, string::String, vec::Vec};
use core::cell::RefCell;

use super::headers::{CONTENT_LENGTH, CONTENT_TYPE, canonical_header_name};

/// Header name to value, keyed by canonical name for known headers.
pub type Headers = BTreeMap<String, String>;

#[derive(Debug, Default)]
struct Entity {
    headers: Headers,
    offset: usize,
    parts: Vec<MimeIndex>,
}

/// Index node describing one MIME entity.
///
/// Cloning is shallow: clones share the headers, offset and sub-parts, and
/// the entity is freed when the last clone is dropped. Nodes are not
/// thread-safe.
///
/// ```rust
/// use llsd_codec::{Headers, MimeIndex};
///
/// let mut headers = Headers::new();
/// headers.insert("Content-Type".into(), "multipart/mixed; boundary=x".into());
/// let index = MimeIndex::with_headers(headers, 48);
/// let alias = index.clone();
/// assert_eq!(index.use_count(), 2);
///
/// assert!(alias.attach_sub_part(MimeIndex::new()));
/// assert_eq!(index.sub_part_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MimeIndex(Rc<RefCell<Entity>>);

impl MimeIndex {
    /// Creates an empty, non-multipart node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_headers(headers: Headers, offset: usize) -> Self {
        Self(Rc::new(RefCell::new(Entity {
            headers,
            offset,
            parts: Vec::new(),
        })))
    }

    #[must_use]
    pub fn headers(&self) -> Headers {
        self.0.borrow().headers.clone()
    }

    /// Looks up a header; known header names match in any case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<String> {
        self.0.borrow().headers.get(canonical_header_name(name)).cloned()
    }

    /// Byte offset of the entity body, relative to where parsing started.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.0.borrow().offset
    }

    /// The `Content-Length` header, or `-1` when it is absent or not a
    /// number.
    #[must_use]
    pub fn content_length(&self) -> i32 {
        self.header(CONTENT_LENGTH)
            .and_then(|len| len.trim().parse().ok())
            .unwrap_or(-1)
    }

    /// The `Content-Type` header, or an empty string.
    #[must_use]
    pub fn content_type(&self) -> String {
        self.header(CONTENT_TYPE).unwrap_or_default()
    }

    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.0
            .borrow()
            .headers
            .get(CONTENT_TYPE)
            .is_some_and(|ct| ct.starts_with("multipart"))
    }

    #[must_use]
    pub fn sub_part_count(&self) -> usize {
        self.0.borrow().parts.len()
    }

    /// Returns a shared handle to sub-part `n`.
    #[must_use]
    pub fn sub_part(&self, n: usize) -> Option<MimeIndex> {
        self.0.borrow().parts.get(n).cloned()
    }

    /// Appends a sub-part. Only multipart nodes accept sub-parts.
    pub fn attach_sub_part(&self, part: MimeIndex) -> bool {
        if !self.is_multipart() {
            return false;
        }
        self.0.borrow_mut().parts.push(part);
        true
    }

    /// Number of handles sharing this node.
    #[must_use]
    pub fn use_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Headers, MimeIndex};

    fn leaf(content_type: &str, length: &str) -> MimeIndex {
        let mut headers = Headers::new();
        headers.insert("Content-Type".into(), content_type.into());
        headers.insert("Content-Length".into(), length.into());
        MimeIndex::with_headers(headers, 10)
    }

    #[test]
    fn empty_node() {
        let index = MimeIndex::new();
        assert_eq!(index.content_length(), -1);
        assert_eq!(index.content_type(), "");
        assert!(!index.is_multipart());
        assert_eq!(index.offset(), 0);
        assert!(index.sub_part(0).is_none());
    }

    #[test]
    fn leaf_refuses_sub_parts() {
        let index = leaf("text/plain", " 42 ");
        assert_eq!(index.content_length(), 42);
        assert_eq!(index.header("content-type").as_deref(), Some("text/plain"));
        assert!(!index.attach_sub_part(MimeIndex::new()));
        assert_eq!(index.sub_part_count(), 0);
    }

    #[test]
    fn clones_share_state() {
        let parent = leaf("multipart/mixed; boundary=b", "bogus");
        assert_eq!(parent.content_length(), -1);
        let child = leaf("text/plain", "3");
        {
            let alias = parent.clone();
            assert_eq!(parent.use_count(), 2);
            assert!(alias.attach_sub_part(child.clone()));
        }
        assert_eq!(parent.use_count(), 1);
        assert_eq!(child.use_count(), 2);
        let fetched = parent.sub_part(0).unwrap();
        assert_eq!(fetched.content_length(), 3);
        assert_eq!(child.use_count(), 3);
    }
}

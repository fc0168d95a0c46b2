//! Token record - classified byte span plus tree metadata
//!
//! A parsed document is a flat array of these records. The tree exists only
//! through `parent` back-references; children are recovered by forward scans
//! (see `query`). No offsets are ever resolved to owned strings.

/// Sentinel token index meaning "no token" (roots have this as `parent`).
pub const NO_TOKEN: u32 = u32::MAX;

/// Sentinel byte offset meaning "unset" (an open Object has this as `end`).
pub const NO_OFFSET: u32 = u32::MAX;

/// Classification of a token's byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An XML element, from its `<` through its matching close.
    Object,
    /// A standalone quoted string at content level (span excludes quotes).
    String,
    /// The tag name immediately following an Object's `<`.
    TagName,
    /// An attribute name inside a tag.
    AttributeKey,
    /// A quoted attribute value (span excludes quotes).
    AttributeValue,
    /// Reserved for externally injected tokens; never produced by the
    /// parser. The query layer skips it when walking attribute runs.
    Comment,
    /// Unquoted bare text at content level.
    Value,
}

/// A classified span of the source buffer.
///
/// `start`/`end` are half-open byte offsets into the buffer passed to
/// [`Parser::parse`](crate::Parser::parse). `size` counts direct Object
/// children and is meaningful only for `Object` tokens. Offsets are `u32`
/// to keep the record compact (the parser rejects sources too long to
/// address, so the sentinels can never alias a real offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: u32,
    pub end: u32,
    pub size: u32,
    pub parent: u32,
}

impl Token {
    /// The unallocated record: both offsets unset, no parent.
    #[inline]
    pub const fn unset() -> Self {
        Self {
            kind: TokenKind::Value,
            start: NO_OFFSET,
            end: NO_OFFSET,
            size: 0,
            parent: NO_TOKEN,
        }
    }

    /// An Object whose end offset is not yet known.
    #[inline]
    pub const fn is_open(&self) -> bool {
        self.start != NO_OFFSET && self.end == NO_OFFSET
    }

    /// A record the parser has not filled in (or has rolled back).
    #[inline]
    pub const fn is_unset(&self) -> bool {
        self.start == NO_OFFSET
    }

    /// Span length in bytes; 0 while either offset is unset.
    #[inline]
    pub const fn len(&self) -> usize {
        if self.start == NO_OFFSET || self.end == NO_OFFSET {
            0
        } else {
            self.end.saturating_sub(self.start) as usize
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this token is a root (no enclosing Object).
    #[inline]
    pub const fn is_root(&self) -> bool {
        self.parent == NO_TOKEN
    }

    /// Extract the byte span from the source buffer.
    ///
    /// Returns an empty slice for unset or out-of-bounds spans rather than
    /// panicking.
    #[inline]
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        if self.start == NO_OFFSET || self.end == NO_OFFSET {
            return &[];
        }
        let start = self.start as usize;
        let end = self.end as usize;
        if start <= end && end <= input.len() {
            &input[start..end]
        } else {
            &[]
        }
    }

    /// Extract the span as UTF-8 text from the source buffer.
    #[inline]
    pub fn as_str<'a>(&self, input: &'a [u8]) -> Option<&'a str> {
        std::str::from_utf8(self.slice(input)).ok()
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::unset()
    }
}

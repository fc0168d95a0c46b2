//! Query layer - navigating the flat token array as a tree
//!
//! Read-only utilities over `(source, tokens)`. The tree is implicit:
//! there are no child lists, only `parent` back-references and each
//! Object's `size` counter, so children are recovered by forward linear
//! scans filtered on `parent`. No lookup allocates, and every index is
//! bounds checked - out-of-range lookups report "not found", never panic.

use crate::error::CopyError;
use crate::token::{Token, TokenKind};

/// Read-only view over a source buffer and its parsed token array.
///
/// The token slice is usually the filled prefix of the parse array
/// (`&tokens[..parser.token_count()]`); the source must be the exact
/// buffer the tokens were parsed from.
pub struct TokenView<'a> {
    source: &'a [u8],
    tokens: &'a [Token],
}

impl<'a> TokenView<'a> {
    /// Create a view over a source buffer and its token array.
    pub fn new(source: &'a [u8], tokens: &'a [Token]) -> Self {
        TokenView { source, tokens }
    }

    /// Number of tokens in the view.
    #[inline]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Get a token by index.
    #[inline]
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Index of the TagName token immediately following an Object, or
    /// `None` if `object_index` is not an Object or no TagName follows.
    pub fn tag_name(&self, object_index: usize) -> Option<usize> {
        let tok = self.token(object_index)?;
        if tok.kind != TokenKind::Object {
            return None;
        }
        let next = self.token(object_index + 1)?;
        (next.kind == TokenKind::TagName).then_some(object_index + 1)
    }

    /// First direct-child Object of `parent_index` whose tag name matches
    /// `name` byte for byte.
    pub fn object_by_tag(&self, parent_index: usize, name: &str) -> Option<usize> {
        let parent = self.token(parent_index)?;
        if parent.kind != TokenKind::Object {
            return None;
        }
        for index in parent_index + 1..self.tokens.len() {
            let tok = &self.tokens[index];
            if tok.parent as usize != parent_index || tok.kind != TokenKind::Object {
                continue;
            }
            let tag = self.token(index + 1)?;
            if tag.kind == TokenKind::TagName && tag.slice(self.source) == name.as_bytes() {
                return Some(index);
            }
        }
        None
    }

    /// Index of the AttributeValue for `key` on the given Object.
    ///
    /// Walks the run of tokens sharing the Object as parent immediately
    /// after it, skipping TagName and Comment entries and expecting strict
    /// AttributeKey/AttributeValue alternation. Stops at the first
    /// non-attribute entity (e.g. the first child Object) - attributes
    /// always precede children in the grammar this tokenizer accepts.
    pub fn attribute(&self, object_index: usize, key: &str) -> Option<usize> {
        let object = self.token(object_index)?;
        if object.kind != TokenKind::Object {
            return None;
        }
        let mut index = object_index + 1;
        while let Some(tok) = self.token(index) {
            if tok.parent as usize != object_index {
                return None;
            }
            match tok.kind {
                TokenKind::TagName | TokenKind::Comment => {
                    index += 1;
                    continue;
                }
                TokenKind::AttributeKey => {}
                _ => return None,
            }
            let value_index = index + 1;
            let value = self.token(value_index)?;
            if value.kind != TokenKind::AttributeValue {
                return None;
            }
            if tok.slice(self.source) == key.as_bytes() {
                return Some(value_index);
            }
            index = value_index + 1;
        }
        None
    }

    /// Iterator over the indices of an Object's direct child Objects, in
    /// document order. Empty if `object_index` is not an Object.
    pub fn children(&self, object_index: usize) -> Children<'a> {
        let end = match self.token(object_index) {
            Some(tok) if tok.kind == TokenKind::Object => self.tokens.len(),
            _ => 0,
        };
        Children {
            tokens: self.tokens,
            parent: object_index,
            next: object_index.saturating_add(1),
            end,
        }
    }

    /// Index of the n-th (0-based) direct child Object, bounded by the
    /// Object's recorded `size`.
    pub fn nth_child(&self, object_index: usize, n: usize) -> Option<usize> {
        let object = self.token(object_index)?;
        if object.kind != TokenKind::Object || n >= object.size as usize {
            return None;
        }
        self.children(object_index).nth(n)
    }

    /// The token's byte span, or `None` for an out-of-range index. Open
    /// or unset spans read as empty.
    #[inline]
    pub fn text(&self, index: usize) -> Option<&'a [u8]> {
        self.token(index).map(|tok| tok.slice(self.source))
    }

    /// The token's span as UTF-8 text.
    #[inline]
    pub fn text_str(&self, index: usize) -> Option<&'a str> {
        self.token(index).and_then(|tok| tok.as_str(self.source))
    }

    /// Exact length-and-bytes comparison of the token's span against
    /// `literal`; `false` for any out-of-range index.
    pub fn text_equals(&self, index: usize, literal: &str) -> bool {
        match self.token(index) {
            Some(tok) => tok.slice(self.source) == literal.as_bytes(),
            None => false,
        }
    }

    /// Copy the token's span into `out` as a 0-terminated byte string.
    ///
    /// Returns the number of bytes written including the terminator. If
    /// the span does not fit, exactly `out.len() - 1` span bytes are
    /// written plus the terminator and [`CopyError::Truncated`] reports
    /// how many; the copy always terminates within capacity.
    pub fn copy_text(&self, index: usize, out: &mut [u8]) -> Result<usize, CopyError> {
        let Some(tok) = self.token(index) else {
            return Err(CopyError::InvalidIndex);
        };
        let span = tok.slice(self.source);
        if out.is_empty() {
            return Err(CopyError::Truncated { written: 0 });
        }
        if span.len() >= out.len() {
            let written = out.len() - 1;
            out[..written].copy_from_slice(&span[..written]);
            out[written] = 0;
            return Err(CopyError::Truncated { written });
        }
        out[..span.len()].copy_from_slice(span);
        out[span.len()] = 0;
        Ok(span.len() + 1)
    }
}

/// Iterator over an Object's direct child Objects (forward linear scan
/// filtered on `parent`).
pub struct Children<'a> {
    tokens: &'a [Token],
    parent: usize,
    next: usize,
    end: usize,
}

impl Iterator for Children<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.end {
            let index = self.next;
            self.next += 1;
            let tok = &self.tokens[index];
            if tok.kind == TokenKind::Object && tok.parent as usize == self.parent {
                return Some(index);
            }
        }
        None
    }
}

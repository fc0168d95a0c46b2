//! Byte scanning over the source buffer using memchr
//!
//! Uses the memchr crate for fast substring search with SIMD acceleration
//! where available. The scanner never panics: every access is bounds
//! checked and out-of-range reads behave as end of input.

use memchr::{memchr, memmem};

/// Position-based scanner over an immutable byte buffer.
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek at the current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at the byte at an offset from the current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos.wrapping_add(offset)).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Get the remaining bytes
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.pos..).unwrap_or(&[])
    }

    /// Skip whitespace characters (space, tab, newline, carriage return)
    #[inline]
    pub fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() {
            match self.input[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Search forward for an exact byte sequence.
    ///
    /// Returns the position just past the match. The match must begin
    /// before any NUL byte; a NUL ahead of the needle means the buffer's
    /// logical end was reached first and the search fails. The scanner's
    /// position is left untouched either way - the caller commits via
    /// [`set_position`](Self::set_position).
    pub fn find_past(&self, needle: &[u8]) -> Option<usize> {
        let region = self.remaining();
        if needle.is_empty() || needle.len() > region.len() {
            return None;
        }
        let hit = memmem::find(region, needle)?;
        if memchr(0, &region[..hit]).is_some() {
            return None;
        }
        Some(self.pos + hit + needle.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_advance() {
        let mut scanner = Scanner::new(b"<a>");
        assert_eq!(scanner.peek(), Some(b'<'));
        scanner.advance(1);
        assert_eq!(scanner.peek(), Some(b'a'));
        assert_eq!(scanner.peek_at(1), Some(b'>'));
        assert_eq!(scanner.peek_at(2), None);
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = Scanner::new(b"  \t\n hello");
        scanner.skip_whitespace();
        assert_eq!(scanner.position(), 5);
        scanner.skip_whitespace();
        assert_eq!(scanner.position(), 5);
    }

    #[test]
    fn test_find_past() {
        let scanner = Scanner::new(b"<!-- note --><a/>");
        assert_eq!(scanner.find_past(b"-->"), Some(13));
        assert_eq!(scanner.find_past(b"?>"), None);
    }

    #[test]
    fn test_find_past_from_offset() {
        let mut scanner = Scanner::new(b"a = \"1\"");
        scanner.set_position(1);
        assert_eq!(scanner.find_past(b"="), Some(3));
        // Failure leaves the position alone.
        assert_eq!(scanner.find_past(b">"), None);
        assert_eq!(scanner.position(), 1);
    }

    #[test]
    fn test_find_past_stops_at_nul() {
        let scanner = Scanner::new(b"ab\0cd>");
        assert_eq!(scanner.find_past(b">"), None);
        assert_eq!(scanner.find_past(b"b"), Some(2));
    }

    #[test]
    fn test_find_past_needle_longer_than_input() {
        let mut scanner = Scanner::new(b"-->");
        scanner.set_position(1);
        assert_eq!(scanner.find_past(b"-->"), None);
    }
}

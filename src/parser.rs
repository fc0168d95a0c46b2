//! Resumable XML tokenizer - single-pass state machine
//!
//! Appends classified tokens to a caller-owned array and keeps its whole
//! state in three plain fields, so running out of room is recoverable: the
//! caller grows the array (preserving the filled prefix) and calls
//! [`Parser::parse`] again. The rollback step at the top of every call
//! discards the innermost half-parsed element, which makes a sequence of
//! small-capacity calls produce the exact token array one large-capacity
//! call would have.
//!
//! The tokenizer does not validate tag names between open and close pairs;
//! nesting is tracked purely by position. It performs no allocation and
//! retains no reference to the source or the token array across calls.

use crate::error::ParseError;
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind, NO_OFFSET, NO_TOKEN};

/// Parser state carried across resume calls.
///
/// `pos` is the current read offset into the source, `next_token` the
/// count of tokens allocated so far, `open_object` the index of the
/// innermost still-open Object (or [`NO_TOKEN`]). On resume the caller
/// must pass the same logical state together with a token array whose
/// filled prefix is unchanged.
#[derive(Debug, Clone)]
pub struct Parser {
    pos: usize,
    next_token: usize,
    open_object: u32,
}

impl Parser {
    /// Create a parser positioned at the start of a fresh session.
    pub fn new() -> Self {
        Parser {
            pos: 0,
            next_token: 0,
            open_object: NO_TOKEN,
        }
    }

    /// Number of tokens allocated so far (the filled prefix of the array).
    #[inline]
    pub fn token_count(&self) -> usize {
        self.next_token
    }

    /// Current read offset into the source.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Index of the innermost still-open Object, if any. `Some` after a
    /// successful parse means the input ended inside an element.
    #[inline]
    pub fn open_object(&self) -> Option<usize> {
        if self.open_object == NO_TOKEN {
            None
        } else {
            Some(self.open_object as usize)
        }
    }

    /// Tokenize `source` into `tokens`, continuing from the current state.
    ///
    /// Capacity is `tokens.len()`. On [`ParseError::CapacityExhausted`]
    /// grow the array in place and call again; every other error is fatal
    /// for the session. Error paths restore the read position to the start
    /// of the failing construct.
    pub fn parse(&mut self, source: &[u8], tokens: &mut [Token]) -> Result<(), ParseError> {
        if source.len() >= u32::MAX as usize {
            return Err(ParseError::SourceTooLarge { len: source.len() });
        }

        self.rollback(tokens);

        let mut scanner = Scanner::new(source);
        scanner.set_position(self.pos);
        let mut run = Run {
            scanner,
            tokens,
            next_token: self.next_token,
            open_object: self.open_object,
        };
        let result = run.drive();

        self.pos = run.scanner.position();
        self.next_token = run.next_token;
        self.open_object = run.open_object;
        result
    }

    /// Undo the innermost half-parsed element before appending anything.
    ///
    /// Scans backward for the nearest Object token; if it is still open,
    /// the read position rewinds to its `<`, the token count truncates to
    /// its slot, and its parent (if any) gets the child it counted back.
    /// The discarded slots are re-parsed on this call, so a resume sequence
    /// matches a single large-capacity run byte for byte.
    fn rollback(&mut self, tokens: &mut [Token]) {
        let mut index = self.next_token.min(tokens.len());
        while index > 0 {
            index -= 1;
            let tok = tokens[index];
            if tok.kind != TokenKind::Object {
                continue;
            }
            if tok.end == NO_OFFSET {
                log::debug!(
                    target: "flatxml.parser",
                    "rollback: discarding open object {} at byte {}",
                    index,
                    tok.start
                );
                self.pos = tok.start as usize;
                self.next_token = index;
                self.open_object = tok.parent;
                if tok.parent != NO_TOKEN {
                    if let Some(parent) = tokens.get_mut(tok.parent as usize) {
                        parent.size = parent.size.saturating_sub(1);
                    }
                }
            }
            break;
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// One `parse` invocation: the scanner plus the working copies of the
/// state fields, written back by `Parser::parse` on both success and
/// failure.
struct Run<'a, 't> {
    scanner: Scanner<'a>,
    tokens: &'t mut [Token],
    next_token: usize,
    open_object: u32,
}

impl Run<'_, '_> {
    /// Top-level dispatch loop. A NUL byte acts as end of input.
    fn drive(&mut self) -> Result<(), ParseError> {
        loop {
            let byte = match self.scanner.peek() {
                None | Some(0) => return Ok(()),
                Some(b) => b,
            };
            match byte {
                b'<' => self.markup()?,
                b'/' => self.close_object()?,
                b'"' => self.quoted(TokenKind::String)?,
                b'\t' | b'\r' | b'\n' | b' ' | b'=' | b'>' => self.scanner.advance(1),
                // A backslash is an identifier delimiter, so it would yield
                // an empty Value token without consuming input. Reject it.
                b'\\' => {
                    return Err(ParseError::InvalidByte {
                        pos: self.scanner.position(),
                    })
                }
                _ => self.identifier(TokenKind::Value)?,
            }
        }
    }

    /// Dispatch on the byte after `<`: declarations and comments are
    /// consumed without emitting tokens, `</` re-dispatches to the close
    /// handler, anything else opens an Object.
    fn markup(&mut self) -> Result<(), ParseError> {
        let lt = self.scanner.position();
        if self.scanner.peek_at(1).is_none() {
            return Err(ParseError::UnexpectedEof { pos: lt });
        }
        self.scanner.advance(1);
        match self.scanner.peek() {
            Some(b'?') => self.skip_literal("?>"),
            Some(b'!') => {
                if self.scanner.peek_at(1).is_none() {
                    return Err(ParseError::UnexpectedEof {
                        pos: self.scanner.position(),
                    });
                }
                self.scanner.advance(1);
                if self.scanner.peek() == Some(b'-') {
                    self.skip_literal("-->")
                } else {
                    self.skip_literal(">")
                }
            }
            // Leave the position on the `/`; the top-level loop re-
            // dispatches it, so explicit close and self-close share one
            // code path.
            Some(b'/') => Ok(()),
            _ => self.begin_object(lt),
        }
    }

    /// Consume a required literal, positioning just past it.
    fn skip_literal(&mut self, literal: &'static str) -> Result<(), ParseError> {
        let from = self.scanner.position();
        match self.scanner.find_past(literal.as_bytes()) {
            Some(past) => {
                log::trace!(
                    target: "flatxml.parser",
                    "skipped to `{}` at byte {}",
                    literal,
                    past
                );
                self.scanner.set_position(past);
                Ok(())
            }
            None => Err(ParseError::LiteralNotFound { literal, pos: from }),
        }
    }

    /// Open a new Object at `lt` (the offset of its `<`), then parse its
    /// tag name and attribute list. The Object stays open (`end` unset)
    /// until the matching close.
    fn begin_object(&mut self, lt: usize) -> Result<(), ParseError> {
        let Some(index) = self.alloc_token() else {
            self.scanner.set_position(lt);
            return Err(ParseError::CapacityExhausted { pos: lt });
        };
        if self.open_object != NO_TOKEN {
            self.tokens[self.open_object as usize].size += 1;
            self.tokens[index].parent = self.open_object;
        }
        let tok = &mut self.tokens[index];
        tok.kind = TokenKind::Object;
        tok.start = lt as u32;
        self.open_object = index as u32;
        log::trace!(target: "flatxml.parser", "open object {} at byte {}", index, lt);

        self.identifier(TokenKind::TagName)?;
        self.attributes()
    }

    /// Close the innermost open Object. Reached for both `</tag>` (via
    /// re-dispatch) and the `/` of `/>`; tag names are never compared.
    fn close_object(&mut self) -> Result<(), ParseError> {
        let slash = self.scanner.position();
        if self.next_token == 0 {
            return Err(ParseError::UnmatchedClose { pos: slash });
        }
        if self.scanner.peek_at(1).is_none() {
            return Err(ParseError::UnexpectedEof { pos: slash });
        }
        self.scanner.advance(1);
        if self.scanner.peek() != Some(b'>') {
            self.skip_literal(">")?;
        }
        // An adjacent `>` stays put for the silent top-level skip.

        let close = self.scanner.position();
        let mut index = self.next_token - 1;
        loop {
            let Some(tok) = self.tokens.get(index).copied() else {
                break;
            };
            if tok.is_open() {
                if tok.kind != TokenKind::Object {
                    return Err(ParseError::UnmatchedClose { pos: slash });
                }
                self.tokens[index].end = close as u32;
                self.open_object = tok.parent;
                log::trace!(
                    target: "flatxml.parser",
                    "close object {} at byte {}",
                    index,
                    close
                );
                break;
            }
            if tok.parent == NO_TOKEN {
                // Nothing left open; a stray close is consumed silently.
                break;
            }
            index = tok.parent as usize;
        }
        Ok(())
    }

    /// Attribute list: key `=` quoted-value pairs until `/`, `>`, or end
    /// of input. Returns without consuming `/` or `>`, which lets `/>`
    /// fall through to the close handler.
    fn attributes(&mut self) -> Result<(), ParseError> {
        loop {
            match self.scanner.peek() {
                None | Some(0) => return Ok(()),
                Some(_) => {}
            }
            self.skip_whitespace()?;
            match self.scanner.peek() {
                Some(b'/') | Some(b'>') => return Ok(()),
                _ => {}
            }
            self.identifier(TokenKind::AttributeKey)?;
            self.skip_literal("=")?;
            self.skip_whitespace()?;
            self.quoted(TokenKind::AttributeValue)?;
        }
    }

    /// Quoted string (String at content level, AttributeValue in a tag).
    /// The span excludes both quotes. Escapes are validated but not
    /// decoded.
    fn quoted(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        let quote = self.scanner.position();
        self.scanner.advance(1);
        loop {
            match self.scanner.peek() {
                None | Some(0) => break,
                Some(b'"') => {
                    let end = self.scanner.position();
                    let Some(index) = self.alloc_token() else {
                        self.scanner.set_position(quote);
                        return Err(ParseError::CapacityExhausted { pos: quote });
                    };
                    self.scanner.advance(1);
                    let tok = &mut self.tokens[index];
                    tok.kind = kind;
                    tok.start = (quote + 1) as u32;
                    tok.end = end as u32;
                    tok.parent = self.open_object;
                    return Ok(());
                }
                Some(b'\\') => {
                    self.scanner.advance(1);
                    match self.scanner.peek() {
                        Some(b'"') | Some(b'/') | Some(b'\\') | Some(b'b') | Some(b'f')
                        | Some(b'r') | Some(b'n') | Some(b't') => self.scanner.advance(1),
                        _ => {
                            self.scanner.set_position(quote);
                            return Err(ParseError::BadEscape { pos: quote });
                        }
                    }
                }
                Some(_) => self.scanner.advance(1),
            }
        }
        self.scanner.set_position(quote);
        Err(ParseError::UnterminatedString { pos: quote })
    }

    /// Unquoted identifier (TagName, AttributeKey, Value): raw bytes up to
    /// a delimiter. Unlike quoted strings, end of input (or a NUL) bounds
    /// the token instead of failing; any byte outside printable ASCII is
    /// fatal.
    fn identifier(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        let start = self.scanner.position();
        loop {
            match self.scanner.peek() {
                None | Some(0) => break,
                Some(b'\t') | Some(b'\r') | Some(b'\n') | Some(b' ') | Some(b'\\')
                | Some(b'>') | Some(b'<') | Some(b'=') => break,
                Some(b) if !(32..=126).contains(&b) => {
                    self.scanner.set_position(start);
                    return Err(ParseError::InvalidByte { pos: start });
                }
                Some(_) => self.scanner.advance(1),
            }
        }
        let end = self.scanner.position();
        let Some(index) = self.alloc_token() else {
            self.scanner.set_position(start);
            return Err(ParseError::CapacityExhausted { pos: start });
        };
        let tok = &mut self.tokens[index];
        tok.kind = kind;
        tok.start = start as u32;
        tok.end = end as u32;
        tok.parent = self.open_object;
        Ok(())
    }

    /// Skip whitespace inside a tag; running off the end of the input here
    /// is an error with the position restored.
    fn skip_whitespace(&mut self) -> Result<(), ParseError> {
        let from = self.scanner.position();
        self.scanner.skip_whitespace();
        if self.scanner.is_eof() {
            self.scanner.set_position(from);
            return Err(ParseError::UnexpectedEof { pos: from });
        }
        Ok(())
    }

    /// Take the next slot of the token array, reset to the unallocated
    /// record. `None` means capacity is exhausted.
    fn alloc_token(&mut self) -> Option<usize> {
        if self.next_token >= self.tokens.len() {
            return None;
        }
        let index = self.next_token;
        self.next_token += 1;
        self.tokens[index] = Token::unset();
        Some(index)
    }
}

//! flatxml - allocation-free XML tokenizer with a flat-index query layer
//!
//! Tokenizes an immutable byte buffer into a caller-owned array of
//! zero-copy [`Token`] records (byte spans into the source, classified and
//! linked to their enclosing element by index), then navigates that flat
//! array as a tree without ever materializing nodes. The parser is
//! resumable: when the token array runs out of room it reports
//! [`ParseError::CapacityExhausted`] and the caller grows the array and
//! calls [`Parser::parse`] again, producing results identical to a single
//! large-capacity run.
//!
//! This is a structural tokenizer, not a conforming XML processor: no DTD
//! processing, entity expansion, namespace resolution, or tag-name
//! validation between open and close pairs.
//!
//! ```
//! use flatxml::{Parser, Token, TokenView};
//!
//! let source = b"<greeting lang=\"en\"><body/></greeting>";
//! let mut parser = Parser::new();
//! let mut tokens = vec![Token::default(); 4];
//! loop {
//!     match parser.parse(source, &mut tokens) {
//!         Ok(()) => break,
//!         Err(err) if err.is_recoverable() => {
//!             let grown = tokens.len() * 2;
//!             tokens.resize(grown, Token::default());
//!         }
//!         Err(err) => panic!("malformed input: {err}"),
//!     }
//! }
//!
//! let view = TokenView::new(source, &tokens[..parser.token_count()]);
//! let lang = view.attribute(0, "lang").unwrap();
//! assert!(view.text_equals(lang, "en"));
//! let body = view.object_by_tag(0, "body").unwrap();
//! assert_eq!(view.text_str(view.tag_name(body).unwrap()), Some("body"));
//! ```

mod error;
mod parser;
mod query;
mod scanner;
mod token;

pub use error::{CopyError, ParseError};
pub use parser::Parser;
pub use query::{Children, TokenView};
pub use token::{Token, TokenKind, NO_OFFSET, NO_TOKEN};

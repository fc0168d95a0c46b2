//! Integration tests for the public tokenizer contract.
//!
//! Organized by construct; token tables are asserted explicitly where the
//! layout matters.

use flatxml::{ParseError, Parser, Token, TokenKind, TokenView, NO_TOKEN};
use pretty_assertions::assert_eq;

fn parse(source: &[u8]) -> Result<Vec<Token>, ParseError> {
    let mut parser = Parser::new();
    let mut tokens = vec![Token::default(); 256];
    parser.parse(source, &mut tokens)?;
    tokens.truncate(parser.token_count());
    Ok(tokens)
}

fn tok(kind: TokenKind, start: u32, end: u32, size: u32, parent: u32) -> Token {
    Token {
        kind,
        start,
        end,
        size,
        parent,
    }
}

#[test]
fn element_with_attribute_and_self_closing_child() {
    let source = b"<a x=\"1\"><b/></a>";
    let tokens = parse(source).unwrap();
    assert_eq!(
        tokens,
        vec![
            tok(TokenKind::Object, 0, 17, 1, NO_TOKEN),
            tok(TokenKind::TagName, 1, 2, 0, 0),
            tok(TokenKind::AttributeKey, 3, 4, 0, 0),
            tok(TokenKind::AttributeValue, 6, 7, 0, 0),
            tok(TokenKind::Object, 9, 12, 0, 0),
            tok(TokenKind::TagName, 10, 11, 0, 4),
        ]
    );

    let view = TokenView::new(source, &tokens);
    assert_eq!(view.object_by_tag(0, "b"), Some(4));
    let value = view.attribute(0, "x").unwrap();
    assert_eq!(value, 3);
    assert!(view.text_equals(value, "1"));
}

#[test]
fn self_closing_child_sharing_parent_tag_name() {
    // Tag names are positional bookkeeping only.
    let tokens = parse(b"<a><a/></a>").unwrap();
    let objects: Vec<(usize, Token)> = tokens
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, t)| t.kind == TokenKind::Object)
        .collect();
    assert_eq!(objects.len(), 2);
    let (outer_index, outer) = objects[0];
    let (_, inner) = objects[1];
    assert_eq!(outer.size, 1);
    assert_eq!(inner.parent as usize, outer_index);
}

#[test]
fn unterminated_attribute_value_is_fatal() {
    let mut parser = Parser::new();
    let mut tokens = vec![Token::default(); 256];
    let err = parser.parse(b"<a x=\"1", &mut tokens).unwrap_err();
    assert_eq!(err, ParseError::UnterminatedString { pos: 5 });
    assert!(!err.is_recoverable());
    assert!(tokens[..parser.token_count()]
        .iter()
        .all(|t| t.kind != TokenKind::AttributeValue));
}

#[test]
fn prolog_comment_and_doctype_emit_nothing() {
    let source = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
        <!DOCTYPE catalog>\n\
        <!-- generated -->\n\
        <catalog/>";
    let tokens = parse(source).unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Object);
    assert!(TokenView::new(source, &tokens).text_equals(1, "catalog"));
}

#[test]
fn mixed_content_document() {
    let source = b"<book id=\"b1\">\
        <title>The Flat Tree</title>\
        <note>\"quoted text\"</note>\
        </book>";
    let tokens = parse(source).unwrap();
    let view = TokenView::new(source, &tokens);

    assert_eq!(view.token(0).unwrap().size, 2);
    let title = view.object_by_tag(0, "title").unwrap();
    let note = view.object_by_tag(0, "note").unwrap();
    assert_ne!(title, note);

    let values: Vec<&str> = (0..view.token_count())
        .filter(|&i| {
            matches!(
                view.token(i).unwrap().kind,
                TokenKind::Value | TokenKind::String
            )
        })
        .map(|i| view.text_str(i).unwrap())
        .collect();
    assert_eq!(values, vec!["The", "Flat", "Tree", "quoted text"]);
}

#[test]
fn malformed_inputs_classified() {
    let cases: Vec<(&[u8], ParseError)> = vec![
        (b"</a>", ParseError::UnmatchedClose { pos: 1 }),
        (b"<a x=\"\\z\"/>", ParseError::BadEscape { pos: 5 }),
        (b"<a x=\"oops", ParseError::UnterminatedString { pos: 5 }),
        (
            b"<!-- no end",
            ParseError::LiteralNotFound {
                literal: "-->",
                pos: 2,
            },
        ),
        (b"<a/><", ParseError::UnexpectedEof { pos: 4 }),
        (b"<a\x07/>", ParseError::InvalidByte { pos: 1 }),
    ];
    for (source, expected) in cases {
        let err = parse(source).unwrap_err();
        assert_eq!(err, expected, "input: {source:?}");
        assert!(!err.is_recoverable());
    }
}

#[test]
fn nul_bounds_identifier_with_token_emitted() {
    // A NUL ends an unquoted identifier like end of input does; the token
    // is still emitted and the element stays open.
    let source = b"<ab\0";
    let mut parser = Parser::new();
    let mut tokens = vec![Token::default(); 8];
    parser.parse(source, &mut tokens).unwrap();
    assert_eq!(parser.token_count(), 2);
    assert_eq!(tokens[1].kind, TokenKind::TagName);
    assert_eq!(tokens[1].slice(source), b"ab");
    assert_eq!(parser.open_object(), Some(0));
}

#[test]
fn capacity_zero_reports_exhaustion_at_construct_start() {
    let mut parser = Parser::new();
    let mut tokens: Vec<Token> = Vec::new();
    let err = parser.parse(b"  <a/>", &mut tokens).unwrap_err();
    assert_eq!(err, ParseError::CapacityExhausted { pos: 2 });
    assert!(err.is_recoverable());
    assert_eq!(parser.position(), 2);
}

#[test]
fn parser_state_survives_ok_return_mid_document() {
    // Feeding the same buffer again after a clean return is a no-op: the
    // position already sits at the end.
    let source = b"<a><b/></a>";
    let mut parser = Parser::new();
    let mut tokens = vec![Token::default(); 16];
    parser.parse(source, &mut tokens).unwrap();
    let count = parser.token_count();
    parser.parse(source, &mut tokens).unwrap();
    assert_eq!(parser.token_count(), count);
    assert_eq!(parser.position(), source.len());
}

//! flatxml CLI - tokenize XML files and poke at the result.
//!
//! Demo and debugging surface only: everything here goes through the
//! public query API.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser as CliParser, Subcommand};
use flatxml::{Parser, Token, TokenKind, TokenView};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, CliParser)]
#[command(name = "flatxml")]
#[command(about = "Flat-index XML tokenizer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tokenize a file and print the token table
    Tokens(TokensArgs),
    /// Navigate to an element by tag path and print its text or an attribute
    Get(GetArgs),
}

#[derive(Debug, Args)]
struct TokensArgs {
    /// Input XML file
    file: PathBuf,

    /// Initial token capacity (grown on demand, exercising resume)
    #[arg(long, default_value = "16")]
    capacity: usize,
}

#[derive(Debug, Args)]
struct GetArgs {
    /// Input XML file
    file: PathBuf,

    /// Dot-separated tag path starting at a root element,
    /// e.g. `catalog.book.title`
    path: String,

    /// Print this attribute of the final element instead of listing it
    #[arg(short, long)]
    attr: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Tokens(args) => tokens_command(args),
        Command::Get(args) => get_command(args),
    }
}

fn tokens_command(args: TokensArgs) -> Result<()> {
    let source = fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let (parser, tokens) = tokenize(&source, args.capacity)?;
    let view = TokenView::new(&source, &tokens[..parser.token_count()]);

    for index in 0..view.token_count() {
        let Some(tok) = view.token(index) else {
            continue;
        };
        let text = view.text_str(index).unwrap_or("<non-utf8>");
        let parent = if tok.is_root() {
            "-".to_string()
        } else {
            tok.parent.to_string()
        };
        println!(
            "{index:>4}  {:<14} [{:>6}, {:>6})  size {:<3} parent {parent:<4} {text:?}",
            kind_name(tok.kind),
            tok.start,
            tok.end,
            tok.size,
        );
    }
    if let Some(open) = parser.open_object() {
        eprintln!("warning: input ended inside element {open}");
    }
    Ok(())
}

fn get_command(args: GetArgs) -> Result<()> {
    let source = fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let (parser, tokens) = tokenize(&source, 16)?;
    let view = TokenView::new(&source, &tokens[..parser.token_count()]);

    let mut segments = args.path.split('.');
    let root_name = segments.next().context("empty tag path")?;
    let mut current = find_root(&view, root_name)
        .with_context(|| format!("no root element <{root_name}>"))?;
    for segment in segments {
        current = view
            .object_by_tag(current, segment)
            .with_context(|| format!("no child element <{segment}>"))?;
    }

    match args.attr {
        Some(key) => {
            let value = view
                .attribute(current, &key)
                .with_context(|| format!("no attribute `{key}`"))?;
            println!("{}", view.text_str(value).unwrap_or("<non-utf8>"));
        }
        None => {
            let size = view.token(current).map(|t| t.size).unwrap_or(0);
            println!("element token {current}, {size} child element(s)");
            for child in view.children(current) {
                let tag = view
                    .tag_name(child)
                    .and_then(|i| view.text_str(i))
                    .unwrap_or("?");
                println!("  <{tag}> at token {child}");
            }
        }
    }
    Ok(())
}

/// Grow-and-resume loop around `Parser::parse`.
fn tokenize(source: &[u8], capacity: usize) -> Result<(Parser, Vec<Token>)> {
    let mut parser = Parser::new();
    let mut tokens = vec![Token::default(); capacity.max(1)];
    loop {
        match parser.parse(source, &mut tokens) {
            Ok(()) => return Ok((parser, tokens)),
            Err(err) if err.is_recoverable() => {
                let grown = tokens.len() * 2;
                tokens.resize(grown, Token::default());
            }
            Err(err) => bail!("parse failed: {err}"),
        }
    }
}

fn find_root(view: &TokenView<'_>, name: &str) -> Option<usize> {
    (0..view.token_count()).find(|&index| {
        view.token(index)
            .is_some_and(|tok| tok.kind == TokenKind::Object && tok.is_root())
            && view
                .tag_name(index)
                .is_some_and(|tag| view.text_equals(tag, name))
    })
}

fn kind_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Object => "Object",
        TokenKind::String => "String",
        TokenKind::TagName => "TagName",
        TokenKind::AttributeKey => "AttributeKey",
        TokenKind::AttributeValue => "AttributeValue",
        TokenKind::Comment => "Comment",
        TokenKind::Value => "Value",
    }
}

//! Recursive-descent statement parser
//!
//! Grammar:
//!
//! ```text
//! statement := keyword [argument] (";" | "{" statement* "}")
//! argument  := string | quoted ("+" quoted)*
//! ```

use crate::error::ParseError;
use crate::lexer::{SpannedToken, Token, tokenize};
use miette::{NamedSource, SourceSpan};
use std::sync::Arc;
use yg_span::{LineIndex, Position, Span};
use yg_syntax::Statement;

/// Deepest statement nesting accepted before parsing gives up
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parser state over one source unit
pub struct Parser<'src> {
    source: Arc<str>,
    text: &'src str,
    lines: LineIndex,
    tokens: Vec<SpannedToken>,
    cursor: usize,
}

impl<'src> Parser<'src> {
    /// Lex `text` and prepare to parse it
    pub fn new(text: &'src str, name: &str) -> Result<Self, ParseError> {
        let source: Arc<str> = Arc::from(name);
        let lines = LineIndex::new(text);
        let tokens = match tokenize(text) {
            Ok(tokens) => tokens,
            Err(span) => {
                let bad = text.get(span.range()).unwrap_or_default();
                let shown = bad.lines().next().unwrap_or(bad).to_string();
                return Err(ParseError::InvalidToken {
                    text: shown,
                    position: lines.position(&source, text, span.start),
                    span: to_source_span(span),
                    src: NamedSource::new(name, text.to_string()),
                });
            }
        };
        Ok(Self {
            source,
            text,
            lines,
            tokens,
            cursor: 0,
        })
    }

    /// Parse the single top-level module statement
    pub fn parse_module(mut self) -> Result<Statement, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::MissingModule {
                position: self.position_at(0),
            });
        }

        let root_span = self.tokens[0].span;
        let root = self.parse_statement(0)?;
        if !matches!(root.keyword.as_str(), "module" | "submodule") {
            return Err(ParseError::NotAModule {
                keyword: root.keyword,
                position: root.position,
                span: to_source_span(root_span),
                src: self.named_source(),
            });
        }

        if let Some(extra) = self.tokens.get(self.cursor) {
            let span = extra.span;
            let keyword = extra.token.describe();
            return Err(ParseError::TrailingStatement {
                keyword,
                position: self.position_at(span.start),
                span: to_source_span(span),
                src: self.named_source(),
            });
        }

        Ok(root)
    }

    fn parse_statement(&mut self, depth: usize) -> Result<Statement, ParseError> {
        let keyword_token = self.expect_token("a statement keyword")?;
        if depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                position: self.position_at(keyword_token.span.start),
                span: to_source_span(keyword_token.span),
                src: self.named_source(),
            });
        }
        let keyword = match &keyword_token.token {
            Token::Unquoted(word) => word.clone(),
            other => return Err(self.unexpected("a statement keyword", other, keyword_token.span)),
        };
        let position = self.position_at(keyword_token.span.start);

        let argument = match self.peek() {
            Some(next) if next.token.is_string() => Some(self.parse_argument()?),
            _ => None,
        };

        let terminator = self.expect_token("`;` or `{`")?;
        let mut statement = Statement::new(keyword, argument, position);
        match terminator.token {
            Token::Semicolon => {}
            Token::LBrace => {
                let opening = terminator.span;
                loop {
                    match self.peek().map(|next| &next.token) {
                        Some(Token::RBrace) => {
                            self.cursor += 1;
                            break;
                        }
                        Some(_) => {
                            let child = self.parse_statement(depth + 1)?;
                            statement.children.push(child);
                        }
                        None => {
                            return Err(ParseError::UnclosedBlock {
                                keyword: statement.keyword,
                                position: statement.position,
                                opening: to_source_span(opening),
                                src: self.named_source(),
                            });
                        }
                    }
                }
            }
            ref other => return Err(self.unexpected("`;` or `{`", other, terminator.span)),
        }
        Ok(statement)
    }

    /// A single string, or quoted strings joined with `+`
    fn parse_argument(&mut self) -> Result<String, ParseError> {
        let first = self.expect_token("an argument")?;
        let mut text = first.token.text().unwrap_or_default().to_string();
        if !first.token.is_quoted() {
            return Ok(text);
        }

        while self.peek_is_plus() {
            self.cursor += 1;
            let next = self.expect_token("a quoted string after `+`")?;
            if !next.token.is_quoted() {
                return Err(self.unexpected("a quoted string after `+`", &next.token, next.span));
            }
            text.push_str(next.token.text().unwrap_or_default());
        }
        Ok(text)
    }

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.cursor)
    }

    fn peek_is_plus(&self) -> bool {
        matches!(self.peek(), Some(SpannedToken { token: Token::Unquoted(word), .. }) if word == "+")
    }

    fn expect_token(&mut self, expected: &str) -> Result<SpannedToken, ParseError> {
        if let Some(token) = self.tokens.get(self.cursor).cloned() {
            self.cursor += 1;
            return Ok(token);
        }
        let end = self.text.len() as u32;
        Err(ParseError::UnexpectedEof {
            expected: expected.to_string(),
            position: self.position_at(end),
            span: to_source_span(Span::new(end, end)),
            src: self.named_source(),
        })
    }

    fn unexpected(&self, expected: &str, found: &Token, span: Span) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: found.describe(),
            position: self.position_at(span.start),
            span: to_source_span(span),
            src: self.named_source(),
        }
    }

    fn position_at(&self, offset: u32) -> Position {
        self.lines.position(&self.source, self.text, offset)
    }

    fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.source.to_string(), self.text.to_string())
    }
}

fn to_source_span(span: Span) -> SourceSpan {
    (span.start as usize, span.len() as usize).into()
}

//! Tokenization of schema source text using logos.
//!
//! Whitespace and both comment forms are skipped. Quoted strings are unquoted
//! (and unescaped for double quotes) while lexing, so the parser only sees
//! argument text.

use logos::Logos;
use yg_span::Span;

/// Schema source token
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token {
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `;`
    #[token(";")]
    Semicolon,
    /// A `"..."` string with escapes resolved
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    DoubleQuoted(String),
    /// A `'...'` string, taken verbatim
    #[regex(r"'[^']*'", |lex| strip_quotes(lex.slice()).to_owned())]
    SingleQuoted(String),
    /// A bare word: keywords, identifiers, paths and unquoted arguments
    #[regex(r#"[^ \t\r\n\f;{}"'/][^ \t\r\n\f;{}"']*"#, |lex| lex.slice().to_owned())]
    #[regex(r#"/([^ \t\r\n\f;{}"'/*][^ \t\r\n\f;{}"']*)?"#, |lex| lex.slice().to_owned())]
    Unquoted(String),
}

impl Token {
    /// Whether this token can serve as a statement argument
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            Self::DoubleQuoted(_) | Self::SingleQuoted(_) | Self::Unquoted(_)
        )
    }

    /// Whether this token is a quoted string, the only kind `+` may join
    pub fn is_quoted(&self) -> bool {
        matches!(self, Self::DoubleQuoted(_) | Self::SingleQuoted(_))
    }

    /// Argument text carried by a string token
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::DoubleQuoted(text) | Self::SingleQuoted(text) | Self::Unquoted(text) => {
                Some(text)
            }
            Self::LBrace | Self::RBrace | Self::Semicolon => None,
        }
    }

    /// Source-like rendering for diagnostics
    pub fn describe(&self) -> String {
        match self {
            Self::LBrace => "{".to_string(),
            Self::RBrace => "}".to_string(),
            Self::Semicolon => ";".to_string(),
            Self::DoubleQuoted(text) => format!("\"{text}\""),
            Self::SingleQuoted(text) => format!("'{text}'"),
            Self::Unquoted(text) => text.clone(),
        }
    }
}

/// A lexed token with its byte span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    /// The token
    pub token: Token,
    /// Where it came from
    pub span: Span,
}

/// Lex `source` completely.
///
/// # Errors
///
/// Returns the span of the first byte sequence no token matches, such as an
/// unterminated quoted string.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, Span> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(token) => tokens.push(SpannedToken { token, span }),
            Err(()) => return Err(span),
        }
    }
    Ok(tokens)
}

fn strip_quotes(slice: &str) -> &str {
    &slice[1..slice.len() - 1]
}

fn unescape(slice: &str) -> String {
    let inner = strip_quotes(slice);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|spanned| spanned.token)
            .collect()
    }

    #[test]
    fn test_statement_tokens() {
        assert_eq!(
            tokens("leaf bob { type string; }"),
            vec![
                Token::Unquoted("leaf".into()),
                Token::Unquoted("bob".into()),
                Token::LBrace,
                Token::Unquoted("type".into()),
                Token::Unquoted("string".into()),
                Token::Semicolon,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            tokens("// line\nprefix /* block\n still */ \"p\";"),
            vec![
                Token::Unquoted("prefix".into()),
                Token::DoubleQuoted("p".into()),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_paths_are_single_tokens() {
        assert_eq!(
            tokens("augment /base:c/base:d;"),
            vec![
                Token::Unquoted("augment".into()),
                Token::Unquoted("/base:c/base:d".into()),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(
            tokens(r#""a\"b\n" 'c\d'"#),
            vec![
                Token::DoubleQuoted("a\"b\n".into()),
                Token::SingleQuoted("c\\d".into()),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        assert_eq!(tokenize("leaf \"open").unwrap_err().start, 5);
    }
}

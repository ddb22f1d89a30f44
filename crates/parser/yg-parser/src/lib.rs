//! Syntactic front end for schema modules
//!
//! This crate turns raw module text into a positioned [`Statement`] tree. It
//! performs no semantic checking: any well-formed sequence of statements is
//! accepted as long as the unit holds exactly one `module` or `submodule`.
//!
//! # Usage
//!
//! ```rust,ignore
//! let root = yg_parser::parse_source("module m { prefix m; }", "m.yang")?;
//! assert_eq!(root.keyword, "module");
//! ```

pub mod error;
pub mod lexer;
mod parser;

pub use error::ParseError;
pub use lexer::{SpannedToken, Token, tokenize};
pub use parser::MAX_NESTING_DEPTH;

use parser::Parser;
use yg_syntax::Statement;

/// Parse one source unit registered under `name`.
///
/// # Errors
///
/// Returns a [`ParseError`] for malformed text. Parsing stops at the first
/// syntax error.
pub fn parse_source(text: &str, name: &str) -> Result<Statement, ParseError> {
    let result = Parser::new(text, name).and_then(Parser::parse_module);
    match &result {
        Ok(root) => tracing::debug!(
            source = name,
            module = root.arg(),
            statements = root.children.len(),
            "parsed source unit"
        ),
        Err(error) => tracing::debug!(source = name, %error, "syntax error"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_statements() {
        let root = parse_source(
            "module m {\n  prefix m;\n  container c {\n    leaf x { type string; }\n  }\n}\n",
            "m.yang",
        )
        .unwrap();
        assert_eq!(root.keyword, "module");
        assert_eq!(root.arg(), "m");
        assert_eq!(root.children.len(), 2);

        let container = &root.children[1];
        assert_eq!(container.to_string(), "container c");
        assert_eq!(container.position.to_string(), "m.yang:3:3");

        let leaf = &container.children[0];
        assert_eq!(leaf.position.to_string(), "m.yang:4:5");
        assert_eq!(leaf.children[0].arg(), "string");
        assert_eq!(leaf.children[0].position.column, 14);
    }

    #[test]
    fn test_parse_concatenated_argument() {
        let root = parse_source(
            "module m { description \"one \" + 'two' + \"three\"; }",
            "m.yang",
        )
        .unwrap();
        assert_eq!(root.children[0].arg(), "one twothree");
    }

    #[test]
    fn test_statement_without_argument() {
        let root = parse_source("module m { input { leaf a; } }", "m.yang").unwrap();
        assert_eq!(root.children[0].argument, None);
        assert_eq!(root.children[0].children[0].arg(), "a");
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_source("module m {\n  leaf x\n}\n", "m.yang").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
        assert_eq!(err.to_string(), "m.yang:3:1: expected `;` or `{`, found `}`");
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse_source("module m {\n  container c {\n", "m.yang").unwrap_err();
        assert_eq!(err.to_string(), "m.yang:2:3: unclosed block for `container`");
    }

    #[test]
    fn test_eof_inside_statement() {
        let err = parse_source("module m { leaf", "m.yang").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_empty_input() {
        let err = parse_source("  // nothing here\n", "e.yang").unwrap_err();
        assert_eq!(
            err.to_string(),
            "e.yang:1:1: no module or submodule statement found"
        );
    }

    #[test]
    fn test_non_module_root() {
        let err = parse_source("container c;", "c.yang").unwrap_err();
        assert!(matches!(err, ParseError::NotAModule { ref keyword, .. } if keyword == "container"));
    }

    #[test]
    fn test_trailing_statement() {
        let err = parse_source("module a;\nmodule b;", "two.yang").unwrap_err();
        assert_eq!(
            err.to_string(),
            "two.yang:2:1: unexpected statement `module` after the module body"
        );
    }

    #[test]
    fn test_invalid_token() {
        let err = parse_source("module m {\n  description \"open;\n}", "m.yang").unwrap_err();
        assert!(matches!(err, ParseError::InvalidToken { .. }));
        assert_eq!(err.position().line, 2);
        assert_eq!(err.position().column, 15);
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| {
            format!(
                "module m {{{}{}}}",
                "container c {".repeat(depth),
                "}".repeat(depth)
            )
        };

        let root = parse_source(&nested(MAX_NESTING_DEPTH - 1), "deep.yang").unwrap();
        assert_eq!(root.children.len(), 1);

        let err = parse_source(&nested(MAX_NESTING_DEPTH + 44), "deep.yang").unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH, .. }));
        assert_eq!(err.position().line, 1);
        let expected_column = 10 + (MAX_NESTING_DEPTH - 1) * 13 + 1;
        assert_eq!(err.position().column as usize, expected_column);
    }
}

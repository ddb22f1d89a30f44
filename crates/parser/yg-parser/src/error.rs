//! Rich error reporting for the parser
//!
//! Every variant carries the human-facing `Position` used in its `Display`
//! rendering plus a byte `SourceSpan` and the named source text, so miette can
//! draw the offending region.

#![allow(
    unused_assignments,
    reason = "Diagnostic fields are read only by the miette and thiserror derives"
)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;
use yg_span::Position;

/// A syntax error; fatal to the source unit it was found in
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum ParseError {
    /// Text no token matches, such as an unterminated string
    #[error("{position}: invalid token `{text}`")]
    #[diagnostic(code(parser::invalid_token))]
    InvalidToken {
        /// The unmatched text
        text: String,
        /// Where it starts
        position: Position,
        /// Source location
        #[label("not a valid token")]
        span: SourceSpan,
        /// Source code for context
        #[source_code]
        src: NamedSource<String>,
    },

    /// A token in a place the grammar does not allow it
    #[error("{position}: expected {expected}, found `{found}`")]
    #[diagnostic(code(parser::unexpected_token))]
    UnexpectedToken {
        /// What the grammar wanted
        expected: String,
        /// What was there instead
        found: String,
        /// Where it was found
        position: Position,
        /// Source location
        #[label("unexpected token")]
        span: SourceSpan,
        /// Source code for context
        #[source_code]
        src: NamedSource<String>,
    },

    /// Input ended in the middle of a statement
    #[error("{position}: unexpected end of input, expected {expected}")]
    #[diagnostic(code(parser::unexpected_eof))]
    UnexpectedEof {
        /// What the grammar wanted
        expected: String,
        /// End of the input
        position: Position,
        /// Source location
        #[label("input ends here")]
        span: SourceSpan,
        /// Source code for context
        #[source_code]
        src: NamedSource<String>,
    },

    /// A `{` that is never closed
    #[error("{position}: unclosed block for `{keyword}`")]
    #[diagnostic(code(parser::unclosed_block), help("add a closing `}}`"))]
    UnclosedBlock {
        /// Keyword of the statement owning the block
        keyword: String,
        /// Position of that statement
        position: Position,
        /// The opening brace
        #[label("block opened here")]
        opening: SourceSpan,
        /// Source code for context
        #[source_code]
        src: NamedSource<String>,
    },

    /// The unit contains no statements at all
    #[error("{position}: no module or submodule statement found")]
    #[diagnostic(code(parser::missing_module))]
    MissingModule {
        /// Start of the input
        position: Position,
    },

    /// The top-level statement is something other than a module
    #[error("{position}: expected `module` or `submodule`, found `{keyword}`")]
    #[diagnostic(code(parser::not_a_module))]
    NotAModule {
        /// The top-level keyword
        keyword: String,
        /// Its position
        position: Position,
        /// Source location
        #[label("top-level statement")]
        span: SourceSpan,
        /// Source code for context
        #[source_code]
        src: NamedSource<String>,
    },

    /// More than one top-level statement
    #[error("{position}: unexpected statement `{keyword}` after the module body")]
    #[diagnostic(code(parser::trailing_statement))]
    TrailingStatement {
        /// Keyword of the extra statement
        keyword: String,
        /// Its position
        position: Position,
        /// Source location
        #[label("only one module per source unit")]
        span: SourceSpan,
        /// Source code for context
        #[source_code]
        src: NamedSource<String>,
    },

    /// Statements nested deeper than the parser will follow
    #[error("{position}: statements nested deeper than {limit} levels")]
    #[diagnostic(code(parser::nesting_too_deep))]
    NestingTooDeep {
        /// The nesting limit
        limit: usize,
        /// Keyword of the first statement past the limit
        position: Position,
        /// Source location
        #[label("nesting limit reached here")]
        span: SourceSpan,
        /// Source code for context
        #[source_code]
        src: NamedSource<String>,
    },
}

impl ParseError {
    /// Position the error is reported at
    pub fn position(&self) -> &Position {
        match self {
            Self::InvalidToken { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEof { position, .. }
            | Self::UnclosedBlock { position, .. }
            | Self::MissingModule { position }
            | Self::NotAModule { position, .. }
            | Self::TrailingStatement { position, .. }
            | Self::NestingTooDeep { position, .. } => position,
        }
    }
}

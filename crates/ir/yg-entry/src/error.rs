//! Semantic errors
//!
//! Semantic defects are recorded, never raised: the builder appends them to a
//! single ordered log and keeps going. Each one renders as
//! `<source>:<line>:<column>: <message>`.

use std::{error, fmt};
use thiserror::Error;
use yg_span::Position;

/// What went wrong, with the fixed message text used in reports
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    /// `config` argument other than `true` or `false`
    #[error("invalid config value: {0}")]
    InvalidConfigValue(String),

    /// `type` argument that is neither built in nor defined in scope
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// Two siblings with the same name
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// `uses` of a grouping that is not defined in scope
    #[error("unknown group: {0}")]
    UnknownGroup(String),

    /// `augment` whose target path does not resolve
    #[error("augment element not found: {0}")]
    AugmentNotFound(String),

    /// Two typedefs with the same name in one scope
    #[error("duplicate typedef: {0}")]
    DuplicateTypedef(String),

    /// Two groupings with the same name in one scope
    #[error("duplicate grouping: {0}")]
    DuplicateGrouping(String),

    /// `uses` that reaches a grouping while that grouping is being built
    #[error("circular grouping: {0}")]
    CircularGrouping(String),

    /// Entry conversion requested with no statement to convert
    #[error("to_entry called with nil")]
    NilInput,
}

/// A positioned semantic error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    /// Where the defect is reported; `None` only for the nil-input sentinel
    pub position: Option<Position>,
    /// The defect
    pub kind: SemanticErrorKind,
}

impl SemanticError {
    /// Create an error reported at `position`
    pub fn new(position: Position, kind: SemanticErrorKind) -> Self {
        Self {
            position: Some(position),
            kind,
        }
    }

    /// The error carried by entries built from absent input
    pub fn nil_input() -> Self {
        Self {
            position: None,
            kind: SemanticErrorKind::NilInput,
        }
    }

    /// The message without its position prefix
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(position) => write!(formatter, "{position}: {}", self.kind),
            None => write!(formatter, "{}", self.kind),
        }
    }
}

impl error::Error for SemanticError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positioned_rendering() {
        let err = SemanticError::new(
            Position::new("bad.yang", 17, 7),
            SemanticErrorKind::UnknownType("base:unknown".to_string()),
        );
        assert_eq!(err.to_string(), "bad.yang:17:7: unknown type: base:unknown");
        assert_eq!(err.message(), "unknown type: base:unknown");
    }

    #[test]
    fn test_nil_input_has_no_position() {
        let err = SemanticError::nil_input();
        assert_eq!(err.to_string(), "to_entry called with nil");
        assert!(err.position.is_none());
    }
}

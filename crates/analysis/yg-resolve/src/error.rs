//! Error types for scoped lookup and registration

use yg_span::Position;

/// Errors from the type dictionary and grouping table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// Typedef name already taken in this scope, or a built-in name
    #[error("duplicate typedef `{name}`")]
    DuplicateTypedef {
        /// The name being registered
        name: String,
        /// Where the name was first defined; `None` for built-in names
        first: Option<Position>,
    },

    /// Name is neither built in nor defined in any enclosing scope
    #[error("unknown type `{name}`")]
    UnknownType {
        /// The reference as written
        name: String,
    },

    /// A typedef chain leads back to itself
    #[error("circular typedef `{name}`")]
    CircularTypedef {
        /// Typedef at which the cycle closed
        name: String,
    },

    /// Grouping name already taken in this scope
    #[error("duplicate grouping `{name}`")]
    DuplicateGrouping {
        /// The name being declared
        name: String,
        /// Where the name was first declared
        first: Position,
    },

    /// Grouping not declared in any enclosing scope
    #[error("unknown grouping `{name}`")]
    UnknownGroup {
        /// The reference as written
        name: String,
    },
}

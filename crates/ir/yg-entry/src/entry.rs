//! Schema entries

use crate::error::SemanticError;
use crate::types::{Config, EntryKind, ResolvedType, Restriction};
use indexmap::IndexMap;
use la_arena::Idx;
use yg_span::Position;

/// Index of an entry inside its [`EntryTree`](crate::EntryTree)
pub type EntryId = Idx<Entry>;

/// What an entry was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryNode {
    /// A real statement
    Statement {
        /// Keyword of the originating statement
        keyword: String,
        /// Position of the originating statement
        position: Position,
    },
    /// No statement existed
    Error(ErrorNode),
}

impl EntryNode {
    /// Position of the originating statement, if there was one
    pub fn position(&self) -> Option<&Position> {
        match self {
            Self::Statement { position, .. } => Some(position),
            Self::Error(_) => None,
        }
    }

    /// Whether this is the absent-input sentinel
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Stand-in for a statement when there was no input to convert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    /// The single synthetic error
    pub error: SemanticError,
}

/// A resolved schema node
#[derive(Debug, Clone)]
pub struct Entry {
    /// Entry name, the statement argument
    pub name: String,
    /// Entry kind
    pub kind: EntryKind,
    /// Locally declared config; see [`EntryTree::effective_config`](crate::EntryTree::effective_config)
    pub config: Config,
    /// Resolved type for leaves and leaf-lists
    pub ty: Option<ResolvedType>,
    /// Restrictions written directly on this entry's `type`
    pub restrictions: Vec<Restriction>,
    /// `key` of a list
    pub key: Option<String>,
    /// `description` text
    pub description: Option<String>,
    /// Children by name, in insertion order
    pub dir: IndexMap<String, EntryId>,
    /// Enclosing entry
    pub parent: Option<EntryId>,
    /// Originating node
    pub node: EntryNode,
    /// Errors this entry directly triggered
    pub errors: Vec<SemanticError>,
}

impl Entry {
    /// A fresh entry for a statement, with no children yet
    pub fn new(
        kind: EntryKind,
        name: impl Into<String>,
        keyword: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            config: Config::Unset,
            ty: None,
            restrictions: Vec::new(),
            key: None,
            description: None,
            dir: IndexMap::new(),
            parent: None,
            node: EntryNode::Statement {
                keyword: keyword.into(),
                position,
            },
            errors: Vec::new(),
        }
    }

    /// The sentinel for absent input, carrying exactly one error
    pub fn error_sentinel() -> Self {
        let error = SemanticError::nil_input();
        Self {
            name: String::new(),
            kind: EntryKind::Error,
            config: Config::Unset,
            ty: None,
            restrictions: Vec::new(),
            key: None,
            description: None,
            dir: IndexMap::new(),
            parent: None,
            node: EntryNode::Error(ErrorNode {
                error: error.clone(),
            }),
            errors: vec![error],
        }
    }

    /// Position of the originating statement
    pub fn position(&self) -> Option<&Position> {
        self.node.position()
    }

    /// Errors this entry directly triggered
    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }
}

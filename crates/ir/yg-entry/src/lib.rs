//! Resolved schema entries
//!
//! The entry tree is what the semantic passes produce and what downstream
//! tooling consumes: every container, list, leaf and the rest, with config
//! inheritance applied on read, types resolved, and the errors each entry
//! directly triggered attached to it.

pub mod entry;
pub mod error;
pub mod tree;
pub mod types;

pub use entry::{Entry, EntryId, EntryNode, ErrorNode};
pub use error::{SemanticError, SemanticErrorKind};
pub use tree::{EntryRef, EntryTree, path_segments};
pub use types::{Config, EntryKind, ResolvedType, Restriction};

//! Scoped name resolution for schema modules
//!
//! Typedefs and groupings are both looked up through the same scope tree:
//! every scope keeps its own name map, and a lookup walks from the current
//! scope out to the module scope, returning the first match.
//!
//! # Architecture
//!
//! - **Scope tree**: scopes and their parent links
//! - **Type dictionary**: per-scope typedefs plus prefix rules for references
//! - **Grouping table**: per-scope grouping declarations and their build state
//!
//! Neither registry is process-wide; both live for the processing of one module.

pub mod builtin;
pub mod error;
pub mod grouping;
pub mod scope;
pub mod typedef;

pub use builtin::{BUILTIN_TYPES, is_builtin};
pub use error::ScopeError;
pub use grouping::{GroupingSlot, GroupingState, GroupingTable};
pub use scope::{ScopeData, ScopeId, ScopeKind, ScopeTree};
pub use typedef::{TypeDictionary, TypeNamespace, TypeReference, Typedef};

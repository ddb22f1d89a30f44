//! Semantic lowering of statement trees to entry trees
//!
//! This crate is the semantic middle of the pipeline: it takes the positioned
//! [`Statement`] tree of one module and builds its [`EntryTree`], resolving
//! typedefs, expanding groupings, merging augments and checking config values
//! along the way.
//!
//! # Architecture
//!
//! - **Options**: [`ProcessOptions`], the knobs that change lowering results
//! - **Lowering**: the single document-order walk in [`lower`]
//! - **Augments**: target path resolution in [`augment`]
//!
//! Lowering never stops at the first problem. Every defect becomes a
//! [`SemanticError`](yg_entry::SemanticError) appended to a caller-provided
//! log, in the order the offending statements appear in the source.

pub mod augment;
pub mod lower;
pub mod options;

pub use augment::{AugmentError, resolve_target};
pub use lower::{entry_kind, lower_module, module_namespace};
pub use options::ProcessOptions;

use yg_entry::EntryTree;
use yg_syntax::Statement;

/// Convert a statement into an entry tree with default options.
///
/// Absent input yields the error sentinel, which carries exactly one error
/// and is never silently empty.
pub fn to_entry(statement: Option<&Statement>) -> EntryTree {
    let Some(statement) = statement else {
        tracing::debug!("to_entry called with nil");
        return EntryTree::error_sentinel();
    };
    let mut errors = Vec::new();
    let tree = lower_module(statement, &ProcessOptions::default(), &mut errors);
    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), module = statement.arg(), "entry built with errors");
    }
    tree
}

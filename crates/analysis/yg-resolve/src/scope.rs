//! Scope tree shared by the type dictionary and the grouping table
//!
//! Scopes are owned by the statements that open them (the module, each
//! container, list, choice, case, grouping and augment). Lookups walk from a
//! scope to its parent until a match is found or the module scope is passed.

use la_arena::{Arena, Idx};
use std::iter;

/// Unique identifier for a scope
pub type ScopeId = Idx<ScopeData>;

/// Kind of statement owning a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Module-level scope (top-level)
    Module,
    /// Container, list, choice or case body
    Data,
    /// Grouping body
    Grouping,
    /// Augment body
    Augment,
}

/// A single scope in the scope tree
#[derive(Debug, Clone)]
pub struct ScopeData {
    /// Parent scope (None for the module scope)
    pub parent: Option<ScopeId>,
    /// Kind of owning statement
    pub kind: ScopeKind,
    /// Argument of the owning statement, for diagnostics
    pub owner: String,
}

/// Tree of all scopes in one module
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Arena<ScopeData>,
    /// Module-level (root) scope
    pub module_scope: ScopeId,
}

impl ScopeTree {
    /// Create a new scope tree with a module scope
    #[must_use]
    pub fn new(module: &str) -> Self {
        let mut scopes = Arena::new();
        let module_scope = scopes.alloc(ScopeData {
            parent: None,
            kind: ScopeKind::Module,
            owner: module.to_string(),
        });
        Self {
            scopes,
            module_scope,
        }
    }

    /// Create a child scope
    pub fn create_child(&mut self, parent: ScopeId, kind: ScopeKind, owner: &str) -> ScopeId {
        self.scopes.alloc(ScopeData {
            parent: Some(parent),
            kind,
            owner: owner.to_string(),
        })
    }

    /// Get a scope by ID
    #[must_use]
    pub fn get(&self, scope: ScopeId) -> &ScopeData {
        &self.scopes[scope]
    }

    /// `scope` followed by each enclosing scope, innermost first
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        iter::successors(Some(scope), |&current| self.scopes[current].parent)
    }

    /// Number of scopes created so far
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always false: a tree has at least its module scope
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

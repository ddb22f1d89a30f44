//! Scope-chained grouping table
//!
//! Groupings are declared when their enclosing scope is entered and built
//! later, either at their definition site or on demand by the first `uses`
//! that reaches them first. The slot state makes sure each body is built
//! exactly once.

use crate::error::ScopeError;
use crate::scope::{ScopeId, ScopeTree};
use rustc_hash::FxHashMap;
use std::ptr;
use yg_entry::EntryId;
use yg_syntax::Statement;

/// Build state of a declared grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingState {
    /// Declared, body not built yet
    Pending,
    /// Body is being built right now
    Building,
    /// Body built; the canonical entry
    Built(EntryId),
}

/// A declared grouping
#[derive(Debug, Clone, Copy)]
pub struct GroupingSlot<'stmt> {
    /// The `grouping` statement that won the name
    pub statement: &'stmt Statement,
    /// Scope the grouping is declared in
    pub scope: ScopeId,
    /// Build state
    pub state: GroupingState,
}

/// Per-scope grouping registry
#[derive(Debug, Default)]
pub struct GroupingTable<'stmt> {
    table: FxHashMap<ScopeId, FxHashMap<String, GroupingSlot<'stmt>>>,
}

impl<'stmt> GroupingTable<'stmt> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            table: FxHashMap::default(),
        }
    }

    /// Declare a grouping in `scope`.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::DuplicateGrouping` if `scope` already declares the
    /// name; the first declaration is kept.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        statement: &'stmt Statement,
    ) -> Result<(), ScopeError> {
        let name = statement.arg();
        let scope_map = self.table.entry(scope).or_default();
        if let Some(existing) = scope_map.get(name) {
            return Err(ScopeError::DuplicateGrouping {
                name: name.to_string(),
                first: existing.statement.position.clone(),
            });
        }
        scope_map.insert(
            name.to_string(),
            GroupingSlot {
                statement,
                scope,
                state: GroupingState::Pending,
            },
        );
        Ok(())
    }

    /// Slot declared under `name` in `scope` itself
    pub fn get_local(&self, scope: ScopeId, name: &str) -> Option<&GroupingSlot<'stmt>> {
        self.table.get(&scope).and_then(|scope_map| scope_map.get(name))
    }

    /// Nearest grouping named `name`, walking outward from `scope`.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::UnknownGroup` if no enclosing scope declares it.
    pub fn resolve(
        &self,
        scopes: &ScopeTree,
        scope: ScopeId,
        name: &str,
    ) -> Result<GroupingSlot<'stmt>, ScopeError> {
        scopes
            .ancestors(scope)
            .find_map(|candidate| self.get_local(candidate, name).copied())
            .ok_or_else(|| ScopeError::UnknownGroup {
                name: name.to_string(),
            })
    }

    /// Whether `statement` is the declaration that owns its name in `scope`
    pub fn is_declaration(&self, scope: ScopeId, statement: &Statement) -> bool {
        self.get_local(scope, statement.arg())
            .is_some_and(|slot| ptr::eq(slot.statement, statement))
    }

    /// Mark a declared grouping as under construction
    pub fn mark_building(&mut self, scope: ScopeId, name: &str) {
        self.set_state(scope, name, GroupingState::Building);
    }

    /// Register the fully built body of a declared grouping
    pub fn register(&mut self, scope: ScopeId, name: &str, entry: EntryId) {
        tracing::debug!(grouping = name, "registered grouping");
        self.set_state(scope, name, GroupingState::Built(entry));
    }

    fn set_state(&mut self, scope: ScopeId, name: &str, state: GroupingState) {
        if let Some(slot) = self
            .table
            .get_mut(&scope)
            .and_then(|scope_map| scope_map.get_mut(name))
        {
            slot.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeKind;
    use yg_entry::{Entry, EntryKind, EntryTree};
    use yg_span::Position;

    fn grouping(name: &str, line: u32) -> Statement {
        Statement::new("grouping", Some(name.to_string()), Position::new("g.yang", line, 3))
    }

    #[test]
    fn test_declare_and_resolve_through_scopes() {
        let mut scopes = ScopeTree::new("m");
        let inner = scopes.create_child(scopes.module_scope, ScopeKind::Data, "c");
        let stmt = grouping("g", 1);
        let mut table = GroupingTable::new();
        table.declare(scopes.module_scope, &stmt).unwrap();

        let slot = table.resolve(&scopes, inner, "g").unwrap();
        assert_eq!(slot.scope, scopes.module_scope);
        assert_eq!(slot.state, GroupingState::Pending);
        assert!(table.is_declaration(scopes.module_scope, &stmt));
    }

    #[test]
    fn test_duplicate_declaration_keeps_first() {
        let scopes = ScopeTree::new("m");
        let first = grouping("g", 1);
        let second = grouping("g", 5);
        let mut table = GroupingTable::new();
        table.declare(scopes.module_scope, &first).unwrap();
        let err = table.declare(scopes.module_scope, &second).unwrap_err();
        assert_eq!(
            err,
            ScopeError::DuplicateGrouping {
                name: "g".to_string(),
                first: Position::new("g.yang", 1, 3),
            }
        );
        assert!(table.is_declaration(scopes.module_scope, &first));
        assert!(!table.is_declaration(scopes.module_scope, &second));
    }

    #[test]
    fn test_unknown_group() {
        let scopes = ScopeTree::new("m");
        let table = GroupingTable::new();
        assert_eq!(
            table.resolve(&scopes, scopes.module_scope, "the-beatles").unwrap_err(),
            ScopeError::UnknownGroup {
                name: "the-beatles".to_string()
            }
        );
    }

    #[test]
    fn test_state_transitions() {
        let scopes = ScopeTree::new("m");
        let stmt = grouping("g", 1);
        let mut table = GroupingTable::new();
        table.declare(scopes.module_scope, &stmt).unwrap();
        table.mark_building(scopes.module_scope, "g");
        assert_eq!(
            table.get_local(scopes.module_scope, "g").unwrap().state,
            GroupingState::Building
        );

        let tree = EntryTree::new(Entry::new(
            EntryKind::Grouping,
            "g",
            "grouping",
            Position::new("g.yang", 1, 3),
        ));
        table.register(scopes.module_scope, "g", tree.root());
        assert_eq!(
            table.get_local(scopes.module_scope, "g").unwrap().state,
            GroupingState::Built(tree.root())
        );
    }
}

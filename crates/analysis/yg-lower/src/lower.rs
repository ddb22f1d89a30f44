//! Statement → entry lowering
//!
//! One depth-first walk over a module's statements, in document order. Every
//! semantic defect is appended to the caller's error log as the walk passes
//! the statement that caused it, so the log reads in source order and one
//! bad statement never hides the rest of the module. A grouping body built
//! early by a `uses` has its errors held back until its definition is passed.

use crate::augment::resolve_target;
use crate::options::ProcessOptions;
use yg_entry::{
    Config, Entry, EntryId, EntryKind, EntryTree, ResolvedType, Restriction, SemanticError,
    SemanticErrorKind,
};
use yg_resolve::{
    GroupingState, GroupingTable, ScopeId, ScopeKind, ScopeTree, TypeDictionary, TypeNamespace,
    TypeReference, Typedef,
};
use yg_span::Position;
use yg_syntax::{Keyword, Statement};

/// Lower a module's root statement to its entry tree.
///
/// Errors are appended to `errors` in document order; nothing is ever
/// returned early.
pub fn lower_module(
    root: &Statement,
    options: &ProcessOptions,
    errors: &mut Vec<SemanticError>,
) -> EntryTree {
    let before = errors.len();
    let mut ctx = LoweringContext::new(root, options, errors);
    ctx.lower_root(root);
    let tree = ctx.finish();
    tracing::debug!(
        module = root.arg(),
        errors = errors.len() - before,
        "lowered module"
    );
    tree
}

/// Map a statement keyword to the kind of entry it builds
pub fn entry_kind(keyword: Keyword) -> Option<EntryKind> {
    match keyword {
        Keyword::Module | Keyword::Submodule => Some(EntryKind::Module),
        Keyword::Container => Some(EntryKind::Container),
        Keyword::List => Some(EntryKind::List),
        Keyword::Leaf => Some(EntryKind::Leaf),
        Keyword::LeafList => Some(EntryKind::LeafList),
        Keyword::Choice => Some(EntryKind::Choice),
        Keyword::Case => Some(EntryKind::Case),
        Keyword::Grouping => Some(EntryKind::Grouping),
        Keyword::Augment => Some(EntryKind::Augment),
        _ => None,
    }
}

/// Prefix rules of a module: its own prefix (or the `belongs-to` prefix of a
/// submodule) plus every import prefix
pub fn module_namespace(root: &Statement, options: &ProcessOptions) -> TypeNamespace {
    let own_prefix = root
        .child_arg(Keyword::Prefix)
        .or_else(|| {
            root.child(Keyword::BelongsTo)
                .and_then(|belongs_to| belongs_to.child_arg(Keyword::Prefix))
        })
        .unwrap_or_default();

    let mut namespace = TypeNamespace::new(own_prefix);
    namespace.strict_foreign = options.strict_foreign_types;
    for import in root.children_of(Keyword::Import) {
        if let Some(prefix) = import.child_arg(Keyword::Prefix) {
            namespace
                .imports
                .insert(prefix.to_string(), import.arg().to_string());
        }
    }
    namespace
}

/// State of one module's lowering pass
struct LoweringContext<'stmt, 'log> {
    /// Entries built so far
    tree: EntryTree,
    /// Scopes opened so far
    scopes: ScopeTree,
    /// Typedefs by scope
    types: TypeDictionary,
    /// Groupings by scope
    groupings: GroupingTable<'stmt>,
    /// The shared, append-only error log
    errors: &'log mut Vec<SemanticError>,
    /// Errors of groupings a `uses` built ahead of their definition, held
    /// until the walk reaches the `grouping` statement
    deferred: Vec<(ScopeId, String, Vec<SemanticError>)>,
}

impl<'stmt, 'log> LoweringContext<'stmt, 'log> {
    fn new(
        root: &'stmt Statement,
        options: &ProcessOptions,
        errors: &'log mut Vec<SemanticError>,
    ) -> Self {
        let kind = entry_kind(root.kind()).unwrap_or(EntryKind::Module);
        let root_entry = Entry::new(kind, root.arg(), &root.keyword, root.position.clone());
        Self {
            tree: EntryTree::new(root_entry).with_root_config(options.root_config),
            scopes: ScopeTree::new(root.arg()),
            types: TypeDictionary::new(module_namespace(root, options)),
            groupings: GroupingTable::new(),
            errors,
            deferred: Vec::new(),
        }
    }

    fn finish(self) -> EntryTree {
        let Self {
            tree,
            errors,
            deferred,
            ..
        } = self;
        for (_, _, held) in deferred {
            errors.extend(held);
        }
        tree
    }

    fn lower_root(&mut self, root: &'stmt Statement) {
        let scope = self.scopes.module_scope;
        self.declare_scope(scope, root);
        let root_id = self.tree.root();
        self.lower_body(root, root_id, scope, true);
    }

    /// Record a scope's typedefs and grouping declarations before anything in
    /// it is built, so references within the scope may point forward.
    ///
    /// Losing duplicates are reported later, when the walk reaches them.
    fn declare_scope(&mut self, scope: ScopeId, owner: &'stmt Statement) {
        for child in &owner.children {
            match child.kind() {
                Keyword::Typedef => {
                    let typedef = Typedef {
                        name: child.arg().to_string(),
                        base: child.child_arg(Keyword::Type).unwrap_or_default().to_string(),
                        restrictions: child
                            .child(Keyword::Type)
                            .map(restrictions_of)
                            .unwrap_or_default(),
                        scope,
                        position: child.position.clone(),
                    };
                    if let Err(error) = self.types.register(typedef) {
                        tracing::trace!(%error, "typedef not registered");
                    }
                }
                Keyword::Grouping => {
                    if let Err(error) = self.groupings.declare(scope, child) {
                        tracing::trace!(%error, "grouping not declared");
                    }
                }
                _ => {}
            }
        }
    }

    /// Lower the substatements of `owner` into `parent`.
    ///
    /// `owns_entry` is false for bodies that do not describe `parent` itself
    /// (grouping and augment bodies); their property statements are skipped.
    fn lower_body(
        &mut self,
        owner: &'stmt Statement,
        parent: EntryId,
        scope: ScopeId,
        owns_entry: bool,
    ) {
        for child in &owner.children {
            match child.kind() {
                Keyword::Config if owns_entry => self.apply_config(child, parent),
                Keyword::Type if owns_entry => self.apply_type(child, parent, scope),
                Keyword::Key if owns_entry => self.tree[parent].key = Some(child.arg().to_string()),
                Keyword::Description if owns_entry => {
                    self.tree[parent].description = Some(child.arg().to_string());
                }
                kind if kind.is_data_definition() => self.lower_data(child, parent, scope),
                Keyword::Grouping => self.lower_grouping_site(child, parent, scope),
                Keyword::Uses => self.expand_uses(child, parent, scope),
                Keyword::Augment => self.lower_augment(child, scope),
                Keyword::Typedef => self.check_typedef(child, parent, scope),
                _ => {}
            }
        }
    }

    /// Record an error in the log and on the entry that triggered it
    fn emit(&mut self, entry: EntryId, position: Position, kind: SemanticErrorKind) {
        let error = SemanticError::new(position, kind);
        tracing::trace!(%error, "semantic error");
        self.tree[entry].errors.push(error.clone());
        self.errors.push(error);
    }

    fn owner_position(&self, entry: EntryId, fallback: &Position) -> Position {
        self.tree[entry]
            .position()
            .cloned()
            .unwrap_or_else(|| fallback.clone())
    }

    /// `config`: only `true` and `false` are accepted; anything else leaves the
    /// entry unset so it inherits. Reported at the owning statement.
    fn apply_config(&mut self, stmt: &Statement, owner: EntryId) {
        match Config::from_argument(stmt.arg()) {
            Some(config) => self.tree[owner].config = config,
            None => {
                let position = self.owner_position(owner, &stmt.position);
                self.emit(
                    owner,
                    position,
                    SemanticErrorKind::InvalidConfigValue(stmt.arg().to_string()),
                );
            }
        }
    }

    /// `type`: resolved through the dictionary; failures leave a placeholder so
    /// the rest of the subtree still builds.
    fn apply_type(&mut self, stmt: &Statement, owner: EntryId, scope: ScopeId) {
        if !self.tree[owner].kind.is_typed() {
            return;
        }
        let reference = stmt.arg();
        let ty = match self.types.resolve(&self.scopes, scope, reference) {
            Ok(ty) => ty,
            Err(error) => {
                tracing::trace!(%error, "type reference unresolved");
                let qualified = self.types.namespace().qualify(reference);
                self.emit(
                    owner,
                    stmt.position.clone(),
                    SemanticErrorKind::UnknownType(qualified),
                );
                ResolvedType::Unresolved {
                    name: reference.to_string(),
                }
            }
        };
        let entry = &mut self.tree[owner];
        entry.ty = Some(ty);
        entry.restrictions = restrictions_of(stmt);
    }

    /// Data definitions: a name already present in `parent` is reported at the
    /// newcomer and the newcomer is dropped without being built.
    fn lower_data(&mut self, stmt: &'stmt Statement, parent: EntryId, scope: ScopeId) {
        let name = stmt.arg();
        if self.tree.has_child(parent, name) {
            self.emit(
                parent,
                stmt.position.clone(),
                SemanticErrorKind::DuplicateKey(name.to_string()),
            );
            return;
        }

        let Some(kind) = entry_kind(stmt.kind()) else {
            return;
        };
        let id = self
            .tree
            .alloc(Entry::new(kind, name, &stmt.keyword, stmt.position.clone()));

        let body_scope = if kind.is_typed() {
            scope
        } else {
            let child_scope = self.scopes.create_child(scope, ScopeKind::Data, name);
            self.declare_scope(child_scope, stmt);
            child_scope
        };
        self.lower_body(stmt, id, body_scope, true);

        if self.attach(parent, id).is_err() {
            self.emit(
                parent,
                stmt.position.clone(),
                SemanticErrorKind::DuplicateKey(name.to_string()),
            );
        }
    }

    /// Insert `child` into `parent`, wrapping it in an implicit case when
    /// `parent` is a choice and `child` is not already a case.
    fn attach(&mut self, parent: EntryId, child: EntryId) -> Result<(), EntryId> {
        let parent_is_choice = self.tree[parent].kind == EntryKind::Choice;
        if !parent_is_choice || self.tree[child].kind == EntryKind::Case {
            return self.tree.insert_child(parent, child);
        }

        let wrapped = &self.tree[child];
        if let Some(existing) = self.tree.child(parent, &wrapped.name) {
            return Err(existing);
        }
        let mut case = Entry::new(
            EntryKind::Case,
            wrapped.name.clone(),
            "case",
            wrapped.position().cloned().unwrap_or_else(Position::synthetic),
        );
        case.node = wrapped.node.clone();
        let case_id = self.tree.alloc(case);
        self.tree.insert_child(parent, case_id)?;
        self.tree.insert_child(case_id, child)
    }

    /// A `grouping` reached in document order: built here unless a `uses`
    /// already built it, whether or not anything ever uses it.
    fn lower_grouping_site(&mut self, stmt: &'stmt Statement, parent: EntryId, scope: ScopeId) {
        if !self.groupings.is_declaration(scope, stmt) {
            self.emit(
                parent,
                stmt.position.clone(),
                SemanticErrorKind::DuplicateGrouping(stmt.arg().to_string()),
            );
            return;
        }
        let pending = self
            .groupings
            .get_local(scope, stmt.arg())
            .is_some_and(|slot| slot.state == GroupingState::Pending);
        if pending {
            self.build_grouping(scope, stmt);
        } else if let Some(index) = self
            .deferred
            .iter()
            .position(|(owner, name, _)| *owner == scope && name == stmt.arg())
        {
            let (_, _, held) = self.deferred.remove(index);
            self.errors.extend(held);
        }
    }

    /// Build a grouping's canonical body in its own scope and register it
    fn build_grouping(&mut self, declaring_scope: ScopeId, stmt: &'stmt Statement) -> EntryId {
        let name = stmt.arg();
        self.groupings.mark_building(declaring_scope, name);

        let id = self.tree.alloc(Entry::new(
            EntryKind::Grouping,
            name,
            &stmt.keyword,
            stmt.position.clone(),
        ));
        let scope = self
            .scopes
            .create_child(declaring_scope, ScopeKind::Grouping, name);
        self.declare_scope(scope, stmt);
        self.lower_body(stmt, id, scope, false);

        self.tree.add_grouping(id);
        self.groupings.register(declaring_scope, name, id);
        id
    }

    /// `uses`: copy the grouping's children into `parent`. Each use gets its
    /// own deep copy; collisions are reported at the `uses` statement.
    fn expand_uses(&mut self, stmt: &'stmt Statement, parent: EntryId, scope: ScopeId) {
        let reference = stmt.arg();
        let name = match self.types.namespace().classify(reference) {
            TypeReference::Local(name) => name,
            TypeReference::Foreign { .. } if !self.types.namespace().strict_foreign => {
                tracing::trace!(grouping = reference, "uses of imported grouping deferred");
                return;
            }
            TypeReference::Foreign { .. } | TypeReference::UnknownPrefix => reference,
        };

        let slot = match self.groupings.resolve(&self.scopes, scope, name) {
            Ok(slot) => slot,
            Err(error) => {
                tracing::trace!(%error, "uses unresolved");
                self.emit(
                    parent,
                    stmt.position.clone(),
                    SemanticErrorKind::UnknownGroup(reference.to_string()),
                );
                return;
            }
        };

        let body = match slot.state {
            GroupingState::Built(body) => body,
            GroupingState::Pending => {
                let mark = self.errors.len();
                let body = self.build_grouping(slot.scope, slot.statement);
                let held = self.errors.split_off(mark);
                self.deferred.push((slot.scope, slot.statement.arg().to_string(), held));
                body
            }
            GroupingState::Building => {
                self.emit(
                    parent,
                    stmt.position.clone(),
                    SemanticErrorKind::CircularGrouping(reference.to_string()),
                );
                return;
            }
        };

        let children: Vec<EntryId> = self.tree[body].dir.values().copied().collect();
        for child in children {
            let copy = self.tree.deep_copy(child);
            if self.attach(parent, copy).is_err() {
                let duplicate = self.tree[copy].name.clone();
                self.emit(
                    parent,
                    stmt.position.clone(),
                    SemanticErrorKind::DuplicateKey(duplicate),
                );
            }
        }
        tracing::trace!(grouping = reference, into = %self.tree[parent].name, "expanded uses");
    }

    /// `augment`: the body is built only once the target resolves, straight
    /// into the target. An unresolved target leaves the body unvisited.
    fn lower_augment(&mut self, stmt: &'stmt Statement, scope: ScopeId) {
        let path = stmt.arg();
        let root = self.tree.root();
        let target = match resolve_target(&self.tree, root, path) {
            Ok(target) => target,
            Err(error) => {
                tracing::debug!(%error, "augment rejected");
                self.emit(
                    root,
                    stmt.position.clone(),
                    SemanticErrorKind::AugmentNotFound(path.to_string()),
                );
                return;
            }
        };

        let augment_scope = self.scopes.create_child(scope, ScopeKind::Augment, path);
        self.declare_scope(augment_scope, stmt);
        let existing = self.tree[target].dir.len();
        self.lower_body(stmt, target, augment_scope, false);

        let mut record = Entry::new(EntryKind::Augment, path, &stmt.keyword, stmt.position.clone());
        record.parent = Some(target);
        record.dir = self.tree[target]
            .dir
            .iter()
            .skip(existing)
            .map(|(name, &id)| (name.clone(), id))
            .collect();
        tracing::debug!(path, merged = record.dir.len(), "augment merged");
        let record = self.tree.alloc(record);
        self.tree.add_augment(record);
    }

    /// A `typedef` reached in document order: losing duplicates are reported,
    /// and the winner's base must resolve.
    fn check_typedef(&mut self, stmt: &Statement, parent: EntryId, scope: ScopeId) {
        let name = stmt.arg();
        let Some(typedef) = self
            .types
            .get_local(scope, name)
            .filter(|typedef| typedef.position == stmt.position)
            .cloned()
        else {
            self.emit(
                parent,
                stmt.position.clone(),
                SemanticErrorKind::DuplicateTypedef(name.to_string()),
            );
            return;
        };

        let Some(type_stmt) = stmt.child(Keyword::Type) else {
            return;
        };
        if let Err(error) = self.types.resolve_base(&self.scopes, &typedef) {
            tracing::trace!(%error, "typedef base unresolved");
            let qualified = self.types.namespace().qualify(&typedef.base);
            self.emit(
                parent,
                type_stmt.position.clone(),
                SemanticErrorKind::UnknownType(qualified),
            );
        }
    }
}

/// Restrictions written under a `type` statement
fn restrictions_of(type_stmt: &Statement) -> Vec<Restriction> {
    type_stmt
        .children
        .iter()
        .filter(|child| child.kind().is_restriction())
        .map(|child| Restriction {
            keyword: child.keyword.clone(),
            argument: child.arg().to_string(),
        })
        .collect()
}

//! Arena-backed entry trees
//!
//! Every entry of one module lives in a single arena. Children are owned
//! through the parent's `dir`; `parent` links are plain indices, so the tree
//! can be walked in both directions without shared ownership. Grouping bodies
//! and augment records live in the same arena outside the root's `dir`.

use crate::entry::{Entry, EntryId};
use crate::error::SemanticError;
use crate::types::{Config, EntryKind, ResolvedType};
use la_arena::Arena;
use std::fmt;
use std::ops::{Index, IndexMut};

/// A module's entries
#[derive(Debug, Clone)]
pub struct EntryTree {
    entries: Arena<Entry>,
    root: EntryId,
    root_config: bool,
    groupings: Vec<EntryId>,
    augments: Vec<EntryId>,
}

impl EntryTree {
    /// Create a tree holding only `root`
    pub fn new(root: Entry) -> Self {
        let mut entries = Arena::new();
        let root = entries.alloc(root);
        Self {
            entries,
            root,
            root_config: true,
            groupings: Vec::new(),
            augments: Vec::new(),
        }
    }

    /// A tree whose root is the absent-input sentinel
    pub fn error_sentinel() -> Self {
        Self::new(Entry::error_sentinel())
    }

    /// Set the config value the root falls back to
    #[must_use]
    pub fn with_root_config(mut self, root_config: bool) -> Self {
        self.root_config = root_config;
        self
    }

    /// The root entry
    pub fn root(&self) -> EntryId {
        self.root
    }

    /// Read-only view of the root
    pub fn root_ref(&self) -> EntryRef<'_> {
        self.view(self.root)
    }

    /// Read-only view of any entry
    pub fn view(&self, id: EntryId) -> EntryRef<'_> {
        EntryRef { tree: self, id }
    }

    /// Allocate a detached entry
    pub fn alloc(&mut self, entry: Entry) -> EntryId {
        self.entries.alloc(entry)
    }

    /// Whether `parent` already has a child called `name`
    pub fn has_child(&self, parent: EntryId, name: &str) -> bool {
        self.entries[parent].dir.contains_key(name)
    }

    /// Look up a direct child by name
    pub fn child(&self, parent: EntryId, name: &str) -> Option<EntryId> {
        self.entries[parent].dir.get(name).copied()
    }

    /// Insert `child` into `parent`'s directory under the child's name.
    ///
    /// The first insertion of a name wins.
    ///
    /// # Errors
    ///
    /// Returns the id of the entry already holding the name; `child` is then
    /// left detached.
    pub fn insert_child(&mut self, parent: EntryId, child: EntryId) -> Result<(), EntryId> {
        let name = self.entries[child].name.clone();
        if let Some(&existing) = self.entries[parent].dir.get(&name) {
            return Err(existing);
        }
        self.entries[parent].dir.insert(name, child);
        self.entries[child].parent = Some(parent);
        Ok(())
    }

    /// Deep-copy the subtree rooted at `source`, detached and with fresh ids.
    ///
    /// The copy shares nothing with the original. Locally attached errors are
    /// not copied: they were reported where the original was built.
    pub fn deep_copy(&mut self, source: EntryId) -> EntryId {
        let mut copy = self.entries[source].clone();
        copy.errors.clear();
        copy.parent = None;
        let children: Vec<EntryId> = copy.dir.values().copied().collect();
        copy.dir.clear();

        let copied = self.entries.alloc(copy);
        for child in children {
            let child_copy = self.deep_copy(child);
            self.entries[child_copy].parent = Some(copied);
            let name = self.entries[child_copy].name.clone();
            self.entries[copied].dir.insert(name, child_copy);
        }
        copied
    }

    /// Config after inheritance: the nearest explicit value up the parent chain,
    /// else the root default
    pub fn effective_config(&self, id: EntryId) -> bool {
        let mut current = Some(id);
        while let Some(entry_id) = current {
            let entry = &self.entries[entry_id];
            if let Some(value) = entry.config.value() {
                return value;
            }
            current = entry.parent;
        }
        self.root_config
    }

    /// Record a grouping body built in this tree
    pub fn add_grouping(&mut self, id: EntryId) {
        self.groupings.push(id);
    }

    /// Grouping bodies, in the order they were built
    pub fn groupings(&self) -> &[EntryId] {
        &self.groupings
    }

    /// Record a merged augment
    pub fn add_augment(&mut self, id: EntryId) {
        self.augments.push(id);
    }

    /// Augment records, in document order
    pub fn augments(&self) -> &[EntryId] {
        &self.augments
    }

    /// Walk a `/`-separated path of optionally prefixed names from the root.
    ///
    /// Returns `None` as soon as a segment is missing. An empty path names the
    /// root itself.
    pub fn find(&self, path: &str) -> Option<EntryId> {
        path_segments(path).try_fold(self.root, |current, segment| self.child(current, segment))
    }

    /// `/`-joined names from the root down to `id`, root excluded
    pub fn path_of(&self, id: EntryId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(entry_id) = current {
            let entry = &self.entries[entry_id];
            if entry.parent.is_some() {
                names.push(entry.name.as_str());
            }
            current = entry.parent;
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    /// Every locally attached error in the tree, in allocation order
    pub fn local_errors(&self) -> impl Iterator<Item = &SemanticError> {
        self.entries.values().flat_map(|entry| entry.errors.iter())
    }

    /// Deterministic indented rendering of the data tree, for tests and tooling
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_entry(self.root, 0, &mut out);
        out
    }

    fn dump_entry(&self, id: EntryId, depth: usize, out: &mut String) {
        let entry = &self.entries[id];
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{} {}", entry.kind, entry.name));
        if let Some(ty) = &entry.ty {
            out.push_str(&format!(" : {ty}"));
        }
        if let Some(key) = &entry.key {
            out.push_str(&format!(" [key {key}]"));
        }
        if !self.effective_config(id) {
            out.push_str(" [config false]");
        }
        out.push('\n');
        for &child in entry.dir.values() {
            self.dump_entry(child, depth + 1, out);
        }
    }
}

impl Index<EntryId> for EntryTree {
    type Output = Entry;

    fn index(&self, index: EntryId) -> &Entry {
        &self.entries[index]
    }
}

impl IndexMut<EntryId> for EntryTree {
    fn index_mut(&mut self, index: EntryId) -> &mut Entry {
        &mut self.entries[index]
    }
}

/// Split a schema path into its names, dropping any `prefix:` qualifiers
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.rsplit_once(':').map_or(segment, |(_, name)| name))
}

/// Read-only view of one entry, the API downstream consumers use
#[derive(Clone, Copy)]
pub struct EntryRef<'tree> {
    tree: &'tree EntryTree,
    id: EntryId,
}

impl<'tree> EntryRef<'tree> {
    /// Arena id of this entry
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// The underlying entry
    pub fn entry(&self) -> &'tree Entry {
        &self.tree[self.id]
    }

    /// Entry kind
    pub fn kind(&self) -> EntryKind {
        self.entry().kind
    }

    /// Entry name
    pub fn name(&self) -> &'tree str {
        &self.entry().name
    }

    /// Config after inheritance
    pub fn config(&self) -> bool {
        self.tree.effective_config(self.id)
    }

    /// Config as declared on this entry
    pub fn declared_config(&self) -> Config {
        self.entry().config
    }

    /// Resolved type, for leaves and leaf-lists
    pub fn ty(&self) -> Option<&'tree ResolvedType> {
        self.entry().ty.as_ref()
    }

    /// Children in insertion order
    pub fn children(self) -> impl Iterator<Item = EntryRef<'tree>> {
        let tree = self.tree;
        self.entry()
            .dir
            .values()
            .map(move |&id| EntryRef { tree, id })
    }

    /// Direct child by name
    pub fn child(&self, name: &str) -> Option<EntryRef<'tree>> {
        self.tree.child(self.id, name).map(|id| self.tree.view(id))
    }

    /// Enclosing entry
    pub fn parent(&self) -> Option<EntryRef<'tree>> {
        self.entry().parent.map(|id| self.tree.view(id))
    }

    /// Errors this entry directly triggered
    pub fn errors(&self) -> &'tree [SemanticError] {
        self.entry().errors()
    }
}

impl fmt::Debug for EntryRef<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("EntryRef")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

//! Augment target resolution
//!
//! Targets are resolved against the module's entry tree as it stands when the
//! `augment` statement is reached, so augments only see what document order
//! has already built.

use yg_entry::{EntryId, EntryKind, EntryTree, path_segments};

/// Why an augment target could not be used
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AugmentError {
    /// A path segment does not exist
    #[error("target `{path}` not found: no `{segment}`")]
    TargetNotFound {
        /// The full target path
        path: String,
        /// First segment that is missing
        segment: String,
    },

    /// The path names an entry that cannot hold children
    #[error("target `{path}` is a {kind}")]
    InvalidTarget {
        /// The full target path
        path: String,
        /// Kind of the entry found
        kind: EntryKind,
    },
}

/// Walk `path` from `module`, one optionally prefixed segment at a time.
///
/// # Errors
///
/// Fails with `AugmentError::TargetNotFound` at the first missing segment,
/// or `AugmentError::InvalidTarget` if the path ends at a leaf.
pub fn resolve_target(tree: &EntryTree, module: EntryId, path: &str) -> Result<EntryId, AugmentError> {
    let mut current = module;
    for segment in path_segments(path) {
        current = tree
            .child(current, segment)
            .ok_or_else(|| AugmentError::TargetNotFound {
                path: path.to_string(),
                segment: segment.to_string(),
            })?;
    }

    let kind = tree[current].kind;
    if kind.is_typed() {
        return Err(AugmentError::InvalidTarget {
            path: path.to_string(),
            kind,
        });
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yg_entry::Entry;
    use yg_span::Position;

    fn tree() -> EntryTree {
        let position = Position::new("a.yang", 1, 1);
        let mut tree = EntryTree::new(Entry::new(EntryKind::Module, "m", "module", position.clone()));
        let c = tree.alloc(Entry::new(EntryKind::Container, "c", "container", position.clone()));
        tree.insert_child(tree.root(), c).unwrap();
        let leaf = tree.alloc(Entry::new(EntryKind::Leaf, "x", "leaf", position));
        tree.insert_child(c, leaf).unwrap();
        tree
    }

    #[test]
    fn test_resolves_prefixed_absolute_path() {
        let tree = tree();
        let target = resolve_target(&tree, tree.root(), "/m:c").unwrap();
        assert_eq!(tree[target].name, "c");
    }

    #[test]
    fn test_missing_segment() {
        let tree = tree();
        assert_eq!(
            resolve_target(&tree, tree.root(), "/c/d/e"),
            Err(AugmentError::TargetNotFound {
                path: "/c/d/e".to_string(),
                segment: "d".to_string(),
            })
        );
        assert!(resolve_target(&tree, tree.root(), "nothing").is_err());
    }

    #[test]
    fn test_leaf_is_not_a_target() {
        let tree = tree();
        assert!(matches!(
            resolve_target(&tree, tree.root(), "/c/x"),
            Err(AugmentError::InvalidTarget { kind: EntryKind::Leaf, .. })
        ));
    }
}

//! Scope-chained type dictionary
//!
//! Each scope owns its own name → typedef map. A reference resolves against
//! the nearest enclosing scope that defines the name, so an inner typedef
//! shadows an outer one. Built-in names never reach the dictionary.

use crate::builtin::is_builtin;
use crate::error::ScopeError;
use crate::scope::{ScopeId, ScopeTree};
use rustc_hash::FxHashMap;
use yg_entry::{ResolvedType, Restriction};
use yg_span::Position;

/// A named type definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typedef {
    /// Typedef name
    pub name: String,
    /// Base type reference as written
    pub base: String,
    /// Restrictions on the base type
    pub restrictions: Vec<Restriction>,
    /// Scope owning the definition; the base resolves from here
    pub scope: ScopeId,
    /// Position of the `typedef` statement
    pub position: Position,
}

/// How prefixes in type references are interpreted for one module
#[derive(Debug, Clone, Default)]
pub struct TypeNamespace {
    /// The module's own prefix
    pub own_prefix: String,
    /// Import prefix → imported module name
    pub imports: FxHashMap<String, String>,
    /// Report references through import prefixes instead of deferring them
    pub strict_foreign: bool,
}

/// How a possibly prefixed reference should be looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeReference<'name> {
    /// Unprefixed or own-prefixed: resolve in this module's scopes
    Local(&'name str),
    /// Through an import prefix
    Foreign {
        /// The import prefix
        prefix: &'name str,
        /// Name in the imported module
        name: &'name str,
    },
    /// Prefix that is neither ours nor imported
    UnknownPrefix,
}

impl TypeNamespace {
    /// Create a namespace for a module with the given prefix
    pub fn new(own_prefix: impl Into<String>) -> Self {
        Self {
            own_prefix: own_prefix.into(),
            ..Self::default()
        }
    }

    /// Classify a reference by its prefix
    pub fn classify<'name>(&self, reference: &'name str) -> TypeReference<'name> {
        match reference.split_once(':') {
            None => TypeReference::Local(reference),
            Some((prefix, name)) if prefix == self.own_prefix => TypeReference::Local(name),
            Some((prefix, name)) if self.imports.contains_key(prefix) => {
                TypeReference::Foreign { prefix, name }
            }
            Some(_) => TypeReference::UnknownPrefix,
        }
    }

    /// Reference qualified with the module prefix when written bare
    pub fn qualify(&self, reference: &str) -> String {
        if reference.contains(':') || self.own_prefix.is_empty() {
            reference.to_string()
        } else {
            format!("{}:{reference}", self.own_prefix)
        }
    }
}

/// Per-scope typedef registry
#[derive(Debug, Clone, Default)]
pub struct TypeDictionary {
    dict: FxHashMap<ScopeId, FxHashMap<String, Typedef>>,
    namespace: TypeNamespace,
}

impl TypeDictionary {
    /// Create an empty dictionary for one module
    pub fn new(namespace: TypeNamespace) -> Self {
        Self {
            dict: FxHashMap::default(),
            namespace,
        }
    }

    /// Prefix rules in effect
    pub fn namespace(&self) -> &TypeNamespace {
        &self.namespace
    }

    /// Register `typedef` in its own scope.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::DuplicateTypedef` if the scope already defines the
    /// name or the name is a built-in type. The first definition is kept.
    pub fn register(&mut self, typedef: Typedef) -> Result<(), ScopeError> {
        if is_builtin(&typedef.name) {
            return Err(ScopeError::DuplicateTypedef {
                name: typedef.name,
                first: None,
            });
        }
        let scope_map = self.dict.entry(typedef.scope).or_default();
        if let Some(existing) = scope_map.get(&typedef.name) {
            return Err(ScopeError::DuplicateTypedef {
                name: typedef.name,
                first: Some(existing.position.clone()),
            });
        }
        tracing::trace!(name = %typedef.name, base = %typedef.base, "registered typedef");
        scope_map.insert(typedef.name.clone(), typedef);
        Ok(())
    }

    /// Typedef registered under `name` in `scope` itself, ignoring ancestors
    pub fn get_local(&self, scope: ScopeId, name: &str) -> Option<&Typedef> {
        self.dict.get(&scope).and_then(|scope_map| scope_map.get(name))
    }

    /// Nearest typedef named `name`, walking outward from `scope`
    pub fn lookup(&self, scopes: &ScopeTree, scope: ScopeId, name: &str) -> Option<&Typedef> {
        scopes
            .ancestors(scope)
            .find_map(|candidate| self.get_local(candidate, name))
    }

    /// Resolve a type reference as seen from `scope`.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::UnknownType` if the reference is neither built in,
    /// external, nor defined in an enclosing scope, and
    /// `ScopeError::CircularTypedef` if its typedef chain loops.
    pub fn resolve(
        &self,
        scopes: &ScopeTree,
        scope: ScopeId,
        reference: &str,
    ) -> Result<ResolvedType, ScopeError> {
        self.resolve_inner(scopes, scope, reference, &mut Vec::new())
    }

    /// Resolve the base of a registered typedef, treating a chain that returns
    /// to `typedef` itself as circular.
    ///
    /// # Errors
    ///
    /// As for [`resolve`](Self::resolve), for the typedef's base reference.
    pub fn resolve_base(
        &self,
        scopes: &ScopeTree,
        typedef: &Typedef,
    ) -> Result<ResolvedType, ScopeError> {
        let mut visiting = vec![(typedef.scope, typedef.name.clone())];
        self.resolve_inner(scopes, typedef.scope, &typedef.base, &mut visiting)
    }

    fn resolve_inner(
        &self,
        scopes: &ScopeTree,
        scope: ScopeId,
        reference: &str,
        visiting: &mut Vec<(ScopeId, String)>,
    ) -> Result<ResolvedType, ScopeError> {
        let name = match self.namespace.classify(reference) {
            TypeReference::Local(name) => name,
            TypeReference::Foreign { prefix, name } if !self.namespace.strict_foreign => {
                return Ok(ResolvedType::External {
                    prefix: prefix.to_string(),
                    name: name.to_string(),
                });
            }
            TypeReference::Foreign { .. } | TypeReference::UnknownPrefix => {
                return Err(ScopeError::UnknownType {
                    name: reference.to_string(),
                });
            }
        };

        if is_builtin(name) {
            return Ok(ResolvedType::Builtin {
                name: name.to_string(),
            });
        }

        let typedef = self
            .lookup(scopes, scope, name)
            .ok_or_else(|| ScopeError::UnknownType {
                name: reference.to_string(),
            })?;

        let key = (typedef.scope, typedef.name.clone());
        if visiting.contains(&key) {
            return Err(ScopeError::CircularTypedef {
                name: typedef.name.clone(),
            });
        }

        visiting.push(key);
        let base = self.resolve_inner(scopes, typedef.scope, &typedef.base, visiting);
        visiting.pop();

        let base = match base {
            Ok(base) => base,
            // An unknown base is reported once, where the typedef is defined.
            Err(ScopeError::UnknownType { .. }) => ResolvedType::Unresolved {
                name: typedef.base.clone(),
            },
            Err(other) => return Err(other),
        };

        Ok(ResolvedType::Derived {
            name: typedef.name.clone(),
            base: Box::new(base),
            restrictions: typedef.restrictions.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeKind;

    fn typedef(scope: ScopeId, name: &str, base: &str, line: u32) -> Typedef {
        Typedef {
            name: name.to_string(),
            base: base.to_string(),
            restrictions: Vec::new(),
            scope,
            position: Position::new("t.yang", line, 3),
        }
    }

    fn setup() -> (ScopeTree, ScopeId, TypeDictionary) {
        let mut scopes = ScopeTree::new("m");
        let inner = scopes.create_child(scopes.module_scope, ScopeKind::Data, "c");
        let mut namespace = TypeNamespace::new("m");
        namespace.imports.insert("ext".to_string(), "external".to_string());
        (scopes, inner, TypeDictionary::new(namespace))
    }

    #[test]
    fn test_builtin_never_consults_dictionary() {
        let (scopes, inner, dict) = setup();
        assert_eq!(
            dict.resolve(&scopes, inner, "string"),
            Ok(ResolvedType::Builtin {
                name: "string".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let (scopes, _, mut dict) = setup();
        let module = scopes.module_scope;
        dict.register(typedef(module, "t", "string", 1)).unwrap();
        let err = dict.register(typedef(module, "t", "int8", 2)).unwrap_err();
        assert_eq!(
            err,
            ScopeError::DuplicateTypedef {
                name: "t".to_string(),
                first: Some(Position::new("t.yang", 1, 3)),
            }
        );
        assert_eq!(dict.get_local(module, "t").unwrap().base, "string");
    }

    #[test]
    fn test_builtin_name_cannot_be_redefined() {
        let (scopes, _, mut dict) = setup();
        let err = dict
            .register(typedef(scopes.module_scope, "string", "int8", 1))
            .unwrap_err();
        assert!(matches!(err, ScopeError::DuplicateTypedef { first: None, .. }));
    }

    #[test]
    fn test_nearest_scope_shadows() {
        let (scopes, inner, mut dict) = setup();
        dict.register(typedef(scopes.module_scope, "t", "string", 1)).unwrap();
        dict.register(typedef(inner, "t", "int8", 2)).unwrap();

        let from_inner = dict.resolve(&scopes, inner, "t").unwrap();
        assert_eq!(from_inner.builtin_base(), Some("int8"));
        let from_module = dict.resolve(&scopes, scopes.module_scope, "t").unwrap();
        assert_eq!(from_module.builtin_base(), Some("string"));
    }

    #[test]
    fn test_inner_typedef_invisible_from_outside() {
        let (scopes, inner, mut dict) = setup();
        dict.register(typedef(inner, "hidden", "string", 1)).unwrap();
        assert_eq!(
            dict.resolve(&scopes, scopes.module_scope, "hidden"),
            Err(ScopeError::UnknownType {
                name: "hidden".to_string()
            })
        );
    }

    #[test]
    fn test_prefixes() {
        let (scopes, inner, mut dict) = setup();
        dict.register(typedef(scopes.module_scope, "t", "string", 1)).unwrap();
        assert!(dict.resolve(&scopes, inner, "m:t").is_ok());
        assert_eq!(
            dict.resolve(&scopes, inner, "ext:thing"),
            Ok(ResolvedType::External {
                prefix: "ext".to_string(),
                name: "thing".to_string()
            })
        );
        assert!(dict.resolve(&scopes, inner, "nope:t").is_err());

        dict.namespace.strict_foreign = true;
        assert!(dict.resolve(&scopes, inner, "ext:thing").is_err());
    }

    #[test]
    fn test_unknown_base_becomes_placeholder() {
        let (scopes, _, mut dict) = setup();
        let module = scopes.module_scope;
        dict.register(typedef(module, "broken", "nothing", 1)).unwrap();
        let resolved = dict.resolve(&scopes, module, "broken").unwrap();
        assert!(resolved.is_unresolved());

        let broken = dict.get_local(module, "broken").unwrap();
        assert!(matches!(
            dict.resolve_base(&scopes, broken),
            Err(ScopeError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_cycle_is_detected() {
        let (scopes, _, mut dict) = setup();
        let module = scopes.module_scope;
        dict.register(typedef(module, "a", "b", 1)).unwrap();
        dict.register(typedef(module, "b", "a", 2)).unwrap();

        let a = dict.get_local(module, "a").unwrap();
        assert_eq!(
            dict.resolve_base(&scopes, a),
            Err(ScopeError::CircularTypedef {
                name: "a".to_string()
            })
        );
        assert!(matches!(
            dict.resolve(&scopes, module, "a"),
            Err(ScopeError::CircularTypedef { .. })
        ));
    }

    #[test]
    fn test_qualify() {
        let namespace = TypeNamespace::new("base");
        assert_eq!(namespace.qualify("unknown"), "base:unknown");
        assert_eq!(namespace.qualify("x:unknown"), "x:unknown");
    }
}

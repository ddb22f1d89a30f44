//! Value types carried by entries

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a schema entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Module or submodule root
    Module,
    /// `container`
    Container,
    /// `list`
    List,
    /// `leaf`
    Leaf,
    /// `leaf-list`
    LeafList,
    /// `choice`
    Choice,
    /// `case`, explicit or implied by a choice shorthand
    Case,
    /// Canonical body of a `grouping`
    Grouping,
    /// Record of a merged `augment`
    Augment,
    /// Sentinel built from absent input
    Error,
}

impl EntryKind {
    /// Keyword spelling of this kind
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Container => "container",
            Self::List => "list",
            Self::Leaf => "leaf",
            Self::LeafList => "leaf-list",
            Self::Choice => "choice",
            Self::Case => "case",
            Self::Grouping => "grouping",
            Self::Augment => "augment",
            Self::Error => "error",
        }
    }

    /// Whether entries of this kind carry a `type`
    pub fn is_typed(self) -> bool {
        matches!(self, Self::Leaf | Self::LeafList)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Tri-state `config` flag; `Unset` inherits from the parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Config {
    /// `config true`
    True,
    /// `config false`
    False,
    /// No valid `config` statement
    #[default]
    Unset,
}

impl Config {
    /// Parse a `config` argument; only the exact words `true` and `false` are valid
    pub fn from_argument(argument: &str) -> Option<Self> {
        match argument {
            "true" => Some(Self::True),
            "false" => Some(Self::False),
            _ => None,
        }
    }

    /// The explicit value, if any
    pub fn value(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Unset => None,
        }
    }
}

impl From<bool> for Config {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

/// A raw type restriction such as `range "1..10"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Restriction {
    /// `range`, `length` or `pattern`
    pub keyword: String,
    /// Restriction argument, unparsed
    pub argument: String,
}

/// Result of resolving a `type` reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolvedType {
    /// One of the built-in types
    Builtin {
        /// Built-in type name
        name: String,
    },
    /// A typedef, with its own base resolved in turn
    Derived {
        /// Typedef name
        name: String,
        /// What the typedef is defined in terms of
        base: Box<ResolvedType>,
        /// Restrictions declared on the typedef's `type`
        restrictions: Vec<Restriction>,
    },
    /// A reference through an import prefix, left to cross-module resolution
    External {
        /// Import prefix
        prefix: String,
        /// Name within the imported module
        name: String,
    },
    /// Placeholder for a reference that could not be resolved
    Unresolved {
        /// The reference as written
        name: String,
    },
}

impl ResolvedType {
    /// Name of the built-in type at the bottom of a typedef chain
    pub fn builtin_base(&self) -> Option<&str> {
        match self {
            Self::Builtin { name } => Some(name),
            Self::Derived { base, .. } => base.builtin_base(),
            Self::External { .. } | Self::Unresolved { .. } => None,
        }
    }

    /// Whether resolution failed somewhere along the chain
    pub fn is_unresolved(&self) -> bool {
        match self {
            Self::Unresolved { .. } => true,
            Self::Derived { base, .. } => base.is_unresolved(),
            Self::Builtin { .. } | Self::External { .. } => false,
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin { name } => write!(formatter, "{name}"),
            Self::Derived { name, base, .. } => write!(formatter, "{name}({base})"),
            Self::External { prefix, name } => write!(formatter, "{prefix}:{name}"),
            Self::Unresolved { name } => write!(formatter, "?{name}"),
        }
    }
}

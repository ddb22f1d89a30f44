//! Module identity metadata
//!
//! Read straight off the root statement, with no semantic checking. Cross
//! module tooling uses this to find what a module imports and includes.

use serde::{Deserialize, Serialize};
use yg_syntax::{Keyword, Statement};

/// Whether a source unit is a module or a submodule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// `module`
    Module,
    /// `submodule`
    Submodule,
}

/// An `import` of another module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Imported module name
    pub module: String,
    /// Prefix the importing module uses for it
    pub prefix: Option<String>,
}

/// An `include` of a submodule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Include {
    /// Included submodule name
    pub module: String,
}

/// Identity of one parsed module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Module name
    pub name: String,
    /// Module or submodule
    pub kind: ModuleKind,
    /// `namespace` argument, modules only
    pub namespace: Option<String>,
    /// Own prefix, or the `belongs-to` prefix of a submodule
    pub prefix: Option<String>,
    /// Parent module of a submodule
    pub belongs_to: Option<String>,
    /// Imports in document order
    pub imports: Vec<Import>,
    /// Includes in document order
    pub includes: Vec<Include>,
}

impl ModuleInfo {
    /// Extract identity metadata from a root statement
    pub fn from_statement(root: &Statement) -> Self {
        let kind = match root.kind() {
            Keyword::Submodule => ModuleKind::Submodule,
            _ => ModuleKind::Module,
        };
        let belongs_to = root.child(Keyword::BelongsTo);
        let prefix = root
            .child_arg(Keyword::Prefix)
            .or_else(|| belongs_to.and_then(|stmt| stmt.child_arg(Keyword::Prefix)))
            .map(str::to_string);

        Self {
            name: root.arg().to_string(),
            kind,
            namespace: root.child_arg(Keyword::Namespace).map(str::to_string),
            prefix,
            belongs_to: belongs_to.map(|stmt| stmt.arg().to_string()),
            imports: root
                .children_of(Keyword::Import)
                .map(|import| Import {
                    module: import.arg().to_string(),
                    prefix: import.child_arg(Keyword::Prefix).map(str::to_string),
                })
                .collect(),
            includes: root
                .children_of(Keyword::Include)
                .map(|include| Include {
                    module: include.arg().to_string(),
                })
                .collect(),
        }
    }
}

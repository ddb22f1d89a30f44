//! Processing options

use serde::{Deserialize, Serialize};

/// Options controlling how statement trees are lowered to entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessOptions {
    /// Config value of module roots, inherited by everything below them
    pub root_config: bool,
    /// Report type references through import prefixes as unknown instead of
    /// deferring them to cross-module resolution
    pub strict_foreign_types: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessOptions {
    /// Default options
    #[must_use]
    pub fn new() -> Self {
        Self {
            root_config: true,
            strict_foreign_types: false,
        }
    }

    /// Set the root config value
    #[must_use]
    pub fn with_root_config(mut self, root_config: bool) -> Self {
        self.root_config = root_config;
        self
    }

    /// Set strict handling of foreign type references
    #[must_use]
    pub fn with_strict_foreign_types(mut self, strict: bool) -> Self {
        self.strict_foreign_types = strict;
        self
    }
}

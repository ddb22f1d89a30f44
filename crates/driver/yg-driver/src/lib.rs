//! Module registry and processing driver
//!
//! [`Modules`] is the entry point for tooling: feed it source units with
//! [`Modules::parse`], then call [`Modules::process`] once to build every
//! module's entry tree and collect every semantic defect in one ordered list.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut modules = Modules::new();
//! modules.parse(text, "bad.yang")?;
//! for error in modules.process() {
//!     eprintln!("{error}");
//! }
//! ```

pub mod info;

pub use info::{Import, Include, ModuleInfo, ModuleKind};
pub use yg_entry::{EntryTree, SemanticError, SemanticErrorKind};
pub use yg_lower::ProcessOptions;
pub use yg_parser::ParseError;

use indexmap::IndexMap;
use yg_syntax::Statement;

/// A successfully parsed source unit
#[derive(Debug, Clone)]
struct ParsedModule {
    root: Statement,
    info: ModuleInfo,
}

/// Registry of parsed modules, processed in registration order
#[derive(Debug, Default)]
pub struct Modules {
    options: ProcessOptions,
    /// Parsed source units by registration name
    parsed: IndexMap<String, ParsedModule>,
    /// Entry trees from the last `process()`
    trees: IndexMap<String, EntryTree>,
}

impl Modules {
    /// Create an empty registry with default options
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ProcessOptions::default())
    }

    /// Create an empty registry with the given options
    #[must_use]
    pub fn with_options(options: ProcessOptions) -> Self {
        Self {
            options,
            parsed: IndexMap::new(),
            trees: IndexMap::new(),
        }
    }

    /// Options used by `process()`
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Parse `text` and store it under `name`.
    ///
    /// Only syntax is checked here. Parsing a name again replaces the stored
    /// unit without changing its place in the processing order.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] for malformed text; the unit is then not
    /// stored and takes no part in processing.
    pub fn parse(&mut self, text: &str, name: &str) -> Result<(), ParseError> {
        let root = yg_parser::parse_source(text, name)?;
        let info = ModuleInfo::from_statement(&root);
        tracing::debug!(source = name, module = %info.name, "registered module");
        self.parsed
            .insert(name.to_string(), ParsedModule { root, info });
        Ok(())
    }

    /// Build the entry tree of every stored module and return every semantic
    /// error, modules in registration order and errors in document order.
    ///
    /// Each call starts from scratch, so repeated calls on the same input
    /// return the same list.
    pub fn process(&mut self) -> Vec<SemanticError> {
        let mut errors = Vec::new();
        self.trees.clear();
        for (name, module) in &self.parsed {
            let before = errors.len();
            let tree = yg_lower::lower_module(&module.root, &self.options, &mut errors);
            tracing::debug!(
                source = %name,
                errors = errors.len() - before,
                "processed module"
            );
            self.trees.insert(name.clone(), tree);
        }
        tracing::info!(
            modules = self.parsed.len(),
            errors = errors.len(),
            "processing complete"
        );
        errors
    }

    /// Entry tree built for `name` by the last `process()`
    pub fn entry_tree(&self, name: &str) -> Option<&EntryTree> {
        self.trees.get(name)
    }

    /// Identity metadata of the unit stored under `name`
    pub fn module_info(&self, name: &str) -> Option<&ModuleInfo> {
        self.parsed.get(name).map(|module| &module.info)
    }

    /// Registration names in processing order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parsed.keys().map(String::as_str)
    }

    /// Number of stored units
    pub fn len(&self) -> usize {
        self.parsed.len()
    }

    /// Whether no unit is stored
    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_errors_follow_registration_order() {
        let mut modules = Modules::new();
        modules
            .parse("module b {\n  prefix b;\n  leaf x { type nope; }\n}\n", "b.yang")
            .unwrap();
        modules
            .parse("module a {\n  prefix a;\n  container c { config 1; }\n}\n", "a.yang")
            .unwrap();
        let rendered: Vec<String> = modules.process().iter().map(ToString::to_string).collect();
        expect![[r#"
            [
                "b.yang:3:12: unknown type: b:nope",
                "a.yang:3:3: invalid config value: 1",
            ]
        "#]]
        .assert_debug_eq(&rendered);
    }

    #[test]
    fn test_syntax_error_excludes_unit() {
        let mut modules = Modules::new();
        assert!(modules.parse("module broken {", "broken.yang").is_err());
        modules.parse("module ok { prefix ok; }", "ok.yang").unwrap();
        assert!(modules.process().is_empty());
        assert!(modules.entry_tree("broken.yang").is_none());
        assert!(modules.entry_tree("ok.yang").is_some());
    }

    #[test]
    fn test_reparse_keeps_slot() {
        let mut modules = Modules::new();
        modules.parse("module a { prefix a; }", "a.yang").unwrap();
        modules.parse("module b { prefix b; }", "b.yang").unwrap();
        modules.parse("module a2 { prefix a; }", "a.yang").unwrap();
        let names: Vec<_> = modules.names().collect();
        assert_eq!(names, vec!["a.yang", "b.yang"]);
        assert_eq!(modules.module_info("a.yang").unwrap().name, "a2");
    }

    #[test]
    fn test_root_config_option() {
        let mut modules = Modules::with_options(ProcessOptions::new().with_root_config(false));
        modules
            .parse("module m { prefix m; leaf x { type string; } }", "m.yang")
            .unwrap();
        assert!(modules.process().is_empty());
        let tree = modules.entry_tree("m.yang").unwrap();
        assert!(!tree.root_ref().child("x").unwrap().config());
    }
}

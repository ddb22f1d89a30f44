//! Integration test utilities for the schema processor

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use yg_driver::{Modules, ProcessOptions, SemanticError};

/// Directory holding the `.yang` fixtures shipped with these tests
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Install a `tracing` subscriber once per test binary, filtered by `RUST_LOG`
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        if let Err(error) = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
        {
            tracing::warn!(%error, "tracing already initialized");
        }
    });
}

/// Test fixture helper
pub struct TestFixture {
    /// Registry the fixture's sources are parsed into
    pub modules: Modules,
    /// Registration names, in the order sources were added
    pub names: Vec<String>,
}

impl TestFixture {
    /// Creates a new test fixture
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ProcessOptions::default())
    }

    /// Creates a new test fixture processing with `options`
    #[must_use]
    pub fn with_options(options: ProcessOptions) -> Self {
        init_tracing();
        Self {
            modules: Modules::with_options(options),
            names: Vec::new(),
        }
    }

    /// Parses `contents` and registers it under `name`
    ///
    /// # Errors
    ///
    /// Returns an error if the source does not parse
    pub fn add_source(&mut self, name: &str, contents: &str) -> Result<()> {
        self.modules
            .parse(contents, name)
            .with_context(|| format!("failed to parse {name}"))?;
        self.names.push(name.to_string());
        Ok(())
    }

    /// Loads every `.yang` file of a directory, sorted by file name
    ///
    /// Sources are registered under their file names.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or a file does not parse
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_dir_with_options(dir, ProcessOptions::default())
    }

    /// As [`from_dir`](Self::from_dir), processing with `options`
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or a file does not parse
    pub fn from_dir_with_options(dir: impl AsRef<Path>, options: ProcessOptions) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "yang") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut fixture = Self::with_options(options);
        for path in paths {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            fixture.add_source(&name, &contents)?;
        }
        Ok(fixture)
    }

    /// Loads a directory under [`fixtures_dir`]
    ///
    /// # Errors
    ///
    /// As for [`from_dir`](Self::from_dir)
    pub fn fixture(name: &str) -> Result<Self> {
        Self::from_dir(fixtures_dir().join(name))
    }

    /// Processes every registered source
    pub fn process(&mut self) -> Vec<SemanticError> {
        self.modules.process()
    }

    /// Processes and renders each error on its own line
    pub fn process_rendered(&mut self) -> String {
        self.process()
            .iter()
            .map(|error| format!("{error}\n"))
            .collect()
    }

    /// Entry tree of `name` from the last `process()`
    ///
    /// # Errors
    ///
    /// Returns an error if `name` was never processed
    pub fn tree(&self, name: &str) -> Result<&yg_entry::EntryTree> {
        self.modules
            .entry_tree(name)
            .with_context(|| format!("no entry tree for {name}"))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `files` into a fresh temporary directory
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be created
pub fn write_temp_dir(files: &[(&str, &str)]) -> Result<tempfile::TempDir> {
    let dir = tempfile::tempdir()?;
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents)?;
    }
    Ok(dir)
}

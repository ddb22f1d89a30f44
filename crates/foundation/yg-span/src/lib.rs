//! Source positions and spans

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

/// A byte offset span in a source text
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start offset
    pub start: u32,
    /// Exclusive end offset
    pub end: u32,
}

impl Span {
    /// Create a new span
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Byte range covered by this span
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Length in bytes
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start as u32, range.end as u32)
    }
}

/// A human-facing location: the source unit name plus a 1-based line and column.
///
/// Renders as `<source>:<line>:<column>`, the prefix every diagnostic carries.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize, Display)]
#[display("{source}:{line}:{column}")]
pub struct Position {
    /// Name the source unit was registered under
    pub source: Arc<str>,
    /// 1-based line
    pub line: u32,
    /// 1-based column, counted in characters
    pub column: u32,
}

impl Position {
    /// Create a new position
    pub fn new(source: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
        Self {
            source: source.into(),
            line,
            column,
        }
    }

    /// Position used for entries that have no underlying statement
    pub fn synthetic() -> Self {
        Self::new("<none>", 0, 0)
    }
}

/// Maps byte offsets to 1-based line/column positions.
///
/// Built once per source text. Line breaks are detected by `\n`; a `\r`
/// before it counts as an ordinary character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line. First entry is always 0.
    line_starts: Vec<u32>,
    /// Total length of the text in bytes.
    len: u32,
}

impl LineIndex {
    /// Build a `LineIndex` by scanning `text` for newlines
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Convert a byte offset in `text` to a 1-based `(line, column)` pair.
    ///
    /// `text` must be the text the index was built from. Offsets beyond the
    /// end clamp to the end of the text.
    pub fn line_col(&self, text: &str, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[line] as usize;
        let column = text
            .get(start..offset as usize)
            .map_or(0, |prefix| prefix.chars().count());
        (line as u32 + 1, column as u32 + 1)
    }

    /// Resolve a byte offset to a named `Position`
    pub fn position(&self, source: &Arc<str>, text: &str, offset: u32) -> Position {
        let (line, column) = self.line_col(text, offset);
        Position {
            source: Arc::clone(source),
            line,
            column,
        }
    }

    /// Number of lines in the text
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

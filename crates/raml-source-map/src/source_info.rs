//! Source location information for document nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location of a node or diagnostic.
///
/// Tracks the position of an element in the file it was read from. Line and
/// column are 1-based for display; `offset` and `len` are byte positions used
/// for slicing and for rendering source snippets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// File the element was read from, if known
    pub file: Option<String>,

    /// Byte offset from start of source (0-based)
    pub offset: usize,

    /// Line number (1-based)
    pub line: usize,

    /// Column number (1-based, in characters not bytes)
    pub col: usize,

    /// Length in bytes
    pub len: usize,
}

impl SourceInfo {
    /// Create a new SourceInfo with all fields specified.
    pub fn new(file: Option<String>, offset: usize, line: usize, col: usize, len: usize) -> Self {
        Self {
            file,
            offset,
            line,
            col,
            len,
        }
    }

    /// Location covering a whole file, used for nodes synthesised from
    /// unparsed content (plain-text fragments).
    pub fn whole_file(file: impl Into<String>, len: usize) -> Self {
        Self {
            file: Some(file.into()),
            offset: 0,
            line: 1,
            col: 1,
            len,
        }
    }

    /// Set the filename for this source location.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Get the end offset (exclusive) of this location.
    pub fn end_offset(&self) -> usize {
        self.offset + self.len
    }

    /// Byte range of this location, for slicing the source text.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.offset..self.end_offset()
    }
}

impl Default for SourceInfo {
    fn default() -> Self {
        Self {
            file: None,
            offset: 0,
            line: 1,
            col: 1,
            len: 0,
        }
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.col),
            None => write!(f, "<input>:{}:{}", self.line, self.col),
        }
    }
}

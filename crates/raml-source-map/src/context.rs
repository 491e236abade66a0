//! Source context holding file contents for snippet rendering.

use std::collections::HashMap;

/// File contents keyed by the path recorded in [`SourceInfo::file`].
///
/// Diagnostics only carry locations; whoever renders them supplies the text
/// through a context.
///
/// [`SourceInfo::file`]: crate::SourceInfo::file
#[derive(Debug, Clone, Default)]
pub struct SourceContext {
    files: HashMap<String, String>,
}

impl SourceContext {
    /// Create a new empty source context
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the content of a file, replacing any earlier content.
    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Register a file by reading it from disk.
    ///
    /// Files that cannot be read are skipped; rendering then falls back to
    /// text without a snippet.
    pub fn add_disk_file(&mut self, path: &str) -> bool {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                self.add_file(path, content);
                true
            }
            Err(_) => false,
        }
    }

    /// Content of a registered file.
    pub fn get_content(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

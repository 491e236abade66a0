//! Access to the files an include refers to.
//!
//! The resolver never touches the file system directly. It reads through a
//! [`SourceReader`], so embedders can serve files from memory, a sandbox or a
//! virtual file system:
//!
//! - [`NativeReader`]: the real file system
//! - [`InMemoryReader`]: a fixed set of in-memory files

use crate::path_context::normalize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Reads the raw bytes of a resolved include path.
///
/// Implementations must release any handle they open before returning.
pub trait SourceReader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

impl<T: SourceReader + ?Sized> SourceReader for &T {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }
}

impl<T: SourceReader + ?Sized> SourceReader for Box<T> {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }
}

/// Reads files from the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeReader;

impl SourceReader for NativeReader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Serves files from memory.
///
/// Paths are normalised lexically on insert and on lookup, so
/// `/specs/./a.raml` and `/specs/a.raml` name the same file.
///
/// ```
/// use raml_include::{InMemoryReader, SourceReader};
/// use std::path::Path;
///
/// let reader = InMemoryReader::new().with_file("/specs/a.raml", "type: string\n");
/// assert_eq!(reader.read(Path::new("/specs/./a.raml")).unwrap(), b"type: string\n");
/// assert!(reader.read(Path::new("/specs/b.raml")).is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryReader {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl InMemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style.
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.files.insert(normalize(path.as_ref()), contents.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceReader for InMemoryReader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(&normalize(path)).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }
}

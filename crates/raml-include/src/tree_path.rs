//! Locations of nodes inside a document tree.

use raml_yaml::Yaml;
use std::fmt;

/// A segment in a tree path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Mapping key
    Key(String),
    /// Sequence index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // `~` and `/` are escaped as in JSON Pointer, so RAML resource
            // keys like `/lights` stay unambiguous.
            PathSegment::Key(key) => write!(f, "{}", key.replace('~', "~0").replace('/', "~1")),
            PathSegment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

/// Slash-separated path to a node, e.g. `/resource/get/0`.
///
/// The root is `/`.
///
/// ```
/// use raml_include::TreePath;
///
/// let mut path = TreePath::new();
/// path.push_key("resource");
/// path.push_index(0);
/// assert_eq!(path.to_string(), "/resource/0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreePath {
    segments: Vec<PathSegment>,
}

impl TreePath {
    /// Create a path pointing at the root.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Push a key segment onto the path
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Push an index segment onto the path
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Pop the last segment from the path
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// True for the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Text used for a mapping key in a tree path.
pub(crate) fn key_segment(key: &Yaml) -> String {
    match key {
        Yaml::String(s) | Yaml::Real(s) => s.clone(),
        Yaml::Integer(i) => i.to_string(),
        Yaml::Boolean(b) => b.to_string(),
        Yaml::Null => "~".to_string(),
        _ => "?".to_string(),
    }
}

//! Resolution of include references against a base directory.

use std::path::{Component, Path, PathBuf};

/// The base directory relative include references are resolved against.
///
/// The base is fixed when the context is created. References inside an
/// included file are still resolved against it, not against the directory of
/// the including file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    base_dir: PathBuf,
}

impl PathContext {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a reference to the path that will be read.
    ///
    /// Absolute references are used unchanged. Relative references are
    /// joined to the base directory and normalised lexically.
    ///
    /// ```
    /// use raml_include::PathContext;
    /// use std::path::PathBuf;
    ///
    /// let ctx = PathContext::new("/specs");
    /// assert_eq!(ctx.resolve("common.raml"), PathBuf::from("/specs/common.raml"));
    /// assert_eq!(ctx.resolve("../shared/a.raml"), PathBuf::from("/shared/a.raml"));
    /// ```
    pub fn resolve(&self, reference: impl AsRef<Path>) -> PathBuf {
        let reference = reference.as_ref();
        if reference.is_absolute() {
            return reference.to_path_buf();
        }
        normalize(&self.base_dir.join(reference))
    }
}

/// Lexically normalise a path: drop `.` components and fold `..` into the
/// preceding component. The file system is never consulted, so symlinks are
/// not followed.
///
/// `..` directly under the root is dropped; leading `..` of a relative path
/// are kept. An empty result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_relative_reference_joins_base() {
        let ctx = PathContext::new("/specs");
        assert_eq!(ctx.resolve("common.raml"), PathBuf::from("/specs/common.raml"));
        assert_eq!(ctx.resolve("./types/a.raml"), PathBuf::from("/specs/types/a.raml"));
    }

    #[test]
    fn test_absolute_reference_unchanged() {
        let ctx = PathContext::new("/specs");
        assert_eq!(ctx.resolve("/other/x.raml"), PathBuf::from("/other/x.raml"));
    }

    #[test]
    fn test_relative_base() {
        let ctx = PathContext::new("specs");
        assert_eq!(ctx.resolve("a/../b.raml"), PathBuf::from("specs/b.raml"));

        let ctx = PathContext::new(".");
        assert_eq!(ctx.resolve("api.raml"), PathBuf::from("api.raml"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("../a/b/../..")), PathBuf::from(".."));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("")), PathBuf::from("."));
    }

    proptest! {
        #[test]
        fn test_normalize_is_idempotent(parts in prop::collection::vec("[a-c]|\\.|\\.\\.", 0..8), absolute in any::<bool>()) {
            let mut raw = parts.join("/");
            if absolute {
                raw.insert(0, '/');
            }
            let once = normalize(Path::new(&raw));
            let twice = normalize(&once);
            prop_assert_eq!(&once, &twice);
            prop_assert!(!once.components().any(|c| c == Component::CurDir) || once == Path::new("."));
        }
    }
}

//! Bottom-up construction of the resolved tree.
//!
//! The input document is never mutated. Each resolved node is pushed into an
//! arena and its parent refers to it by [`NodeId`], so splicing a fragment
//! only affects the position it was included at.

use crate::classify::{FileType, get_file_type};
use crate::error::{ResolveError, ResolveWarning, Result};
use crate::fragment::Fragment;
use crate::tree::{NodeId, ResolvedKey, ResolvedKind, ResolvedNode, ResolvedTree};
use crate::tree_path::TreePath;
use raml_source_map::SourceInfo;
use raml_yaml::Yaml;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub(crate) struct TreeSplicer {
    nodes: Vec<ResolvedNode>,
    includes: Vec<PathBuf>,
    warnings: Vec<ResolveWarning>,
}

impl TreeSplicer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a loaded file; returns the origin index for its nodes.
    pub(crate) fn record_include(&mut self, path: PathBuf) -> usize {
        self.includes.push(path);
        self.includes.len() - 1
    }

    pub(crate) fn warn(&mut self, warning: ResolveWarning) {
        self.warnings.push(warning);
    }

    pub(crate) fn push(&mut self, kind: ResolvedKind, source_info: SourceInfo, origin: Option<usize>) -> NodeId {
        self.nodes.push(ResolvedNode {
            kind,
            source_info,
            origin,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn kind(&self, id: NodeId) -> Option<&ResolvedKind> {
        self.nodes.get(id.0).map(|node| &node.kind)
    }

    /// Build a mapping node.
    ///
    /// `merges` lists `(position, mapping)` pairs: the entries of each merged
    /// mapping are inserted before the explicit entry at `position`. Explicit
    /// keys win over merged ones, and earlier merges win over later ones.
    pub(crate) fn mapping(
        &mut self,
        explicit: Vec<(ResolvedKey, NodeId)>,
        merges: Vec<(usize, NodeId)>,
        source_info: SourceInfo,
        origin: Option<usize>,
    ) -> NodeId {
        if merges.is_empty() {
            return self.push(ResolvedKind::Mapping(explicit), source_info, origin);
        }

        let explicit_keys: Vec<Yaml> = explicit.iter().map(|(key, _)| key.value.clone()).collect();
        let count = explicit.len();
        let mut explicit = explicit.into_iter();
        let mut merges = merges.into_iter().peekable();
        let mut entries: Vec<(ResolvedKey, NodeId)> = Vec::new();

        for position in 0..=count {
            while let Some((_, source)) = merges.next_if(|(at, _)| *at == position) {
                for (key, value) in self.mapping_entries(source) {
                    let shadowed = explicit_keys.contains(&key.value)
                        || entries.iter().any(|(k, _)| k.value == key.value);
                    if !shadowed {
                        entries.push((key, value));
                    }
                }
            }
            if let Some(entry) = explicit.next() {
                entries.push(entry);
            }
        }

        self.push(ResolvedKind::Mapping(entries), source_info, origin)
    }

    fn mapping_entries(&self, id: NodeId) -> Vec<(ResolvedKey, NodeId)> {
        match self.kind(id) {
            Some(ResolvedKind::Mapping(entries)) => entries.clone(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn finish(self, root: NodeId) -> ResolvedTree {
        ResolvedTree {
            nodes: self.nodes,
            root,
            includes: self.includes,
            warnings: self.warnings,
        }
    }
}

/// The key an included fragment stands for.
///
/// Only text and YAML scalars can be mapping keys.
pub(crate) fn key_from_fragment(
    fragment: &Fragment,
    tree_path: &TreePath,
    location: &SourceInfo,
) -> Result<Yaml> {
    match fragment {
        Fragment::Text(text) => Ok(Yaml::String(text.clone())),
        Fragment::Yaml(node) if node.is_scalar() && get_file_type(node) == FileType::NoTag => {
            Ok(node.yaml.clone())
        }
        Fragment::Yaml(node) if node.is_scalar() => Err(composition_error(
            tree_path,
            "text or a YAML scalar for a mapping key",
            "nested include",
            location,
        )),
        other => Err(composition_error(
            tree_path,
            "text or a YAML scalar for a mapping key",
            other.describe(),
            location,
        )),
    }
}

/// Check that a fragment included under a `<<` merge key can be merged.
pub(crate) fn ensure_mergeable(
    fragment: &Fragment,
    tree_path: &TreePath,
    location: &SourceInfo,
) -> Result<()> {
    match fragment {
        Fragment::Yaml(node) if node.is_hash() => Ok(()),
        other => Err(composition_error(
            tree_path,
            "a YAML mapping to merge",
            other.describe(),
            location,
        )),
    }
}

fn composition_error(
    tree_path: &TreePath,
    expected: &str,
    found: &str,
    location: &SourceInfo,
) -> ResolveError {
    ResolveError::Composition {
        tree_path: tree_path.clone(),
        expected: expected.to_string(),
        found: found.to_string(),
        location: location.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn key(s: &str) -> ResolvedKey {
        ResolvedKey::new(Yaml::String(s.into()), SourceInfo::default())
    }

    fn scalar(splicer: &mut TreeSplicer, value: i64) -> NodeId {
        splicer.push(ResolvedKind::Scalar(Yaml::Integer(value)), SourceInfo::default(), None)
    }

    #[test]
    fn test_mapping_without_merges_keeps_order() {
        let mut splicer = TreeSplicer::new();
        let a = scalar(&mut splicer, 1);
        let b = scalar(&mut splicer, 2);
        let root = splicer.mapping(vec![(key("b"), b), (key("a"), a)], vec![], SourceInfo::default(), None);

        let tree = splicer.finish(root);
        let keys: Vec<String> = match &tree[root].kind {
            ResolvedKind::Mapping(entries) => entries.iter().map(|(k, _)| k.as_string()).collect(),
            _ => panic!("expected a mapping"),
        };
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_merge_explicit_keys_win() {
        let mut splicer = TreeSplicer::new();
        let one = scalar(&mut splicer, 1);
        let two = scalar(&mut splicer, 2);
        let three = scalar(&mut splicer, 3);
        let base = splicer.mapping(
            vec![(key("type"), one), (key("required"), two)],
            vec![],
            SourceInfo::default(),
            None,
        );
        let root = splicer.mapping(
            vec![(key("required"), three)],
            vec![(0, base)],
            SourceInfo::default(),
            None,
        );

        let tree = splicer.finish(root);
        assert_eq!(tree.to_json(), json!({"type": 1, "required": 3}));
    }

    #[test]
    fn test_earlier_merge_wins() {
        let mut splicer = TreeSplicer::new();
        let one = scalar(&mut splicer, 1);
        let two = scalar(&mut splicer, 2);
        let first = splicer.mapping(vec![(key("x"), one)], vec![], SourceInfo::default(), None);
        let second = splicer.mapping(vec![(key("x"), two)], vec![], SourceInfo::default(), None);
        let root = splicer.mapping(vec![], vec![(0, first), (0, second)], SourceInfo::default(), None);

        assert_eq!(splicer.finish(root).to_json(), json!({"x": 1}));
    }

    #[test]
    fn test_key_from_fragment() {
        let path = TreePath::new();
        let loc = SourceInfo::default();

        let text = Fragment::Text("get".into());
        assert_eq!(key_from_fragment(&text, &path, &loc).unwrap(), Yaml::String("get".into()));

        let scalar = Fragment::Yaml(raml_yaml::parse("200").unwrap());
        assert_eq!(key_from_fragment(&scalar, &path, &loc).unwrap(), Yaml::Integer(200));

        let json = Fragment::Json(json!("get"));
        let err = key_from_fragment(&json, &path, &loc).unwrap_err();
        assert!(matches!(err, ResolveError::Composition { found, .. } if found == "JSON document"));

        let mapping = Fragment::Yaml(raml_yaml::parse("a: 1").unwrap());
        assert!(key_from_fragment(&mapping, &path, &loc).is_err());

        let nested = Fragment::Yaml(raml_yaml::parse("!include other.txt").unwrap());
        let err = key_from_fragment(&nested, &path, &loc).unwrap_err();
        assert!(matches!(err, ResolveError::Composition { found, .. } if found == "nested include"));

        let tagged = Fragment::Yaml(raml_yaml::parse("!!str 200").unwrap());
        assert_eq!(key_from_fragment(&tagged, &path, &loc).unwrap(), Yaml::String("200".into()));
    }

    #[test]
    fn test_ensure_mergeable() {
        let path = TreePath::new();
        let loc = SourceInfo::default();

        let mapping = Fragment::Yaml(raml_yaml::parse("a: 1").unwrap());
        assert!(ensure_mergeable(&mapping, &path, &loc).is_ok());

        let sequence = Fragment::Yaml(raml_yaml::parse("[1]").unwrap());
        let err = ensure_mergeable(&sequence, &path, &loc).unwrap_err();
        assert!(matches!(err, ResolveError::Composition { found, .. } if found == "YAML sequence"));

        let json = Fragment::Json(json!({"a": 1}));
        assert!(ensure_mergeable(&json, &path, &loc).is_err());
    }
}

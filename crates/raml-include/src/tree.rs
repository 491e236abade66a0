//! The resolved document: an arena of nodes addressed by [`NodeId`].

use crate::error::ResolveWarning;
use raml_source_map::SourceInfo;
use raml_yaml::Yaml;
use serde_json::{Map, Number, Value};
use std::ops::Index;
use std::path::{Path, PathBuf};

/// Index of a node in a [`ResolvedTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A mapping key of the resolved tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedKey {
    pub value: Yaml,
    pub source_info: SourceInfo,
}

impl ResolvedKey {
    pub fn new(value: Yaml, source_info: SourceInfo) -> Self {
        Self { value, source_info }
    }

    /// The key as a string, as used for JSON object keys.
    pub fn as_string(&self) -> String {
        key_to_string(&self.value)
    }
}

/// Content of a resolved node.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedKind {
    /// A YAML scalar (string, number, boolean, null)
    Scalar(Yaml),
    Sequence(Vec<NodeId>),
    /// Entries in document order
    Mapping(Vec<(ResolvedKey, NodeId)>),
    /// A JSON fragment, kept as parsed
    Json(Value),
    /// A text fragment
    Text(String),
}

impl ResolvedKind {
    /// Short description used in composition errors.
    pub fn describe(&self) -> &'static str {
        match self {
            ResolvedKind::Scalar(_) => "YAML scalar",
            ResolvedKind::Sequence(_) => "YAML sequence",
            ResolvedKind::Mapping(_) => "YAML mapping",
            ResolvedKind::Json(_) => "JSON document",
            ResolvedKind::Text(_) => "text",
        }
    }
}

/// A node of the resolved tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    pub kind: ResolvedKind,
    /// Where the node's content was written
    pub source_info: SourceInfo,
    /// Index into [`ResolvedTree::includes`] of the file this node came from
    pub(crate) origin: Option<usize>,
}

/// A fully resolved document.
///
/// Nodes are stored in an arena and refer to their children by [`NodeId`].
/// No include tags remain: every include has been replaced by the content of
/// the file it named.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTree {
    pub(crate) nodes: Vec<ResolvedNode>,
    pub(crate) root: NodeId,
    pub(crate) includes: Vec<PathBuf>,
    pub(crate) warnings: Vec<ResolveWarning>,
}

impl ResolvedTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&ResolvedNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Files loaded during resolution, in load order.
    ///
    /// A file included from several places appears once per load.
    pub fn includes(&self) -> &[PathBuf] {
        &self.includes
    }

    /// Problems found during resolution that did not stop it.
    pub fn warnings(&self) -> &[ResolveWarning] {
        &self.warnings
    }

    /// The included file a node was loaded from, or None for nodes of the
    /// root document.
    pub fn origin(&self, id: NodeId) -> Option<&Path> {
        let index = self.get(id)?.origin?;
        self.includes.get(index).map(PathBuf::as_path)
    }

    /// Look up a mapping entry by string key.
    pub fn get_key(&self, id: NodeId, key: &str) -> Option<NodeId> {
        match &self.get(id)?.kind {
            ResolvedKind::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| k.value.as_str() == Some(key))
                .map(|(_, value)| *value),
            _ => None,
        }
    }

    /// Look up a sequence item by index.
    pub fn get_index(&self, id: NodeId, index: usize) -> Option<NodeId> {
        match &self.get(id)?.kind {
            ResolvedKind::Sequence(items) => items.get(index).copied(),
            _ => None,
        }
    }

    /// Follow a path of mapping keys from the root.
    pub fn lookup(&self, keys: &[&str]) -> Option<NodeId> {
        keys.iter()
            .try_fold(self.root, |id, key| self.get_key(id, key))
    }

    /// Convert the whole tree to JSON.
    ///
    /// JSON fragments are embedded as parsed, text fragments become strings,
    /// YAML scalars map to the matching JSON scalar and non-string mapping
    /// keys are stringified.
    ///
    /// ```
    /// use raml_include::{IncludeResolver, InMemoryReader};
    ///
    /// let reader = InMemoryReader::new().with_file("/specs/schema.json", r#"{"type": "object"}"#);
    /// let resolver = IncludeResolver::with_reader("/specs", reader);
    /// let doc = raml_yaml::parse("schema: !include-json schema.json\ncount: 3").unwrap();
    ///
    /// let tree = resolver.resolve(&doc).unwrap();
    /// assert_eq!(
    ///     tree.to_json(),
    ///     serde_json::json!({"schema": {"type": "object"}, "count": 3})
    /// );
    /// ```
    pub fn to_json(&self) -> Value {
        self.node_to_json(self.root)
    }

    fn node_to_json(&self, id: NodeId) -> Value {
        let Some(node) = self.get(id) else {
            return Value::Null;
        };
        match &node.kind {
            ResolvedKind::Scalar(yaml) => yaml_to_json(yaml),
            ResolvedKind::Sequence(items) => {
                Value::Array(items.iter().map(|item| self.node_to_json(*item)).collect())
            }
            ResolvedKind::Mapping(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key.as_string(), self.node_to_json(*value));
                }
                Value::Object(map)
            }
            ResolvedKind::Json(value) => value.clone(),
            ResolvedKind::Text(text) => Value::String(text.clone()),
        }
    }
}

impl Index<NodeId> for ResolvedTree {
    type Output = ResolvedNode;

    fn index(&self, id: NodeId) -> &ResolvedNode {
        &self.nodes[id.0]
    }
}

fn yaml_to_json(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Integer(i) => Value::Number((*i).into()),
        Yaml::Real(s) => yaml
            .as_f64()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(s.clone()), Value::Number),
        Yaml::Boolean(b) => Value::Bool(*b),
        Yaml::Array(items) => Value::Array(items.iter().map(yaml_to_json).collect()),
        Yaml::Hash(hash) => Value::Object(
            hash.iter()
                .map(|(k, v)| (key_to_string(k), yaml_to_json(v)))
                .collect(),
        ),
        Yaml::Null | Yaml::Alias(_) | Yaml::BadValue => Value::Null,
    }
}

fn key_to_string(key: &Yaml) -> String {
    match key {
        Yaml::String(s) | Yaml::Real(s) => s.clone(),
        Yaml::Integer(i) => i.to_string(),
        Yaml::Boolean(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => yaml_to_json(other).to_string(),
    }
}

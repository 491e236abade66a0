//! Document nodes with tags and source location tracking.

use crate::SourceInfo;
use std::fmt;
use yaml_rust2::Yaml;

/// A node of a parsed YAML document.
///
/// Wraps a complete, owned `yaml-rust2::Yaml` value together with the source
/// location of the node, the tag written on it and source-tracked children.
/// The `yaml` field mirrors the whole subtree, so code that does not care
/// about locations or tags can work with plain `Yaml`.
///
/// ## Example
///
/// ```rust
/// use raml_yaml::parse;
///
/// let doc = parse("types: !include types.raml").unwrap();
/// let types = doc.get_hash_value("types").unwrap();
/// assert!(types.is_scalar());
/// assert_eq!(types.tag_name().as_deref(), Some("!include"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentNode {
    /// The complete yaml-rust2::Yaml value (owned).
    pub yaml: Yaml,

    /// Source location for this node.
    pub source_info: SourceInfo,

    /// Tag written on this node, if any (e.g. `!include`, `!!str`).
    pub tag: Option<YamlTag>,

    /// Source-tracked children, parallel to the structure of `yaml`.
    children: Children,
}

/// Source-tracked children of a node.
#[derive(Debug, Clone, PartialEq)]
enum Children {
    /// No children (for scalars and Null)
    None,

    /// Sequence items
    Array(Vec<DocumentNode>),

    /// Mapping entries in document order
    Hash(Vec<YamlHashEntry>),
}

/// A tag attached to a node.
///
/// `!include` parses to handle `"!"` and suffix `"include"`. Secondary tags
/// such as `!!str` keep whatever handle the parser resolved them to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlTag {
    /// Tag handle (`"!"` for local tags)
    pub handle: String,

    /// Tag suffix (`"include"` for `!include`)
    pub suffix: String,

    /// Source location of the tagged node
    pub source_info: SourceInfo,
}

impl YamlTag {
    pub fn new(handle: impl Into<String>, suffix: impl Into<String>, source_info: SourceInfo) -> Self {
        Self {
            handle: handle.into(),
            suffix: suffix.into(),
            source_info,
        }
    }

    /// True for tags written with a single `!` handle.
    pub fn is_local(&self) -> bool {
        self.handle == "!"
    }
}

impl fmt::Display for YamlTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.handle, self.suffix)
    }
}

/// A key-value pair in a YAML mapping with source tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlHashEntry {
    /// The key with source tracking
    pub key: DocumentNode,

    /// The value with source tracking
    pub value: DocumentNode,

    /// Source location of the entire entry (key + value)
    pub entry_span: SourceInfo,
}

impl DocumentNode {
    /// Create a node for a scalar or leaf value.
    pub fn new_scalar(yaml: Yaml, source_info: SourceInfo) -> Self {
        Self {
            yaml,
            source_info,
            tag: None,
            children: Children::None,
        }
    }

    /// Create a null node.
    pub fn null(source_info: SourceInfo) -> Self {
        Self::new_scalar(Yaml::Null, source_info)
    }

    /// Create a sequence node. The `yaml` mirror is built from the items.
    pub fn new_array(source_info: SourceInfo, items: Vec<DocumentNode>) -> Self {
        let yaml = Yaml::Array(items.iter().map(|item| item.yaml.clone()).collect());
        Self {
            yaml,
            source_info,
            tag: None,
            children: Children::Array(items),
        }
    }

    /// Create a mapping node. The `yaml` mirror is built from the entries.
    pub fn new_hash(source_info: SourceInfo, entries: Vec<YamlHashEntry>) -> Self {
        let yaml = Yaml::Hash(
            entries
                .iter()
                .map(|entry| (entry.key.yaml.clone(), entry.value.yaml.clone()))
                .collect(),
        );
        Self {
            yaml,
            source_info,
            tag: None,
            children: Children::Hash(entries),
        }
    }

    /// Check if this is a scalar value (not array or hash).
    pub fn is_scalar(&self) -> bool {
        matches!(self.children, Children::None)
    }

    /// Check if this is an array.
    pub fn is_array(&self) -> bool {
        matches!(self.children, Children::Array(_))
    }

    /// Check if this is a hash.
    pub fn is_hash(&self) -> bool {
        matches!(self.children, Children::Hash(_))
    }

    /// Get array children if this is an array.
    pub fn as_array(&self) -> Option<&[DocumentNode]> {
        match &self.children {
            Children::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get hash entries if this is a hash.
    pub fn as_hash(&self) -> Option<&[YamlHashEntry]> {
        match &self.children {
            Children::Hash(entries) => Some(entries),
            _ => None,
        }
    }

    /// Get a value from a hash by string key.
    pub fn get_hash_value(&self, key: &str) -> Option<&DocumentNode> {
        self.as_hash()?
            .iter()
            .find(|entry| entry.key.yaml.as_str() == Some(key))
            .map(|entry| &entry.value)
    }

    /// Get the number of children (array length or hash entry count).
    pub fn len(&self) -> usize {
        match &self.children {
            Children::None => 0,
            Children::Array(items) => items.len(),
            Children::Hash(entries) => entries.len(),
        }
    }

    /// Check if this node has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The tag as written, e.g. `"!include"`.
    pub fn tag_name(&self) -> Option<String> {
        self.tag.as_ref().map(ToString::to_string)
    }

    /// Text of a scalar node, whatever its resolved type.
    ///
    /// Returns None for collections and for null.
    pub fn scalar_text(&self) -> Option<String> {
        match &self.yaml {
            Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
            Yaml::Integer(i) => Some(i.to_string()),
            Yaml::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl YamlHashEntry {
    pub fn new(key: DocumentNode, value: DocumentNode, entry_span: SourceInfo) -> Self {
        Self {
            key,
            value,
            entry_span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(s: &str) -> DocumentNode {
        DocumentNode::new_scalar(Yaml::String(s.into()), SourceInfo::default())
    }

    #[test]
    fn test_scalar_creation() {
        let node = scalar("test");

        assert_eq!(node.yaml, Yaml::String("test".into()));
        assert!(node.is_scalar());
        assert!(!node.is_array());
        assert!(!node.is_hash());
        assert_eq!(node.len(), 0);
        assert!(node.tag.is_none());
    }

    #[test]
    fn test_array_builds_yaml_mirror() {
        let node = DocumentNode::new_array(SourceInfo::default(), vec![scalar("a"), scalar("b")]);

        assert!(node.is_array());
        assert_eq!(node.len(), 2);
        assert_eq!(
            node.yaml,
            Yaml::Array(vec![Yaml::String("a".into()), Yaml::String("b".into())])
        );
        assert_eq!(node.as_array().unwrap()[1].yaml.as_str(), Some("b"));
    }

    #[test]
    fn test_hash_lookup() {
        let entry = YamlHashEntry::new(scalar("type"), scalar("string"), SourceInfo::default());
        let node = DocumentNode::new_hash(SourceInfo::default(), vec![entry]);

        assert!(node.is_hash());
        assert_eq!(node.get_hash_value("type").unwrap().yaml.as_str(), Some("string"));
        assert!(node.get_hash_value("missing").is_none());
        assert_eq!(node.yaml["type"].as_str(), Some("string"));
    }

    #[test]
    fn test_tag_display() {
        let node = crate::parse("!include common.raml").unwrap();
        assert_eq!(node.tag_name().as_deref(), Some("!include"));
        assert!(node.tag.as_ref().unwrap().is_local());

        let secondary = YamlTag::new("!!", "str", SourceInfo::default());
        assert!(!secondary.is_local());
        assert_eq!(secondary.to_string(), "!!str");
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar("x").scalar_text().as_deref(), Some("x"));
        let int = DocumentNode::new_scalar(Yaml::Integer(200), SourceInfo::default());
        assert_eq!(int.scalar_text().as_deref(), Some("200"));
        assert!(DocumentNode::null(SourceInfo::default()).scalar_text().is_none());
    }
}

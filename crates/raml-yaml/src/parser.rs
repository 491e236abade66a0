//! YAML parser that builds DocumentNode trees.

use crate::{DocumentNode, Error, Result, SourceInfo, YamlHashEntry, YamlTag};
use std::collections::HashMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::Yaml;

/// Parse YAML from a string, producing a DocumentNode tree.
///
/// Only the first document of a multi-document stream is parsed. An empty
/// stream parses to a null node.
///
/// # Example
///
/// ```rust
/// use raml_yaml::parse;
///
/// let doc = parse("title: Lights").unwrap();
/// assert!(doc.is_hash());
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid.
pub fn parse(content: &str) -> Result<DocumentNode> {
    parse_impl(content, None)
}

/// Parse YAML from a string with an associated filename.
///
/// The filename is recorded in the source location of every node.
///
/// # Example
///
/// ```rust
/// use raml_yaml::parse_file;
///
/// let doc = parse_file("title: Lights", "api.raml").unwrap();
/// assert_eq!(doc.source_info.file, Some("api.raml".into()));
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid.
pub fn parse_file(content: &str, filename: &str) -> Result<DocumentNode> {
    parse_impl(content, Some(filename))
}

fn parse_impl(content: &str, filename: Option<&str>) -> Result<DocumentNode> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = DocumentBuilder::new(filename);

    parser
        .load(&mut builder, false) // false = single document only
        .map_err(|e| Error::from_scan(e, filename))?;

    builder.result()
}

/// yaml-rust2 markers have 1-based lines and 0-based columns.
pub(crate) fn source_info_from_marker(marker: &Marker, len: usize) -> SourceInfo {
    SourceInfo::new(None, marker.index(), marker.line(), marker.col() + 1, len)
}

/// Builder that implements MarkedEventReceiver to construct DocumentNode trees.
struct DocumentBuilder {
    filename: Option<String>,

    /// Stack of collections being constructed
    stack: Vec<BuildNode>,

    /// Completed anchored nodes, by anchor id
    anchors: HashMap<usize, DocumentNode>,

    /// The completed root node
    root: Option<DocumentNode>,

    /// First structural problem seen; the event API cannot return errors
    error: Option<Error>,
}

/// A collection being constructed during parsing.
enum BuildNode {
    Sequence {
        start_marker: Marker,
        anchor_id: usize,
        tag: Option<Tag>,
        items: Vec<DocumentNode>,
    },

    Mapping {
        start_marker: Marker,
        anchor_id: usize,
        tag: Option<Tag>,
        entries: Vec<(DocumentNode, Option<DocumentNode>)>,
    },
}

impl DocumentBuilder {
    fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(str::to_string),
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<DocumentNode> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.stack.is_empty() {
            return Err(Error::InvalidStructure {
                message: "Unterminated collection at end of document".into(),
                location: None,
            });
        }
        // An empty stream has no document events at all
        let empty = self.make_source_info_at(0, 1, 1, 0);
        Ok(self.root.unwrap_or_else(|| DocumentNode::null(empty)))
    }

    fn fail(&mut self, message: impl Into<String>, marker: &Marker) {
        if self.error.is_none() {
            self.error = Some(Error::InvalidStructure {
                message: message.into(),
                location: Some(self.make_source_info(marker, 0)),
            });
        }
    }

    fn push_complete(&mut self, node: DocumentNode, anchor_id: usize) {
        if anchor_id > 0 {
            self.anchors.insert(anchor_id, node.clone());
        }

        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(BuildNode::Sequence { items, .. }) => items.push(node),
            Some(BuildNode::Mapping { entries, .. }) => match entries.last_mut() {
                Some((_, value @ None)) => *value = Some(node),
                _ => entries.push((node, None)),
            },
        }
    }

    fn make_source_info(&self, marker: &Marker, len: usize) -> SourceInfo {
        let info = source_info_from_marker(marker, len);
        match &self.filename {
            Some(filename) => info.with_file(filename.clone()),
            None => info,
        }
    }

    fn make_source_info_at(&self, offset: usize, line: usize, col: usize, len: usize) -> SourceInfo {
        SourceInfo::new(self.filename.clone(), offset, line, col, len)
    }

    fn make_tag(&self, tag: Option<Tag>, source_info: &SourceInfo) -> Option<YamlTag> {
        tag.map(|t| YamlTag::new(t.handle, t.suffix, source_info.clone()))
    }

    fn finish_sequence(&mut self, marker: &Marker) {
        let Some(BuildNode::Sequence {
            start_marker,
            anchor_id,
            tag,
            items,
        }) = self.stack.pop()
        else {
            self.fail("Sequence end without matching sequence start", marker);
            return;
        };

        let len = marker.index().saturating_sub(start_marker.index());
        let source_info = self.make_source_info(&start_marker, len);
        let mut node = DocumentNode::new_array(source_info, items);
        node.tag = self.make_tag(tag, &node.source_info);
        self.push_complete(node, anchor_id);
    }

    fn finish_mapping(&mut self, marker: &Marker) {
        let Some(BuildNode::Mapping {
            start_marker,
            anchor_id,
            tag,
            entries,
        }) = self.stack.pop()
        else {
            self.fail("Mapping end without matching mapping start", marker);
            return;
        };

        let len = marker.index().saturating_sub(start_marker.index());
        let source_info = self.make_source_info(&start_marker, len);

        let mut hash_entries = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let Some(value) = value else {
                self.fail("Mapping entry without value", marker);
                return;
            };

            // Entry span from key start to value end
            let entry_len = value.source_info.end_offset().saturating_sub(key.source_info.offset);
            let entry_span = self.make_source_info_at(
                key.source_info.offset,
                key.source_info.line,
                key.source_info.col,
                entry_len,
            );
            hash_entries.push(YamlHashEntry::new(key, value, entry_span));
        }

        let mut node = DocumentNode::new_hash(source_info, hash_entries);
        node.tag = self.make_tag(tag, &node.source_info);
        self.push_complete(node, anchor_id);
    }
}

impl MarkedEventReceiver for DocumentBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Scalar(value, style, anchor_id, tag) => {
                let len = scalar_source_len(&value, style);
                let source_info = self.make_source_info(&marker, len);
                let yaml = scalar_value(&value, style, tag.as_ref());
                let tag = self.make_tag(tag, &source_info);

                let mut node = DocumentNode::new_scalar(yaml, source_info);
                node.tag = tag;
                self.push_complete(node, anchor_id);
            }

            Event::SequenceStart(anchor_id, tag) => {
                self.stack.push(BuildNode::Sequence {
                    start_marker: marker,
                    anchor_id,
                    tag,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => self.finish_sequence(&marker),

            Event::MappingStart(anchor_id, tag) => {
                self.stack.push(BuildNode::Mapping {
                    start_marker: marker,
                    anchor_id,
                    tag,
                    entries: Vec::new(),
                });
            }

            Event::MappingEnd => self.finish_mapping(&marker),

            Event::Alias(anchor_id) => match self.anchors.get(&anchor_id) {
                Some(anchored) => {
                    let node = anchored.clone();
                    self.push_complete(node, 0);
                }
                None => self.fail("Alias refers to an unknown anchor", &marker),
            },

            // Stream and document boundaries carry no content
            _ => {}
        }
    }
}

/// Approximate source length of a scalar, counting surrounding quotes.
fn scalar_source_len(value: &str, style: TScalarStyle) -> usize {
    match style {
        TScalarStyle::SingleQuoted | TScalarStyle::DoubleQuoted => value.len() + 2,
        _ => value.len(),
    }
}

/// Resolve a scalar to its Yaml type following the YAML 1.2 core schema.
///
/// Quoted and block scalars are always strings, and so are scalars carrying a
/// local tag (the tag owner decides how to read them, e.g. `!include 2024.raml`).
fn scalar_value(value: &str, style: TScalarStyle, tag: Option<&Tag>) -> Yaml {
    if style != TScalarStyle::Plain {
        return Yaml::String(value.to_string());
    }

    if let Some(tag) = tag {
        if tag.handle == "!" {
            return Yaml::String(value.to_string());
        }
        if tag.suffix == "str" {
            return Yaml::String(value.to_string());
        }
    }

    match value {
        "true" | "True" | "TRUE" => return Yaml::Boolean(true),
        "false" | "False" | "FALSE" => return Yaml::Boolean(false),
        "null" | "Null" | "NULL" | "~" | "" => return Yaml::Null,
        ".inf" | ".Inf" | ".INF" | "+.inf" | "-.inf" | ".nan" | ".NaN" | ".NAN" => {
            return Yaml::Real(value.to_string());
        }
        _ => {}
    }

    if let Ok(i) = value.parse::<i64>() {
        return Yaml::Integer(i);
    }

    // Rust also accepts "inf" and "NaN", which YAML does not
    if value.bytes().any(|b| b.is_ascii_digit()) && value.parse::<f64>().is_ok() {
        return Yaml::Real(value.to_string());
    }

    Yaml::String(value.to_string())
}

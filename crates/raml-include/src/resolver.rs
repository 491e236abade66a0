//! The include resolver.

use crate::classify::{FileType, get_file_type, include_reference};
use crate::error::{ResolveError, ResolveWarning, Result};
use crate::fragment::Fragment;
use crate::loader::parse_yaml_source;
use crate::path_context::{PathContext, normalize};
use crate::reader::{NativeReader, SourceReader};
use crate::splice::{TreeSplicer, ensure_mergeable, key_from_fragment};
use crate::tree::{NodeId, ResolvedKey, ResolvedKind, ResolvedTree};
use crate::tree_path::{TreePath, key_segment};
use raml_source_map::SourceInfo;
use raml_yaml::{DocumentNode, Yaml, YamlHashEntry};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Resolves include tags in a document into a single [`ResolvedTree`].
///
/// A resolver holds the base directory and the reader used to load files. It
/// keeps no state between calls, so one resolver can serve any number of
/// documents.
///
/// ```
/// use raml_include::{IncludeResolver, InMemoryReader};
///
/// let reader = InMemoryReader::new().with_file("/specs/common.raml", "type: string\n");
/// let resolver = IncludeResolver::with_reader("/specs", reader);
///
/// let doc = raml_yaml::parse("resource: !include common.raml").unwrap();
/// let tree = resolver.resolve(&doc).unwrap();
/// assert_eq!(tree.to_json(), serde_json::json!({"resource": {"type": "string"}}));
/// ```
#[derive(Debug, Clone)]
pub struct IncludeResolver<R = NativeReader> {
    paths: PathContext,
    reader: R,
}

impl IncludeResolver<NativeReader> {
    /// Create a resolver that reads from the file system.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_reader(base_dir, NativeReader)
    }
}

impl Default for IncludeResolver<NativeReader> {
    /// A resolver for the current directory.
    fn default() -> Self {
        Self::new(".")
    }
}

impl<R: SourceReader> IncludeResolver<R> {
    /// Create a resolver that reads through `reader`.
    pub fn with_reader(base_dir: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            paths: PathContext::new(base_dir),
            reader,
        }
    }

    pub fn base_dir(&self) -> &Path {
        self.paths.base_dir()
    }

    pub fn path_context(&self) -> &PathContext {
        &self.paths
    }

    pub(crate) fn reader(&self) -> &R {
        &self.reader
    }

    /// Resolve every include in `root`.
    ///
    /// Untagged content is copied unchanged. Fails with the first error
    /// encountered; no partial tree is returned.
    pub fn resolve(&self, root: &DocumentNode) -> Result<ResolvedTree> {
        let mut pass = ResolutionPass::new(self);
        let result = pass.resolve_node(root, None);
        finish(pass, result)
    }

    /// Read, parse and resolve a root document by name.
    ///
    /// The name is resolved like an include reference. The root file is the
    /// first link of the include chain, so a file that includes the root is
    /// reported as a cycle.
    pub fn resolve_file(&self, name: impl AsRef<Path>) -> Result<ResolvedTree> {
        let path = self.paths.resolve(name);
        debug!(path = %path.display(), "resolving root document");

        let text = self
            .read_source(&path, None, None)
            .inspect_err(|err| warn!(error = %err, "include resolution failed"))?;
        let root = parse_yaml_source(&path, &text, None)
            .inspect_err(|err| warn!(error = %err, "include resolution failed"))?;

        let mut pass = ResolutionPass::new(self);
        pass.stack.push(normalize(&path));
        let result = pass.resolve_node(&root, None);
        finish(pass, result)
    }
}

fn finish<R: SourceReader>(pass: ResolutionPass<'_, R>, result: Result<NodeId>) -> Result<ResolvedTree> {
    match result {
        Ok(root) => Ok(pass.splicer.finish(root)),
        Err(err) => {
            warn!(error = %err, "include resolution failed");
            Err(err)
        }
    }
}

/// State of one `resolve` call.
struct ResolutionPass<'r, R> {
    resolver: &'r IncludeResolver<R>,
    splicer: TreeSplicer,
    /// Normalised paths of the YAML files currently being resolved
    stack: Vec<PathBuf>,
    tree_path: TreePath,
}

impl<'r, R: SourceReader> ResolutionPass<'r, R> {
    fn new(resolver: &'r IncludeResolver<R>) -> Self {
        Self {
            resolver,
            splicer: TreeSplicer::new(),
            stack: Vec::new(),
            tree_path: TreePath::new(),
        }
    }

    fn resolve_node(&mut self, node: &DocumentNode, origin: Option<usize>) -> Result<NodeId> {
        match get_file_type(node) {
            FileType::NoTag => self.resolve_untagged(node, origin),
            FileType::Error(reason) => Err(self.tag_error(node, reason)),
            file_type => {
                let loaded = self.load(node, &file_type)?;
                self.splice(loaded)
            }
        }
    }

    fn resolve_untagged(&mut self, node: &DocumentNode, origin: Option<usize>) -> Result<NodeId> {
        if let Some(items) = node.as_array() {
            let mut ids = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                self.tree_path.push_index(index);
                ids.push(self.resolve_node(item, origin)?);
                self.tree_path.pop();
            }
            return Ok(self.splicer.push(
                ResolvedKind::Sequence(ids),
                node.source_info.clone(),
                origin,
            ));
        }

        if let Some(entries) = node.as_hash() {
            return self.resolve_mapping(entries, &node.source_info, origin);
        }

        Ok(self
            .splicer
            .push(ResolvedKind::Scalar(node.yaml.clone()), node.source_info.clone(), origin))
    }

    fn resolve_mapping(
        &mut self,
        entries: &[YamlHashEntry],
        source_info: &SourceInfo,
        origin: Option<usize>,
    ) -> Result<NodeId> {
        let mut explicit = Vec::with_capacity(entries.len());
        let mut merges = Vec::new();

        for entry in entries {
            if is_merge_key(&entry.key) && get_file_type(&entry.value) != FileType::NoTag {
                self.tree_path.push_key("<<");
                let merged = self.resolve_merge(&entry.value)?;
                self.tree_path.pop();
                merges.push((explicit.len(), merged));
                continue;
            }

            let key = self.resolve_key(&entry.key)?;
            self.tree_path.push_key(key_segment(&key.value));
            self.check_duplicate(&explicit, &key);
            let value = self.resolve_node(&entry.value, origin)?;
            self.tree_path.pop();
            explicit.push((key, value));
        }

        Ok(self
            .splicer
            .mapping(explicit, merges, source_info.clone(), origin))
    }

    /// Warn when `key` repeats a key already in `entries`.
    fn check_duplicate(&mut self, entries: &[(ResolvedKey, NodeId)], key: &ResolvedKey) {
        let Some((first, _)) = entries.iter().find(|(k, _)| k.value == key.value) else {
            return;
        };
        let warning = ResolveWarning::DuplicateKey {
            tree_path: self.tree_path.clone(),
            key: key.as_string(),
            location: key.source_info.clone(),
            first: first.source_info.clone(),
        };
        warn!(warning = %warning, "duplicate mapping key");
        self.splicer.warn(warning);
    }

    /// Resolve the include under a `<<` key; it must yield a mapping.
    fn resolve_merge(&mut self, node: &DocumentNode) -> Result<NodeId> {
        let file_type = match get_file_type(node) {
            FileType::Error(reason) => return Err(self.tag_error(node, reason)),
            file_type => file_type,
        };
        let loaded = self.load(node, &file_type)?;
        ensure_mergeable(&loaded.fragment, &self.tree_path, &node.source_info)?;
        self.splice(loaded)
    }

    fn resolve_key(&mut self, key: &DocumentNode) -> Result<ResolvedKey> {
        match get_file_type(key) {
            FileType::NoTag => Ok(ResolvedKey::new(key.yaml.clone(), key.source_info.clone())),
            FileType::Error(reason) => Err(self.tag_error(key, reason)),
            file_type => {
                let loaded = self.load(key, &file_type)?;
                let value = key_from_fragment(&loaded.fragment, &self.tree_path, &key.source_info)?;
                Ok(ResolvedKey::new(value, key.source_info.clone()))
            }
        }
    }

    /// Load the file an include node refers to.
    ///
    /// YAML files already on the include stack are a cycle.
    fn load(&mut self, node: &DocumentNode, file_type: &FileType) -> Result<LoadedFragment> {
        let reference = include_reference(node).map_err(|reason| self.tag_error(node, reason))?;
        let path = self.resolver.path_context().resolve(&reference);
        let key = normalize(&path);

        if *file_type == FileType::Node && self.stack.contains(&key) {
            let mut chain = self.stack.clone();
            chain.push(key);
            return Err(ResolveError::Cycle {
                chain,
                location: Some(node.source_info.clone()),
            });
        }

        debug!(
            path = %path.display(),
            tree_path = %self.tree_path,
            ?file_type,
            "loading include"
        );
        let (fragment, whole_file) = self
            .resolver
            .load_fragment(&path, file_type, &self.tree_path, &node.source_info)?;
        let origin = self.splicer.record_include(path);

        Ok(LoadedFragment {
            fragment,
            origin,
            stack_key: key,
            whole_file,
        })
    }

    /// Place a loaded fragment into the output tree.
    ///
    /// YAML fragments are resolved in turn; JSON and text are stored as
    /// they are.
    fn splice(&mut self, loaded: LoadedFragment) -> Result<NodeId> {
        let LoadedFragment {
            fragment,
            origin,
            stack_key,
            whole_file,
        } = loaded;

        match fragment {
            Fragment::Yaml(doc) => {
                self.stack.push(stack_key);
                let result = self.resolve_node(&doc, Some(origin));
                self.stack.pop();
                result
            }
            Fragment::Json(value) => Ok(self
                .splicer
                .push(ResolvedKind::Json(value), whole_file, Some(origin))),
            Fragment::Text(text) => Ok(self
                .splicer
                .push(ResolvedKind::Text(text), whole_file, Some(origin))),
        }
    }

    fn tag_error(&self, node: &DocumentNode, reason: String) -> ResolveError {
        ResolveError::Tag {
            tree_path: Some(self.tree_path.clone()),
            tag: node.tag_name().unwrap_or_default(),
            reason,
            location: node.source_info.clone(),
        }
    }
}

/// A fragment together with its place in the include bookkeeping.
struct LoadedFragment {
    fragment: Fragment,
    origin: usize,
    stack_key: PathBuf,
    whole_file: SourceInfo,
}

fn is_merge_key(key: &DocumentNode) -> bool {
    matches!(&key.yaml, Yaml::String(s) if s == "<<")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::InMemoryReader;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn resolver(files: &[(&str, &str)]) -> IncludeResolver<InMemoryReader> {
        let mut reader = InMemoryReader::new();
        for (path, contents) in files {
            reader.insert(path, *contents);
        }
        IncludeResolver::with_reader("/specs", reader)
    }

    fn resolve(files: &[(&str, &str)], source: &str) -> Result<ResolvedTree> {
        resolver(files).resolve(&raml_yaml::parse(source).unwrap())
    }

    #[test]
    fn test_untagged_document_is_unchanged() {
        let source = "title: Lights\nversion: 2\n/lights:\n  get:\n    responses:\n      200: [ok, 1.5, true, null]\n";
        let tree = resolve(&[], source).unwrap();

        assert_eq!(
            tree.to_json(),
            json!({
                "title": "Lights",
                "version": 2,
                "/lights": {"get": {"responses": {"200": ["ok", 1.5, true, null]}}}
            })
        );
        assert!(tree.includes().is_empty());
    }

    #[test]
    fn test_include_mapping_value() {
        let tree = resolve(
            &[("/specs/common.raml", "type: string\n")],
            "resource: !include common.raml",
        )
        .unwrap();

        assert_eq!(tree.to_json(), json!({"resource": {"type": "string"}}));
        let resource = tree.lookup(&["resource"]).unwrap();
        assert_eq!(tree.origin(resource), Some(Path::new("/specs/common.raml")));
        assert_eq!(tree.origin(tree.root()), None);
    }

    #[test]
    fn test_include_json_is_json_node() {
        let tree = resolve(
            &[("/specs/schema.json", r#"{"type": "object", "properties": {}}"#)],
            "schema: !include-json schema.json",
        )
        .unwrap();

        let schema = tree.lookup(&["schema"]).unwrap();
        assert_eq!(
            tree[schema].kind,
            ResolvedKind::Json(json!({"type": "object", "properties": {}}))
        );
        assert_eq!(tree[schema].source_info.file.as_deref(), Some("/specs/schema.json"));
        assert_eq!(tree[schema].source_info.len, 36);
    }

    #[test]
    fn test_include_text() {
        let tree = resolve(
            &[("/specs/example.xml", "<light on=\"true\"/>\n")],
            "example: !include example.xml",
        )
        .unwrap();
        let example = tree.lookup(&["example"]).unwrap();
        assert_eq!(tree[example].kind, ResolvedKind::Text("<light on=\"true\"/>\n".into()));
    }

    #[test]
    fn test_include_sequence_item_and_root() {
        let tree = resolve(
            &[("/specs/a.raml", "a: 1"), ("/specs/b.txt", "b")],
            "- !include a.raml\n- !include b.txt\n- plain",
        )
        .unwrap();
        assert_eq!(tree.to_json(), json!([{"a": 1}, "b", "plain"]));

        let tree = resolve(&[("/specs/a.raml", "a: 1")], "!include a.raml").unwrap();
        assert_eq!(tree.to_json(), json!({"a": 1}));
    }

    #[test]
    fn test_nested_includes_resolve_against_base() {
        let tree = resolve(
            &[
                ("/specs/types/light.raml", "properties:\n  state: !include types/state.raml\n"),
                ("/specs/types/state.raml", "enum: [on, off]\n"),
            ],
            "types:\n  Light: !include types/light.raml",
        )
        .unwrap();

        assert_eq!(
            tree.to_json(),
            json!({"types": {"Light": {"properties": {"state": {"enum": ["on", "off"]}}}}})
        );
        assert_eq!(
            tree.includes(),
            &[
                PathBuf::from("/specs/types/light.raml"),
                PathBuf::from("/specs/types/state.raml")
            ]
        );
    }

    #[test]
    fn test_diamond_include_is_not_a_cycle() {
        let tree = resolve(
            &[
                ("/specs/a.raml", "x: !include shared.raml"),
                ("/specs/b.raml", "y: !include shared.raml"),
                ("/specs/shared.raml", "type: string"),
            ],
            "a: !include a.raml\nb: !include b.raml\nc: !include shared.raml",
        )
        .unwrap();

        assert_eq!(
            tree.to_json(),
            json!({
                "a": {"x": {"type": "string"}},
                "b": {"y": {"type": "string"}},
                "c": {"type": "string"}
            })
        );
        assert_eq!(tree.includes().len(), 5);
    }

    #[test]
    fn test_cycle_is_reported_with_chain() {
        let err = resolve(
            &[
                ("/specs/a.raml", "next: !include b.raml"),
                ("/specs/b.raml", "next: !include a.raml"),
            ],
            "root: !include a.raml",
        )
        .unwrap_err();

        match err {
            ResolveError::Cycle { chain, location } => {
                assert_eq!(
                    chain,
                    vec![
                        PathBuf::from("/specs/a.raml"),
                        PathBuf::from("/specs/b.raml"),
                        PathBuf::from("/specs/a.raml")
                    ]
                );
                assert_eq!(location.unwrap().file.as_deref(), Some("/specs/b.raml"));
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_include_through_other_spelling() {
        let err = resolve(
            &[("/specs/a.raml", "me: !include ./sub/../a.raml")],
            "root: !include a.raml",
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::Cycle { chain, .. } if chain.len() == 2));
    }

    #[test]
    fn test_text_include_of_self_is_not_a_cycle() {
        let tree = resolve(
            &[("/specs/a.raml", "source: !include-file a.raml")],
            "root: !include a.raml",
        )
        .unwrap();
        assert_eq!(
            tree.to_json(),
            json!({"root": {"source": "source: !include-file a.raml"}})
        );
    }

    #[test]
    fn test_resolve_file_puts_root_on_stack() {
        let resolver = resolver(&[
            ("/specs/api.raml", "types: !include types.raml"),
            ("/specs/types.raml", "back: !include api.raml"),
        ]);
        let err = resolver.resolve_file("api.raml").unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Cycle { chain, .. } if chain.first() == Some(&PathBuf::from("/specs/api.raml"))
        ));
    }

    #[test]
    fn test_resolve_file() {
        let resolver = resolver(&[
            ("/specs/api.raml", "title: Lights\ntypes: !include types.raml\n"),
            ("/specs/types.raml", "Light: object\n"),
        ]);
        let tree = resolver.resolve_file("api.raml").unwrap();
        assert_eq!(tree.to_json(), json!({"title": "Lights", "types": {"Light": "object"}}));
        assert_eq!(tree.includes(), &[PathBuf::from("/specs/types.raml")]);

        let title = tree.lookup(&["title"]).unwrap();
        assert_eq!(tree[title].source_info.file.as_deref(), Some("/specs/api.raml"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = resolve(&[], "resource:\n  get: !include missing.raml").unwrap_err();
        match err {
            ResolveError::Io { path, tree_path, .. } => {
                assert_eq!(path, PathBuf::from("/specs/missing.raml"));
                assert_eq!(tree_path.unwrap().to_string(), "/resource/get");
            }
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_tag_names_tree_path() {
        let err = resolve(&[], "resource:\n  get:\n    - !include-xml a.xml").unwrap_err();
        match err {
            ResolveError::Tag { tree_path, tag, .. } => {
                assert_eq!(tree_path.unwrap().to_string(), "/resource/get/0");
                assert_eq!(tag, "!include-xml");
            }
            other => panic!("expected a tag error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_in_nested_include() {
        let err = resolve(
            &[("/specs/a.raml", "b: !include b.json"), ("/specs/b.json", "{nope")],
            "a: !include a.raml",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Parse { path, format: crate::SourceFormat::Json, .. } if path == Path::new("/specs/b.json")
        ));
    }

    #[test]
    fn test_parse_error_names_including_tree_path() {
        let err = resolve(
            &[("/specs/s.json", "{1: 2}")],
            "a:\n  schema: !include s.json\nb:\n  schema: !include s.json\n",
        )
        .unwrap_err();

        assert!(err.to_string().contains("(included at /a/schema)"));
        assert!(
            err.to_diagnostic()
                .to_text(None)
                .contains("Included at document path `/a/schema`")
        );
        match err {
            ResolveError::Parse { tree_path, .. } => {
                assert_eq!(tree_path.unwrap().to_string(), "/a/schema");
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_root_parse_error_has_no_tree_path() {
        let resolver = resolver(&[("/specs/api.raml", "a: [1, 2\n")]);
        let err = resolver.resolve_file("api.raml").unwrap_err();
        assert!(matches!(err, ResolveError::Parse { tree_path: None, .. }));
    }

    #[test]
    fn test_duplicate_key_from_include_warns() {
        let tree = resolve(
            &[("/specs/method.txt", "get")],
            "/lights:\n  get: first\n  ? !include method.txt\n  : second\n",
        )
        .unwrap();

        assert_eq!(tree.to_json(), json!({"/lights": {"get": "second"}}));
        match tree.warnings() {
            [ResolveWarning::DuplicateKey { tree_path, key, location, first }] => {
                assert_eq!(tree_path.to_string(), "/~1lights/get");
                assert_eq!(key, "get");
                assert_eq!((first.line, location.line), (2, 3));
            }
            other => panic!("expected one duplicate key warning, got {:?}", other),
        }
    }

    #[test]
    fn test_merged_keys_do_not_warn() {
        let tree = resolve(
            &[("/specs/base.raml", "type: string\n")],
            "name:\n  <<: !include base.raml\n  type: integer\n",
        )
        .unwrap();
        assert!(tree.warnings().is_empty());
    }

    #[test]
    fn test_merge_key_include() {
        let tree = resolve(
            &[("/specs/base.raml", "type: string\nrequired: false\nminLength: 1\n")],
            "name:\n  <<: !include base.raml\n  required: true\n",
        )
        .unwrap();
        assert_eq!(
            tree.to_json(),
            json!({"name": {"type": "string", "required": true, "minLength": 1}})
        );
    }

    #[test]
    fn test_merge_key_requires_mapping() {
        let err = resolve(
            &[("/specs/base.json", r#"{"type": "string"}"#)],
            "name:\n  <<: !include base.json\n",
        )
        .unwrap_err();
        match err {
            ResolveError::Composition { tree_path, found, .. } => {
                assert_eq!(tree_path.to_string(), "/name/<<");
                assert_eq!(found, "JSON document");
            }
            other => panic!("expected a composition error, got {:?}", other),
        }
    }

    #[test]
    fn test_untagged_merge_key_is_plain_key() {
        let tree = resolve(&[], "a:\n  '<<': plain\n").unwrap();
        assert_eq!(tree.to_json(), json!({"a": {"<<": "plain"}}));
    }

    #[test]
    fn test_mapping_key_include() {
        let tree = resolve(
            &[("/specs/method.txt", "get"), ("/specs/code.yaml", "200")],
            "? !include method.txt\n: {description: read}\n? !include code.yaml\n: ok\n",
        )
        .unwrap();
        assert_eq!(tree.to_json(), json!({"get": {"description": "read"}, "200": "ok"}));
    }

    #[test]
    fn test_mapping_key_include_rejects_collections() {
        let err = resolve(
            &[("/specs/key.raml", "a: 1")],
            "? !include key.raml\n: value\n",
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::Composition { found, .. } if found == "YAML mapping"));
    }

    #[test]
    fn test_empty_include_file_is_null() {
        let tree = resolve(&[("/specs/empty.raml", "")], "a: !include empty.raml").unwrap();
        assert_eq!(tree.to_json(), json!({"a": null}));
    }

    #[test]
    fn test_resolver_is_reusable() {
        let resolver = resolver(&[("/specs/a.raml", "x: 1")]);
        let doc = raml_yaml::parse("a: !include a.raml").unwrap();
        let first = resolver.resolve(&doc).unwrap();
        let second = resolver.resolve(&doc).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_resolver_uses_current_directory() {
        let resolver = IncludeResolver::default();
        assert_eq!(resolver.base_dir(), Path::new("."));
        assert_eq!(resolver.path_context().resolve("types.raml"), PathBuf::from("types.raml"));
    }

    #[test]
    fn test_resolver_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IncludeResolver>();
        assert_send_sync::<IncludeResolver<InMemoryReader>>();
        assert_send_sync::<ResolvedTree>();
    }
}

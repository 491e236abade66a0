//! # raml-include
//!
//! Resolves `!include` tags in RAML/YAML documents.
//!
//! A document parsed by [`raml_yaml`] may reference external files through
//! include tags. [`IncludeResolver`] walks the document, classifies every
//! tagged node ([`get_file_type`]), loads the referenced file through a
//! [`SourceReader`], and splices its content into a [`ResolvedTree`].
//! YAML fragments are resolved recursively; JSON and text fragments are
//! stored as they are.
//!
//! ```
//! use raml_include::{IncludeResolver, InMemoryReader, ResolvedKind};
//!
//! let reader = InMemoryReader::new()
//!     .with_file("/specs/common.raml", "type: string\n")
//!     .with_file("/specs/schema.json", r#"{"type": "object"}"#);
//! let resolver = IncludeResolver::with_reader("/specs", reader);
//!
//! let doc = raml_yaml::parse(
//!     "resource: !include common.raml\nschema: !include-json schema.json\n",
//! )
//! .unwrap();
//! let tree = resolver.resolve(&doc).unwrap();
//!
//! let schema = tree.lookup(&["schema"]).unwrap();
//! assert!(matches!(tree[schema].kind, ResolvedKind::Json(_)));
//! assert_eq!(tree.includes().len(), 2);
//! ```
//!
//! Relative references are resolved against the resolver's base directory,
//! including references made from inside included files.

mod classify;
mod error;
mod fragment;
mod loader;
mod path_context;
mod reader;
mod resolver;
mod splice;
mod tree;
mod tree_path;

pub use classify::{FileType, get_file_type, include_reference};
pub use error::{ResolveError, ResolveWarning, Result};
pub use fragment::{Fragment, SourceFormat};
pub use path_context::{PathContext, normalize};
pub use reader::{InMemoryReader, NativeReader, SourceReader};
pub use resolver::IncludeResolver;
pub use tree::{NodeId, ResolvedKey, ResolvedKind, ResolvedNode, ResolvedTree};
pub use tree_path::{PathSegment, TreePath};

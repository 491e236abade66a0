//! # raml-yaml
//!
//! YAML parsing for RAML documents, with tags and source locations.
//!
//! This crate turns YAML text into a [`DocumentNode`] tree. Each node owns a
//! complete `yaml-rust2::Yaml` value, the source location it was parsed from,
//! the tag written on it (such as `!include`), and source-tracked children.
//!
//! ## Design
//!
//! Uses the **owned data approach**: a node never borrows from the parser's
//! buffers, so fragments loaded from different files can be combined freely
//! and outlive the text they were parsed from.
//!
//! ## Example
//!
//! ```rust
//! use raml_yaml::parse_file;
//!
//! let content = "title: Lights\ntypes: !include types.raml\n";
//!
//! let doc = parse_file(content, "api.raml").unwrap();
//! let types = doc.get_hash_value("types").unwrap();
//! let tag = types.tag.as_ref().unwrap();
//! assert_eq!(tag.suffix, "include");
//! assert_eq!(types.yaml.as_str(), Some("types.raml"));
//! assert_eq!(types.source_info.line, 2);
//! ```

mod error;
mod node;
mod parser;

pub use error::{Error, Result};
pub use node::{DocumentNode, YamlHashEntry, YamlTag};
pub use parser::{parse, parse_file};
pub use raml_source_map::SourceInfo;
pub use yaml_rust2::Yaml;

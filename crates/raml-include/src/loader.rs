//! Reading and parsing included files.

use crate::classify::{FileType, include_reference};
use crate::error::{ResolveError, Result, io_error};
use crate::fragment::{Fragment, SourceFormat};
use crate::reader::SourceReader;
use crate::resolver::IncludeResolver;
use crate::tree_path::TreePath;
use raml_source_map::{SourceInfo, line_col_to_offset, offset_to_line_col};
use raml_yaml::DocumentNode;
use std::path::{Path, PathBuf};

impl<R: SourceReader> IncludeResolver<R> {
    /// Read the file a node refers to and return its exact text.
    pub fn read_from_file(&self, node: &DocumentNode) -> Result<String> {
        let path = self.include_path(node)?;
        self.read_source(&path, None, Some(&node.source_info))
    }

    /// Read the file a node refers to and parse it as YAML.
    ///
    /// The file name is recorded in the source info of every parsed node.
    /// An empty file parses to a null scalar.
    pub fn read_to_yaml_node(&self, node: &DocumentNode) -> Result<DocumentNode> {
        let path = self.include_path(node)?;
        let text = self.read_source(&path, None, Some(&node.source_info))?;
        parse_yaml_source(&path, &text, None)
    }

    /// Read the file a node refers to and parse it as JSON.
    pub fn read_to_json(&self, node: &DocumentNode) -> Result<serde_json::Value> {
        let path = self.include_path(node)?;
        let text = self.read_source(&path, None, Some(&node.source_info))?;
        parse_json_source(&path, &text, None)
    }

    /// Read a JSON file by name, relative to the base directory.
    pub fn read_json_file(&self, name: &str) -> Result<serde_json::Value> {
        let path = self.path_context().resolve(name);
        let text = self.read_source(&path, None, None)?;
        parse_json_source(&path, &text, None)
    }

    /// Read `path` for the include at `tree_path` and parse it the way
    /// `file_type` asks for.
    ///
    /// Also returns a source info spanning the whole file.
    pub(crate) fn load_fragment(
        &self,
        path: &Path,
        file_type: &FileType,
        tree_path: &TreePath,
        location: &SourceInfo,
    ) -> Result<(Fragment, SourceInfo)> {
        let text = self.read_source(path, Some(tree_path), Some(location))?;
        let whole_file = SourceInfo::whole_file(file_label(path), text.len());
        let fragment = match file_type {
            FileType::Node => Fragment::Yaml(parse_yaml_source(path, &text, Some(tree_path))?),
            FileType::Json => Fragment::Json(parse_json_source(path, &text, Some(tree_path))?),
            _ => Fragment::Text(text),
        };
        Ok((fragment, whole_file))
    }

    /// Read a file as UTF-8 text. Invalid UTF-8 is a parse error.
    pub(crate) fn read_source(
        &self,
        path: &Path,
        tree_path: Option<&TreePath>,
        location: Option<&SourceInfo>,
    ) -> Result<String> {
        let bytes = self
            .reader()
            .read(path)
            .map_err(|source| io_error(path, tree_path, source, location))?;

        String::from_utf8(bytes).map_err(|err| {
            let valid_up_to = err.utf8_error().valid_up_to();
            let prefix = std::str::from_utf8(&err.as_bytes()[..valid_up_to]).unwrap_or("");
            let (line, col) = offset_to_line_col(prefix, valid_up_to).unwrap_or((0, 0));
            ResolveError::Parse {
                path: path.to_path_buf(),
                tree_path: tree_path.cloned(),
                format: SourceFormat::Text,
                message: format!("invalid UTF-8 at byte {}", valid_up_to),
                location: Some(SourceInfo::new(
                    Some(file_label(path)),
                    valid_up_to,
                    line + 1,
                    col + 1,
                    0,
                )),
            }
        })
    }

    fn include_path(&self, node: &DocumentNode) -> Result<PathBuf> {
        match include_reference(node) {
            Ok(reference) => Ok(self.path_context().resolve(reference)),
            Err(reason) => Err(ResolveError::Tag {
                tree_path: None,
                tag: node.tag_name().unwrap_or_default(),
                reason,
                location: node.source_info.clone(),
            }),
        }
    }
}

/// File name recorded in source info and diagnostics.
pub(crate) fn file_label(path: &Path) -> String {
    path.display().to_string()
}

pub(crate) fn parse_yaml_source(
    path: &Path,
    text: &str,
    tree_path: Option<&TreePath>,
) -> Result<DocumentNode> {
    raml_yaml::parse_file(text, &file_label(path)).map_err(|err| ResolveError::Parse {
        path: path.to_path_buf(),
        tree_path: tree_path.cloned(),
        format: SourceFormat::Yaml,
        message: err.message().to_string(),
        location: err.location().cloned(),
    })
}

pub(crate) fn parse_json_source(
    path: &Path,
    text: &str,
    tree_path: Option<&TreePath>,
) -> Result<serde_json::Value> {
    serde_json::from_str(text).map_err(|err| {
        // serde_json reports 1-based lines and columns
        let line = err.line().max(1);
        let col = err.column().max(1);
        let offset = line_col_to_offset(text, line - 1, col - 1).unwrap_or(text.len());
        ResolveError::Parse {
            path: path.to_path_buf(),
            tree_path: tree_path.cloned(),
            format: SourceFormat::Json,
            message: err.to_string(),
            location: Some(SourceInfo::new(Some(file_label(path)), offset, line, col, 0)),
        }
    })
}

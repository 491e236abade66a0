//! Classification of tagged nodes into resolution strategies.
//!
//! Only local tags (single `!` handle) are include tags:
//!
//! | tag | result |
//! |---|---|
//! | `!include` | by extension: `.raml`/`.yaml`/`.yml` → [`FileType::Node`], `.json` → [`FileType::Json`], other → [`FileType::File`] |
//! | `!include-yaml`, `!include-raml` | [`FileType::Node`] |
//! | `!include-json` | [`FileType::Json`] |
//! | `!include-file`, `!include-text` | [`FileType::File`] |
//! | any other `!include…` | [`FileType::Error`] |
//! | no tag, `!!str`, other local tags | [`FileType::NoTag`] |
//!
//! An include tag whose value is not a usable file name (a collection, an
//! empty value, a URL) is also [`FileType::Error`].

use raml_yaml::DocumentNode;
use std::path::Path;
use tracing::trace;

/// How a node has to be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileType {
    /// Parse the referenced file as YAML/RAML and resolve it recursively
    Node,
    /// Parse the referenced file as JSON
    Json,
    /// Splice the referenced file in as text
    File,
    /// Not an include; leave the node as it is
    NoTag,
    /// Malformed or unsupported include tag, with the reason
    Error(String),
}

impl FileType {
    /// True for the three variants that load a file.
    pub fn is_include(&self) -> bool {
        matches!(self, FileType::Node | FileType::Json | FileType::File)
    }
}

/// Classify a node by its tag and value.
///
/// Never fails and never panics: problems are reported as
/// [`FileType::Error`].
///
/// ```
/// use raml_include::{get_file_type, FileType};
///
/// let doc = raml_yaml::parse("a: !include types.raml\nb: !include schema.json\nc: plain").unwrap();
/// assert_eq!(get_file_type(doc.get_hash_value("a").unwrap()), FileType::Node);
/// assert_eq!(get_file_type(doc.get_hash_value("b").unwrap()), FileType::Json);
/// assert_eq!(get_file_type(doc.get_hash_value("c").unwrap()), FileType::NoTag);
/// ```
pub fn get_file_type(node: &DocumentNode) -> FileType {
    let Some(tag) = node.tag.as_ref().filter(|tag| tag.is_local()) else {
        return FileType::NoTag;
    };

    let fixed = match tag.suffix.as_str() {
        "include" => None,
        "include-yaml" | "include-raml" => Some(FileType::Node),
        "include-json" => Some(FileType::Json),
        "include-file" | "include-text" => Some(FileType::File),
        other if other.starts_with("include") => {
            return FileType::Error(format!("unknown include kind `!{}`", other));
        }
        _ => return FileType::NoTag,
    };

    let reference = match include_reference(node) {
        Ok(reference) => reference,
        Err(reason) => return FileType::Error(reason),
    };

    let file_type = fixed.unwrap_or_else(|| by_extension(&reference));
    trace!(tag = %tag, reference = %reference, ?file_type, "classified include");
    file_type
}

/// The file name an include node refers to.
///
/// Fails with a reason when the value is a collection, empty or a URL.
pub fn include_reference(node: &DocumentNode) -> Result<String, String> {
    if node.is_hash() {
        return Err("include value must be a file name, found a mapping".to_string());
    }
    if node.is_array() {
        return Err("include value must be a file name, found a sequence".to_string());
    }

    let Some(text) = node.scalar_text() else {
        return Err("include value must be a file name, found an empty value".to_string());
    };
    let reference = text.trim();
    if reference.is_empty() {
        return Err("include value must be a file name, found an empty value".to_string());
    }
    if has_url_scheme(reference) {
        return Err(format!("`{}` is a URL; only local files can be included", reference));
    }

    Ok(reference.to_string())
}

fn by_extension(reference: &str) -> FileType {
    let extension = Path::new(reference)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("raml" | "yaml" | "yml") => FileType::Node,
        Some("json") => FileType::Json,
        _ => FileType::File,
    }
}

/// `scheme://` with a scheme of a letter followed by letters, digits, `+`,
/// `-` or `.`.
fn has_url_scheme(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

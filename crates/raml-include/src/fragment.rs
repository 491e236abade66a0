//! Parsed contents of an included file.

use raml_yaml::DocumentNode;
use std::fmt;

/// The content of one included file, in the form its include tag asked for.
///
/// The variants are never converted into one another.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Parsed YAML/RAML, still carrying its own tags
    Yaml(DocumentNode),
    /// Parsed JSON document
    Json(serde_json::Value),
    /// Raw text
    Text(String),
}

impl Fragment {
    /// Short description used in composition errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Fragment::Yaml(node) if node.is_hash() => "YAML mapping",
            Fragment::Yaml(node) if node.is_array() => "YAML sequence",
            Fragment::Yaml(_) => "YAML scalar",
            Fragment::Json(_) => "JSON document",
            Fragment::Text(_) => "text",
        }
    }
}

/// Format an included file is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
    Text,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceFormat::Yaml => "YAML",
            SourceFormat::Json => "JSON",
            SourceFormat::Text => "text",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let mapping = raml_yaml::parse("type: string").unwrap();
        let sequence = raml_yaml::parse("[a, b]").unwrap();
        let scalar = raml_yaml::parse("hello").unwrap();

        assert_eq!(Fragment::Yaml(mapping).describe(), "YAML mapping");
        assert_eq!(Fragment::Yaml(sequence).describe(), "YAML sequence");
        assert_eq!(Fragment::Yaml(scalar).describe(), "YAML scalar");
        assert_eq!(Fragment::Json(serde_json::json!({})).describe(), "JSON document");
        assert_eq!(Fragment::Text(String::new()).describe(), "text");
    }

    #[test]
    fn test_format_display() {
        assert_eq!(SourceFormat::Json.to_string(), "JSON");
        assert_eq!(SourceFormat::Text.to_string(), "text");
    }
}

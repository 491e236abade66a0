//! Rendering of the resolved document.

use anyhow::{Context, Result};
use clap::ValueEnum;
use raml_include::ResolvedTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Render the resolved tree, ending with a newline.
pub fn render(tree: &ResolvedTree, format: OutputFormat) -> Result<String> {
    let value = tree.to_json();
    match format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(&value).context("Failed to serialize JSON")?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Yaml => serde_yaml::to_string(&value).context("Failed to serialize YAML"),
    }
}

/// One included file per line, in load order.
pub fn render_includes(tree: &ResolvedTree) -> String {
    tree.includes()
        .iter()
        .map(|path| format!("{}\n", path.display()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use raml_include::{InMemoryReader, IncludeResolver};

    fn tree() -> ResolvedTree {
        let reader = InMemoryReader::new().with_file("/specs/common.raml", "type: string\n");
        let resolver = IncludeResolver::with_reader("/specs", reader);
        let doc = raml_yaml::parse("resource: !include common.raml").unwrap();
        resolver.resolve(&doc).unwrap()
    }

    #[test]
    fn test_render_json() {
        assert_eq!(
            render(&tree(), OutputFormat::Json).unwrap(),
            "{\n  \"resource\": {\n    \"type\": \"string\"\n  }\n}\n"
        );
    }

    #[test]
    fn test_render_yaml() {
        assert_eq!(
            render(&tree(), OutputFormat::Yaml).unwrap(),
            "resource:\n  type: string\n"
        );
    }

    #[test]
    fn test_render_includes() {
        assert_eq!(render_includes(&tree()), "/specs/common.raml\n");
    }
}

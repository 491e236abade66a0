//! Error types for include resolution.

use crate::fragment::SourceFormat;
use crate::tree_path::TreePath;
use raml_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, get_error_info};
use raml_source_map::SourceInfo;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for include resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Why an include could not be resolved.
///
/// Exactly one error is returned per failed call; a partially resolved tree
/// is never handed out.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Malformed or unsupported include tag
    #[error("invalid include tag `{tag}`{}: {reason}", at_path(.tree_path))]
    Tag {
        tree_path: Option<TreePath>,
        tag: String,
        reason: String,
        location: SourceInfo,
    },

    /// Included file missing or unreadable
    #[error("cannot read `{}`{}: {source}", .path.display(), included_at(.tree_path))]
    Io {
        path: PathBuf,
        /// Where the include sits; None when the file was not read for an include
        tree_path: Option<TreePath>,
        #[source]
        source: io::Error,
        location: Option<SourceInfo>,
    },

    /// Included file is not valid YAML, JSON or UTF-8
    #[error("cannot parse `{}` as {format}{}: {message}", .path.display(), included_at(.tree_path))]
    Parse {
        path: PathBuf,
        tree_path: Option<TreePath>,
        format: SourceFormat,
        message: String,
        location: Option<SourceInfo>,
    },

    /// Fragment kind does not fit where it is included
    #[error("cannot place {found} at {tree_path}: expected {expected}")]
    Composition {
        tree_path: TreePath,
        expected: String,
        found: String,
        location: SourceInfo,
    },

    /// The include chain revisits a file
    #[error("include cycle: {}", format_chain(.chain))]
    Cycle {
        chain: Vec<PathBuf>,
        location: Option<SourceInfo>,
    },
}

impl ResolveError {
    /// Error code in the diagnostics catalog.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::Tag { .. } => "R-1-1",
            ResolveError::Io { .. } => "R-1-2",
            ResolveError::Parse { .. } => "R-1-3",
            ResolveError::Composition { .. } => "R-1-4",
            ResolveError::Cycle { .. } => "R-1-5",
        }
    }

    /// Source location the error points at, if known.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            ResolveError::Tag { location, .. } | ResolveError::Composition { location, .. } => {
                Some(location)
            }
            ResolveError::Io { location, .. }
            | ResolveError::Parse { location, .. }
            | ResolveError::Cycle { location, .. } => location.as_ref(),
        }
    }

    /// Convert into a structured diagnostic for display.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let code = self.code();
        let builder = DiagnosticMessageBuilder::error(catalog_title(code)).with_code(code);
        let builder = match self {
            ResolveError::Tag {
                tree_path,
                tag,
                reason,
                ..
            } => {
                let builder = builder
                    .problem(format!("`{}` can't be resolved: {}", tag, reason))
                    .add_hint("Use `!include`, `!include-yaml`, `!include-json` or `!include-file` with a relative file name?");
                match tree_path {
                    Some(tree_path) => builder.add_info(format!("At document path `{}`", tree_path)),
                    None => builder,
                }
            }

            ResolveError::Io {
                path,
                tree_path,
                source,
                ..
            } => with_tree_path(builder, tree_path.as_ref())
                .problem(format!("`{}` can't be read: {}", path.display(), source))
                .add_hint("Relative includes are resolved against the base directory, not the including file. Is the base directory correct?"),

            ResolveError::Parse {
                path,
                tree_path,
                format,
                message,
                ..
            } => with_tree_path(builder.add_detail(message.clone()), tree_path.as_ref())
                .problem(format!("`{}` must be valid {}", path.display(), format)),

            ResolveError::Composition {
                tree_path,
                expected,
                found,
                ..
            } => builder
                .problem(format!("A {} can't be placed at `{}`", found, tree_path))
                .add_detail(format!("Expected {}", expected)),

            ResolveError::Cycle { chain, .. } => {
                let repeated = chain.last().map(|p| p.display().to_string()).unwrap_or_default();
                builder
                    .problem(format!("`{}` includes itself", repeated))
                    .add_detail(format!("Chain: {}", format_chain(chain)))
                    .add_hint("Move the shared part into a separate file?")
            }
        };

        match self.location() {
            Some(location) => builder.with_location(location.clone()).build(),
            None => builder.build(),
        }
    }
}

/// A problem that does not stop resolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveWarning {
    /// Two entries of one mapping have the same key once includes are resolved
    #[error("duplicate key `{key}` at {tree_path}")]
    DuplicateKey {
        tree_path: TreePath,
        key: String,
        location: SourceInfo,
        /// The key of the earlier entry
        first: SourceInfo,
    },
}

impl ResolveWarning {
    pub fn code(&self) -> &'static str {
        match self {
            ResolveWarning::DuplicateKey { .. } => "R-1-6",
        }
    }

    pub fn location(&self) -> &SourceInfo {
        match self {
            ResolveWarning::DuplicateKey { location, .. } => location,
        }
    }

    /// Convert into a structured diagnostic for display.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let code = self.code();
        let builder = DiagnosticMessageBuilder::warning(catalog_title(code)).with_code(code);
        match self {
            ResolveWarning::DuplicateKey {
                tree_path,
                key,
                location,
                first,
            } => builder
                .problem(format!("Key `{}` is defined more than once", key))
                .add_info(format!("At document path `{}`", tree_path))
                .add_detail_at("First defined here", first.clone())
                .add_note("The later entry replaces the earlier one in JSON output")
                .with_location(location.clone())
                .build(),
        }
    }
}

fn catalog_title(code: &str) -> String {
    get_error_info(code).map_or_else(|| "Include Error".to_string(), |info| info.title.clone())
}

fn with_tree_path(
    builder: DiagnosticMessageBuilder,
    tree_path: Option<&TreePath>,
) -> DiagnosticMessageBuilder {
    match tree_path {
        Some(tree_path) => builder.add_info(format!("Included at document path `{}`", tree_path)),
        None => builder,
    }
}

fn at_path(tree_path: &Option<TreePath>) -> String {
    tree_path
        .as_ref()
        .map(|p| format!(" at {}", p))
        .unwrap_or_default()
}

fn included_at(tree_path: &Option<TreePath>) -> String {
    tree_path
        .as_ref()
        .map(|p| format!(" (included at {})", p))
        .unwrap_or_default()
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub(crate) fn io_error(
    path: &Path,
    tree_path: Option<&TreePath>,
    source: io::Error,
    location: Option<&SourceInfo>,
) -> ResolveError {
    ResolveError::Io {
        path: path.to_path_buf(),
        tree_path: tree_path.cloned(),
        source,
        location: location.cloned(),
    }
}

//! Error types for YAML parsing with source locations.

use crate::SourceInfo;
use thiserror::Error;

/// Result type alias for raml-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during YAML parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// YAML syntax error
    #[error("{message}")]
    ParseError {
        message: String,
        location: Option<SourceInfo>,
    },

    /// Event stream that does not describe a well-formed tree
    #[error("Invalid YAML structure: {message}")]
    InvalidStructure {
        message: String,
        location: Option<SourceInfo>,
    },
}

impl Error {
    /// Source location of the error, if the parser reported one.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            Error::ParseError { location, .. } | Error::InvalidStructure { location, .. } => {
                location.as_ref()
            }
        }
    }

    /// Human-readable message without the location.
    pub fn message(&self) -> &str {
        match self {
            Error::ParseError { message, .. } | Error::InvalidStructure { message, .. } => message,
        }
    }

    pub(crate) fn from_scan(err: yaml_rust2::ScanError, filename: Option<&str>) -> Self {
        let mut location = crate::parser::source_info_from_marker(err.marker(), 0);
        if let Some(filename) = filename {
            location = location.with_file(filename);
        }
        Error::ParseError {
            message: err.info().to_string(),
            location: Some(location),
        }
    }
}

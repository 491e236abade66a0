//! Error code catalog and lookup.
//!
//! Maps error codes (like "R-1-2") to their metadata. The catalog is embedded
//! at compile time from `error_catalog.json`, so lookups never touch the disk.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for an error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Subsystem name (e.g., "include")
    pub subsystem: String,

    /// Short title for the error
    pub title: String,

    /// Default message for the error
    pub message_template: String,

    /// When this error was introduced (version)
    pub since_version: String,
}

/// Global error catalog, parsed lazily from the embedded JSON.
///
/// # Panics
///
/// Panics if the embedded JSON is invalid, which can only happen if the
/// catalog file is edited incorrectly.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data).expect("Invalid error catalog JSON")
});

/// Look up error code information.
///
/// ```
/// use raml_error_reporting::get_error_info;
///
/// let info = get_error_info("R-1-5").unwrap();
/// assert_eq!(info.title, "Include Cycle");
/// ```
pub fn get_error_info(code: &str) -> Option<&ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        assert!(!ERROR_CATALOG.is_empty());
    }

    #[test]
    fn test_include_codes_exist() {
        for code in ["R-1-1", "R-1-2", "R-1-3", "R-1-4", "R-1-5", "R-1-6"] {
            let info = get_error_info(code).unwrap_or_else(|| panic!("missing {}", code));
            assert_eq!(info.subsystem, "include");
            assert!(!info.title.is_empty());
        }
    }
}

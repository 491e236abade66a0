//! Source locations for RAML documents.
//!
//! Every node produced by `raml-yaml` and every diagnostic produced while
//! resolving includes carries a [`SourceInfo`]. Because a resolved document is
//! stitched together from many files, the location always records which file
//! it points into.
//!
//! # Example
//!
//! ```rust
//! use raml_source_map::{SourceInfo, line_col_to_offset};
//!
//! let text = "title: API\nversion: v1\n";
//! let offset = line_col_to_offset(text, 1, 0).unwrap();
//! let info = SourceInfo::new(Some("api.raml".into()), offset, 2, 1, 7);
//!
//! assert_eq!(info.to_string(), "api.raml:2:1");
//! assert_eq!(&text[info.offset..info.end_offset()], "version");
//! ```

pub mod context;
pub mod source_info;
pub mod utils;

pub use context::SourceContext;
pub use source_info::SourceInfo;
pub use utils::{line_col_to_offset, offset_to_line_col};

//! Diagnostic messages for RAML include resolution.
//!
//! Errors raised while resolving a specification are converted into
//! [`DiagnosticMessage`]s: a coded title, a problem statement, bulleted
//! details, hints and an optional source location. Messages render as plain
//! text, as text with an ariadne source snippet when the source is available,
//! or as JSON for tools.
//!
//! ```
//! use raml_error_reporting::DiagnosticMessageBuilder;
//!
//! let msg = DiagnosticMessageBuilder::error("Included File Not Readable")
//!     .with_code("R-1-2")
//!     .problem("`types.raml` could not be read")
//!     .add_detail("At document path `/types`")
//!     .add_hint("Is the base directory correct?")
//!     .build();
//!
//! assert!(msg.to_text(None).starts_with("Error [R-1-2]: Included File Not Readable"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};

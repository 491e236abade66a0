//! Diagnostic display for the command line.

use raml_error_reporting::DiagnosticMessage;
use raml_source_map::SourceContext;

/// Print a diagnostic to stderr, as text with source snippets or as JSON.
pub fn display_diagnostic(diagnostic: &DiagnosticMessage, json: bool) {
    eprintln!("{}", format_diagnostic(diagnostic, json));
}

fn format_diagnostic(diagnostic: &DiagnosticMessage, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(&diagnostic.to_json())
            .unwrap_or_else(|_| diagnostic.title.clone());
    }
    let ctx = source_context(diagnostic);
    diagnostic.to_text(Some(&ctx))
}

/// Load the files a diagnostic points into, so snippets can be shown.
/// Files that can't be read are skipped; the diagnostic then falls back to
/// `file:line:col`.
fn source_context(diagnostic: &DiagnosticMessage) -> SourceContext {
    let mut ctx = SourceContext::new();
    for file in diagnostic.referenced_files() {
        ctx.add_disk_file(file);
    }
    ctx
}

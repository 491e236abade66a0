//! Core diagnostic message types.
//!
//! A diagnostic has a title, a kind, an optional code and problem statement,
//! bulleted details and hints, and optionally the source location it refers
//! to.

use raml_source_map::{SourceContext, SourceInfo};
use serde::{Deserialize, Serialize};

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// An error that prevents completion
    Error,
    /// A problem that doesn't prevent completion
    Warning,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
        }
    }
}

/// How detail items are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// Error detail (✖ bullet)
    Error,
    /// Info detail (ℹ bullet)
    Info,
    /// Note detail (plain bullet)
    Note,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
            DetailKind::Note => "•",
        }
    }
}

/// A detail item in a diagnostic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: String,
    /// Where in the source this detail applies, if anywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

/// A structured diagnostic message.
///
/// Structure:
/// 1. **Code**: optional error code (e.g., "R-1-2") listed in the catalog
/// 2. **Title**: brief error message
/// 3. **Kind**: Error or Warning
/// 4. **Problem**: what went wrong
/// 5. **Details**: specific information (paths, files, values)
/// 6. **Hints**: optional guidance for fixing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub title: String,

    pub kind: DiagnosticKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DetailItem>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

impl DiagnosticMessage {
    /// Create a new diagnostic message with just a title and kind.
    ///
    /// Consider using [`DiagnosticMessageBuilder`](crate::DiagnosticMessageBuilder)
    /// instead for better structure.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    /// Create an error diagnostic.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Files referenced by this diagnostic's locations, main location first.
    pub fn referenced_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        let locations = self
            .location
            .iter()
            .chain(self.details.iter().filter_map(|d| d.location.as_ref()));
        for file in locations.filter_map(|loc| loc.file.as_deref()) {
            if !files.contains(&file) {
                files.push(file);
            }
        }
        files
    }

    /// Render this diagnostic message as text.
    ///
    /// When a source context holds the file of the main location, the output
    /// starts with an ariadne snippet of that source; otherwise the location
    /// is printed as `file:line:col`.
    ///
    /// ```text
    /// Error [R-1-2]: title
    /// Problem statement here
    /// at api.raml:3:7
    /// ✖ Error detail
    /// ℹ Info detail
    /// ? Hint
    /// ```
    pub fn to_text(&self, ctx: Option<&SourceContext>) -> String {
        let snippet = match (&self.location, ctx) {
            (Some(location), Some(ctx)) => self.render_source_snippet(location, ctx),
            _ => None,
        };

        let mut lines = Vec::new();
        match &snippet {
            Some(snippet) => lines.push(snippet.trim_end().to_string()),
            None => {
                match &self.code {
                    Some(code) => lines.push(format!("{} [{}]: {}", self.kind.label(), code, self.title)),
                    None => lines.push(format!("{}: {}", self.kind.label(), self.title)),
                }
                if let Some(problem) = &self.problem {
                    lines.push(problem.clone());
                }
                if let Some(location) = &self.location {
                    lines.push(format!("at {}", location));
                }
            }
        }

        for detail in &self.details {
            // The snippet already labels located details
            if snippet.is_some() && detail.location.is_some() {
                continue;
            }
            lines.push(format!("{} {}", detail.kind.bullet(), detail.content));
        }

        for hint in &self.hints {
            lines.push(format!("? {}", hint));
        }

        lines.join("\n")
    }

    /// Render this diagnostic message as a JSON value.
    ///
    /// ```
    /// use raml_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::error("Include Cycle").with_code("R-1-5");
    /// let json = msg.to_json();
    /// assert_eq!(json["kind"], "error");
    /// assert_eq!(json["code"], "R-1-5");
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({ "title": self.title }))
    }

    fn render_source_snippet(&self, location: &SourceInfo, ctx: &SourceContext) -> Option<String> {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let file = location.file.clone()?;
        let content = ctx.get_content(&file)?;
        let main_span = clamp_span(location, content)?;

        let (report_kind, main_color) = match self.kind {
            DiagnosticKind::Error => (ReportKind::Error, Color::Red),
            DiagnosticKind::Warning => (ReportKind::Warning, Color::Yellow),
        };

        let mut report = Report::build(report_kind, file.clone(), main_span.start);

        match &self.code {
            Some(code) => report = report.with_message(format!("[{}] {}", code, self.title)),
            None => report = report.with_message(&self.title),
        }

        let main_message = self.problem.as_deref().unwrap_or(&self.title);
        report = report.with_label(
            Label::new((file.clone(), main_span))
                .with_message(main_message)
                .with_color(main_color),
        );

        for detail in &self.details {
            let Some(detail_loc) = &detail.location else {
                continue;
            };
            if detail_loc.file.as_deref() != Some(file.as_str()) {
                continue;
            }
            if let Some(span) = clamp_span(detail_loc, content) {
                report = report.with_label(
                    Label::new((file.clone(), span))
                        .with_message(&detail.content)
                        .with_color(Color::Cyan),
                );
            }
        }

        let mut output = Vec::new();
        report
            .finish()
            .write((file, Source::from(content)), &mut output)
            .ok()?;

        String::from_utf8(output).ok()
    }
}

/// Byte span of a location inside `content`, at least one character wide.
fn clamp_span(location: &SourceInfo, content: &str) -> Option<std::ops::Range<usize>> {
    if location.offset > content.len() {
        return None;
    }
    let end = location.end_offset().max(location.offset + 1).min(content.len());
    Some(location.offset..end.max(location.offset))
}

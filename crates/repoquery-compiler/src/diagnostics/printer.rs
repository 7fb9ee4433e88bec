//! Rendering diagnostics against the method name they point into.

use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};

/// Renders diagnostics as annotated snippets of a method name.
///
/// Without a source, diagnostics are printed one per line in plain form.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    /// The method name the diagnostic spans point into.
    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    /// Shown as the snippet origin, usually `Interface::method`.
    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let Some(source) = self.source else {
            return self.diagnostics.to_string();
        };
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };
        let reports: Vec<String> = self
            .diagnostics
            .iter()
            .map(|diag| renderer.render(&self.report(diag, source)).to_string())
            .collect();
        reports.join("\n")
    }

    fn report<'a>(&'a self, diag: &'a DiagnosticMessage, source: &'a str) -> Vec<Group<'a>> {
        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(underline(diag.range, source.len()))
                .label(&diag.message),
        );
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        for related in &diag.related {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(underline(related.range, source.len()))
                    .label(&related.message),
            );
        }

        let level = match diag.severity {
            Severity::Error => Level::ERROR,
            Severity::Warning => Level::WARNING,
        };
        let mut report = vec![level.primary_title(&diag.message).element(snippet)];
        report.extend(
            diag.hints
                .iter()
                .map(|hint| Group::with_title(Level::HELP.secondary_title(hint))),
        );
        report
    }
}

/// Byte range to underline; zero-width spans widen to one character where possible.
fn underline(range: TextRange, len: usize) -> Range<usize> {
    let (start, end) = (usize::from(range.start()), usize::from(range.end()));
    if start == end {
        start..(start + 1).min(len)
    } else {
        start..end
    }
}

use crate::ast::Span;
use ariadne::{Color, Label, Report, ReportKind, Source};

/// A problem located in an rc file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    /// Shown under the report, e.g. what was expected instead.
    pub hint: Option<String>,
}

impl ParseError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn render(&self, source: &str, out: &mut Vec<u8>) {
        // Spans past the end come from "unexpected end of input".
        let end = source.chars().count();
        let span = self.span.start.min(end)..self.span.end.min(end);
        let mut report = Report::build(ReportKind::Error, (), span.start)
            .with_config(ariadne::Config::default().with_color(false))
            .with_message(&self.message)
            .with_label(
                Label::new(span)
                    .with_message(&self.message)
                    .with_color(Color::Red),
            );
        if let Some(hint) = &self.hint {
            report = report.with_note(hint);
        }
        report.finish().write(Source::from(source), &mut *out).ok();
    }
}

/// Renders `errors` against `source` as plain-text reports, one after the
/// other.
pub fn format_errors(source: &str, errors: &[ParseError]) -> String {
    let mut out = Vec::new();
    for error in errors {
        error.render(source, &mut out);
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_names_the_problem() {
        let source = "set tab_width = \"wide\"\n";
        let error = ParseError::new(0..22, "tab_width expects a number").with_hint("try 4");
        let rendered = format_errors(source, &[error]);
        assert!(rendered.contains("tab_width expects a number"));
        assert!(rendered.contains("try 4"));
        assert!(!rendered.contains('\u{1b}'));
    }

    #[test]
    fn spans_past_the_end_are_clamped() {
        let rendered = format_errors("set", &[ParseError::new(3..4, "unexpected end of input")]);
        assert!(rendered.contains("unexpected end of input"));
    }
}

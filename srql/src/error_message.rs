//! Presentation layer for `srql_ast::error`: renders a compiler `Error`
//! against the query text it was raised from, as a human-readable,
//! `ariadne`-backed snippet.
use std::fmt::{self, Display, Formatter};
use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};
use serde::Serialize;

use srql_ast::{Error, Errors, LineIndex, MessageKind};

/// The source id ariadne's labels are built against. SRQL only ever compiles
/// one query string at a time, so there's no multi-file source tree to name.
const SOURCE_ID: &str = "query";

#[derive(Debug, Clone, Serialize)]
pub struct SourceLocation {
    /// 1-based line, 0-based column.
    pub start: (usize, usize),
    pub end: (usize, usize),
}

#[derive(Clone, Serialize)]
pub struct ErrorMessage {
    pub kind: MessageKind,
    pub code: Option<String>,
    pub reason: String,
    pub hints: Vec<String>,
    pub span: Option<(usize, usize)>,
    pub display: Option<String>,
    pub location: Option<SourceLocation>,
}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // https://github.com/zesterer/ariadne/issues/52
        if let Some(display) = &self.display {
            let trimmed = display
                .split('\n')
                .map(str::trim_end)
                .collect::<Vec<_>>()
                .join("\n");
            f.write_str(&trimmed)
        } else {
            let code = self.code.as_ref().map(|c| format!("[{c}] ")).unwrap_or_default();
            write!(f, "{code}Error: {}", self.reason)
        }
    }
}

impl From<&Error> for ErrorMessage {
    fn from(e: &Error) -> Self {
        ErrorMessage {
            kind: e.kind,
            code: e.code.map(str::to_string),
            reason: e.reason.to_string(),
            hints: e.hints.clone(),
            span: e.span.map(|s| (s.start, s.end)),
            display: None,
            location: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorMessages {
    pub inner: Vec<ErrorMessage>,
}

impl From<&Errors> for ErrorMessages {
    fn from(errors: &Errors) -> Self {
        ErrorMessages {
            inner: errors.0.iter().map(ErrorMessage::from).collect(),
        }
    }
}

impl Display for ErrorMessages {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, e) in self.inner.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            Display::fmt(e, f)?;
        }
        Ok(())
    }
}

impl ErrorMessages {
    /// Fills in `location` and a ready-to-print `display` for every message,
    /// against the single query string they were raised from.
    pub fn composed(mut self, source: &str) -> Self {
        let index = LineIndex::new(source);
        for e in &mut self.inner {
            e.location = e.compose_location(&index);
            e.display = e.compose_display(source);
        }
        self
    }
}

impl ErrorMessage {
    fn compose_location(&self, index: &LineIndex) -> Option<SourceLocation> {
        let (start, end) = self.span?;
        Some(SourceLocation {
            start: index.line_col(start),
            end: index.line_col(end),
        })
    }

    fn compose_display(&self, source: &str) -> Option<String> {
        let (start, end) = self.span?;
        let span: Range<usize> = start..end;

        let mut report = Report::build(ReportKind::Error, SOURCE_ID, span.start)
            .with_config(Config::default().with_color(false))
            .with_label(Label::new((SOURCE_ID, span)).with_message(&self.reason));

        if let Some(code) = &self.code {
            report = report.with_code(code);
        }
        if let Some(hint) = self.hints.first() {
            report.set_help(hint);
        }

        let mut out = Vec::new();
        report
            .finish()
            .write((SOURCE_ID, Source::from(source)), &mut out)
            .ok()?;
        String::from_utf8(out).ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use srql_ast::{Reason, WithErrorInfo};

    #[test]
    fn renders_reason_when_no_source_available() {
        let message = ErrorMessage::from(&Error::new_simple("unexpected token"));
        assert_eq!(message.to_string(), "Error: unexpected token");
    }

    #[test]
    fn composed_fills_in_line_and_column() {
        let error = Error::new(Reason::Unexpected {
            found: "`@`".to_string(),
        })
        .with_span(Some(srql_ast::Span::new(19, 20)));
        let messages = ErrorMessages {
            inner: vec![ErrorMessage::from(&error)],
        }
        .composed("show devices where x = @");

        let location = messages.inner[0].location.as_ref().unwrap();
        assert_eq!(location.start, (1, 19));
        assert!(messages.inner[0].display.is_some());
    }
}

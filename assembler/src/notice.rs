use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// A recoverable condition met while assembling: an unresolved reference, an
/// unmapped page, a dangling anchor. Notices never stop the assembly.
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    /// Byte span in the source identified by `file_id`, when known.
    pub span: Option<Range<usize>>,
    pub file_id: usize,
    pub notes: Vec<String>,
}

impl Notice {
    pub fn warning(message: impl Into<String>, file_id: usize) -> Self {
        Notice {
            message: message.into(),
            severity: Severity::Warning,
            span: None,
            file_id,
            notes: Vec::new(),
        }
    }

    /// An informational notice, such as a rewritten link.
    pub fn note(message: impl Into<String>, file_id: usize) -> Self {
        Notice {
            severity: Severity::Note,
            ..Notice::warning(message, file_id)
        }
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let labels = match &self.span {
            Some(span) => vec![Label::primary(self.file_id, span.clone())],
            None => Vec::new(),
        };
        Diagnostic::new(self.severity)
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

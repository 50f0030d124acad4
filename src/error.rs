//! Error types for loading invitation documents

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read invitation document: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid invitation document at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
}

impl DocumentError {
    /// Convert a JSON decode error, keeping its source position
    pub fn from_json(err: serde_json::Error) -> Self {
        if err.is_io() {
            return DocumentError::Io(err.into());
        }
        let message = err.to_string();
        // serde_json appends " at line N column M"; the position is kept separately
        let message = match message.rfind(" at line ") {
            Some(idx) => message[..idx].to_string(),
            None => message,
        };
        DocumentError::Syntax {
            line: err.line(),
            column: err.column(),
            message,
        }
    }

    /// Byte span of the error in `source`, if it has a position
    pub fn span(&self, source: &str) -> Option<Span> {
        match self {
            DocumentError::Syntax { line, column, .. } => {
                let offset = offset_of(source, *line, *column);
                let end = source[offset..]
                    .chars()
                    .next()
                    .map(|c| offset + c.len_utf8())
                    .unwrap_or(offset);
                Some(offset..end)
            }
            DocumentError::Io(_) => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let (span, message) = match (self, self.span(source)) {
            (DocumentError::Syntax { message, .. }, Some(span)) => (span, message),
            _ => return self.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid invitation document")
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Byte offset of a 1-based line / column pair as reported by serde_json.
///
/// serde_json counts columns in bytes; column 0 means "before the first
/// character of the line".
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (idx, text) in source.split_inclusive('\n').enumerate() {
        if idx + 1 == line {
            let mut col = column.saturating_sub(1).min(text.len());
            while !text.is_char_boundary(col) {
                col -= 1;
            }
            return offset + col;
        }
        offset += text.len();
    }
    source.len()
}

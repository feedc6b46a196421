//! Error types for tree construction and tree sources

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("unknown node '{key}'")]
    UnknownNode { key: String },

    #[error("duplicate node key '{key}'")]
    DuplicateKey { key: String },

    #[error("node '{key}' has invalid card size {width}x{height}")]
    InvalidSize { key: String, width: f64, height: f64 },

    #[error("malformed tree: {reason}")]
    Malformed { reason: String },

    #[error("failed to parse tree document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize tree document: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to read tree document: {0}")]
    Io(#[from] std::io::Error),
}

impl TreeError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Get the source span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Parse(e) => e.span(),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne.
    ///
    /// Errors without a span fall back to their plain message.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return format!("Error: {}\n", self);
        };
        let message = match self {
            Self::Parse(e) => e.message().to_string(),
            other => other.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid tree document")
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match (written, String::from_utf8(buf)) {
            (Ok(()), Ok(report)) => report,
            _ => format!("Error: {}\n", message),
        }
    }
}

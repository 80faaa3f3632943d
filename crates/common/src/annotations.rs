//! Annotation channel for attaching messages to constructs

use std::fmt;

/// Write-only channel that receives lint messages for a construct path
pub trait DiagnosticSink {
    fn add_error(&mut self, path: &str, message: &str);
    fn add_warning(&mut self, path: &str, message: &str);
}

/// Level of an attached annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationLevel {
    Error,
    Warning,
}

impl fmt::Display for AnnotationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationLevel::Error => f.write_str("error"),
            AnnotationLevel::Warning => f.write_str("warning"),
        }
    }
}

/// A message attached to a construct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub level: AnnotationLevel,
    pub message: String,
}

impl Annotation {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: AnnotationLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: AnnotationLevel::Warning,
            message: message.into(),
        }
    }
}

/// Sink that records `(path, annotation)` pairs in emission order
impl DiagnosticSink for Vec<(String, Annotation)> {
    fn add_error(&mut self, path: &str, message: &str) {
        self.push((path.to_string(), Annotation::error(message)));
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.push((path.to_string(), Annotation::warning(message)));
    }
}

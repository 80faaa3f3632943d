//! Diagnostic types for lint results

use std::fmt;

use common::DiagnosticSink;
use serde::Serialize;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// Stable code identifying the check that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DiagnosticCode {
    /// Construct id is not PascalCase
    #[serde(rename = "ERR:001")]
    Err001,
    /// Construct id contains "Stack"
    #[serde(rename = "WARN:001")]
    Warn001,
    /// Construct id contains "Construct"
    #[serde(rename = "WARN:002")]
    Warn002,
    /// Stack depends on another stack
    #[serde(rename = "WARN:003")]
    Warn003,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::Err001 => "ERR:001",
            DiagnosticCode::Warn001 => "WARN:001",
            DiagnosticCode::Warn002 => "WARN:002",
            DiagnosticCode::Warn003 => "WARN:003",
        }
    }

    pub fn default_severity(self) -> DiagnosticSeverity {
        match self {
            DiagnosticCode::Err001 => DiagnosticSeverity::Error,
            _ => DiagnosticSeverity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lint diagnostic attached to a construct path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The rule that produced this diagnostic
    pub rule: String,
    pub code: DiagnosticCode,
    /// Path of the construct the diagnostic is attached to
    pub path: String,
    /// Full message, starting with the bracketed code
    pub message: String,
    /// Optional help text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    pub severity: DiagnosticSeverity,
}

impl Diagnostic {
    pub fn new(
        rule: impl Into<String>,
        code: DiagnosticCode,
        path: impl Into<String>,
        description: impl AsRef<str>,
    ) -> Self {
        Self {
            rule: rule.into(),
            code,
            path: path.into(),
            message: format!("[{}]: {}", code, description.as_ref()),
            help: None,
            severity: code.default_severity(),
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_severity(mut self, severity: DiagnosticSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }

    /// Hand this diagnostic to a sink as an error or a warning
    pub fn emit(&self, sink: &mut dyn DiagnosticSink) {
        match self.severity {
            DiagnosticSeverity::Error => sink.add_error(&self.path, &self.message),
            DiagnosticSeverity::Warning => sink.add_warning(&self.path, &self.message),
        }
    }
}

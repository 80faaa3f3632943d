//! CDK construct lint rules
//!
//! This crate checks construct trees for naming-convention violations and
//! cross-stack references before they are synthesized into templates.
//! Rules can be used:
//! 1. Standalone against any [`common::ConstructView`] projection
//! 2. As an [`common::Aspect`] driven over a [`common::ConstructTree`]

pub mod exclusions;
pub mod rules;
pub mod utils;
pub mod visitor;
mod context;
mod diagnostic;

pub use context::LintContext;
pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSeverity};
pub use exclusions::{Exclusions, NamePattern};
pub use rules::*;
pub use visitor::{
    lint, lint_node, lint_with_config, ConfigError, LintResult, LintRunner, RulesConfig,
};

/// Rule category for mentor rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    /// Rules that detect definitions that are likely to break
    Correctness,
    /// Rules that suggest improvements
    Pedantic,
    /// Rules that enforce naming conventions
    Style,
}

/// Rule metadata
pub trait RuleMeta {
    const NAME: &'static str;
    const CATEGORY: RuleCategory;
    /// Code prefixed to every message the rule emits
    const CODE: DiagnosticCode;
}

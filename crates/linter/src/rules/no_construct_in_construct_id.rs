//! mentor/no-construct-in-construct-id
//!
//! Disallow the word "Construct" in resource construct ids.

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::utils::CONSTRUCT_WORD;
use crate::{LintContext, RuleCategory, RuleMeta};

/// no-construct-in-construct-id rule
#[derive(Debug, Clone, Default)]
pub struct NoConstructInConstructId;

impl RuleMeta for NoConstructInConstructId {
    const NAME: &'static str = "no-construct-in-construct-id";
    const CATEGORY: RuleCategory = RuleCategory::Style;
    const CODE: DiagnosticCode = DiagnosticCode::Warn002;
}

impl NoConstructInConstructId {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        if ctx.resource_type().is_none() {
            return Vec::new();
        }
        match ctx.construct_id() {
            Some(id) if id.contains(CONSTRUCT_WORD) => vec![Diagnostic::new(
                Self::NAME,
                Self::CODE,
                ctx.path(),
                format!(
                    "Construct ID names should NOT include the word \"Construct\" \"{}\". The Construct concept from CDK is reflected in the resource names.",
                    id
                ),
            )],
            _ => Vec::new(),
        }
    }
}

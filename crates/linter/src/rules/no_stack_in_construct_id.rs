//! mentor/no-stack-in-construct-id
//!
//! Disallow the word "Stack" in resource construct ids. The stack concept is
//! already reflected in the generated resource names.
//!
//! A resource whose stack references another stack may carry that stack's
//! name in its id. Only the first recorded dependency is compared, so with
//! several dependencies an id naming a later one is still reported.

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::exclusions::may_contain_stack_name;
use crate::utils::STACK_WORD;
use crate::{LintContext, RuleCategory, RuleMeta};

/// no-stack-in-construct-id rule
#[derive(Debug, Clone, Default)]
pub struct NoStackInConstructId;

impl RuleMeta for NoStackInConstructId {
    const NAME: &'static str = "no-stack-in-construct-id";
    const CATEGORY: RuleCategory = RuleCategory::Style;
    const CODE: DiagnosticCode = DiagnosticCode::Warn001;
}

impl NoStackInConstructId {
    pub fn new() -> Self {
        Self
    }

    /// Check the construct id of a resource node
    pub fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let (Some(resource_type), Some(id)) = (ctx.resource_type(), ctx.construct_id()) else {
            return Vec::new();
        };
        if !id.contains(STACK_WORD) || may_contain_stack_name(resource_type) {
            return Vec::new();
        }
        // Outside any stack there is nothing to compare against
        let Some(dependencies) = ctx.stack_dependencies() else {
            return Vec::new();
        };

        let names_referenced_stack = dependencies
            .first_key()
            .is_some_and(|stack| id.contains(stack));
        if names_referenced_stack {
            return Vec::new();
        }

        vec![Diagnostic::new(
            Self::NAME,
            Self::CODE,
            ctx.path(),
            format!(
                "Construct ID names should NOT include the word \"Stack\" \"{}\". The Stack concept from CDK is reflected in the resource names.",
                id
            ),
        )]
    }
}

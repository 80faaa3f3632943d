//! mentor/cross-stack-reference
//!
//! Warn on stacks that depend on other stacks. Strong cross-stack references
//! become CloudFormation exports that lock the producing stack in place.

use common::StackDependency;

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::{LintContext, RuleCategory, RuleMeta};

/// cross-stack-reference rule
#[derive(Debug, Clone, Default)]
pub struct CrossStackReference;

impl RuleMeta for CrossStackReference {
    const NAME: &'static str = "cross-stack-reference";
    const CATEGORY: RuleCategory = RuleCategory::Pedantic;
    const CODE: DiagnosticCode = DiagnosticCode::Warn003;
}

impl CrossStackReference {
    pub fn new() -> Self {
        Self
    }

    /// Check a stack node for recorded dependencies
    pub fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        if !ctx.is_stack() {
            return Vec::new();
        }
        match ctx.stack_dependencies() {
            Some(dependencies) if !dependencies.is_empty() => {
                let depends_on = dependencies
                    .iter()
                    .map(|(stack, dependency)| describe(stack, dependency))
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![Diagnostic::new(
                    Self::NAME,
                    Self::CODE,
                    ctx.path(),
                    format!(
                        "This {} stack may cause CrossStack references.",
                        ctx.path()
                    ),
                )
                .with_help(format!(
                    "Depends on: {}. Consider passing values through SSM parameters or weak references.",
                    depends_on
                ))]
            }
            _ => Vec::new(),
        }
    }
}

/// `Producer`, or `Producer (Consumer/Queue -> Producer/Topic)` when the
/// references behind the dependency are known
fn describe(stack: &str, dependency: &StackDependency) -> String {
    if dependency.reasons.is_empty() {
        return stack.to_string();
    }
    let reasons = dependency
        .reasons
        .iter()
        .map(|reason| format!("{} -> {}", reason.source, reason.target))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{stack} ({reasons})")
}

//! mentor/pascal-case-construct-id
//!
//! Restrict construct ids of resources to PascalCase.

use serde::Deserialize;

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::exclusions::Exclusions;
use crate::utils::is_pascal_case;
use crate::{LintContext, RuleCategory, RuleMeta};

/// pascal-case-construct-id rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct PascalCaseConstructId {
    /// Exemptions on top of the built-in tables
    pub exclusions: Exclusions,
}

impl RuleMeta for PascalCaseConstructId {
    const NAME: &'static str = "pascal-case-construct-id";
    const CATEGORY: RuleCategory = RuleCategory::Style;
    const CODE: DiagnosticCode = DiagnosticCode::Err001;
}

impl PascalCaseConstructId {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exclusions(mut self, exclusions: Exclusions) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Check the construct id of a resource node
    pub fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let (Some(resource_type), Some(id)) = (ctx.resource_type(), ctx.construct_id()) else {
            return Vec::new();
        };
        if is_pascal_case(id) || self.exclusions.is_excluded(resource_type, id) {
            return Vec::new();
        }

        vec![Diagnostic::new(
            Self::NAME,
            Self::CODE,
            ctx.path(),
            format!("Construct ID \"{}\" should be defined in PascalCase.", id),
        )
        .with_help("Start with an uppercase letter and use only letters and digits, e.g. \"OrderQueue\".")]
    }
}

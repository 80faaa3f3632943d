//! Aspect that runs all lint rules in a single tree pass
//!
//! This module provides a `LintRunner` that is visited once per construct
//! and runs all enabled rules against it, collecting diagnostics in visit
//! order. Rules never mutate the tree, so a runner can be driven by any host
//! that exposes its nodes as [`ConstructView`]s.

use common::{Aspect, ConstructTree, ConstructView, DiagnosticSink};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::context::LintContext;
use crate::diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSeverity};
use crate::rules::{
    CrossStackReference, NoConstructInConstructId, NoStackInConstructId, PascalCaseConstructId,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid rules configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for which rules are enabled
///
/// In JSON a configurable rule takes either a flag or its settings object,
/// e.g. `"pascalCaseConstructId": { "exclusions": { "prefixes": ["legacy_"] } }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct RulesConfig {
    #[serde(deserialize_with = "rule_setting")]
    pub pascal_case_construct_id: Option<PascalCaseConstructId>,
    pub no_stack_in_construct_id: bool,
    pub no_construct_in_construct_id: bool,
    pub cross_stack_reference: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            pascal_case_construct_id: Some(PascalCaseConstructId::new()),
            no_stack_in_construct_id: true,
            no_construct_in_construct_id: true,
            cross_stack_reference: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleSetting<R> {
    Enabled(bool),
    Configured(R),
}

fn rule_setting<'de, D, R>(deserializer: D) -> Result<Option<R>, D::Error>
where
    D: Deserializer<'de>,
    R: Deserialize<'de> + Default,
{
    Ok(match RuleSetting::deserialize(deserializer)? {
        RuleSetting::Enabled(true) => Some(R::default()),
        RuleSetting::Enabled(false) => None,
        RuleSetting::Configured(rule) => Some(rule),
    })
}

impl RulesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn none() -> Self {
        Self {
            pascal_case_construct_id: None,
            no_stack_in_construct_id: false,
            no_construct_in_construct_id: false,
            cross_stack_reference: false,
        }
    }

    /// Parse a configuration object; omitted keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_pascal_case_construct_id(mut self, rule: PascalCaseConstructId) -> Self {
        self.pascal_case_construct_id = Some(rule);
        self
    }

    pub fn with_no_stack_in_construct_id(mut self, enabled: bool) -> Self {
        self.no_stack_in_construct_id = enabled;
        self
    }

    pub fn with_no_construct_in_construct_id(mut self, enabled: bool) -> Self {
        self.no_construct_in_construct_id = enabled;
        self
    }

    pub fn with_cross_stack_reference(mut self, enabled: bool) -> Self {
        self.cross_stack_reference = enabled;
        self
    }
}

/// Aspect that runs all enabled rules on every visited construct
pub struct LintRunner {
    pascal_case_construct_id: Option<PascalCaseConstructId>,
    no_stack_in_construct_id: Option<NoStackInConstructId>,
    no_construct_in_construct_id: Option<NoConstructInConstructId>,
    cross_stack_reference: Option<CrossStackReference>,
    diagnostics: Vec<Diagnostic>,
    visited: usize,
}

impl LintRunner {
    pub fn new(config: RulesConfig) -> Self {
        Self {
            pascal_case_construct_id: config.pascal_case_construct_id,
            no_stack_in_construct_id: config
                .no_stack_in_construct_id
                .then(NoStackInConstructId::new),
            no_construct_in_construct_id: config
                .no_construct_in_construct_id
                .then(NoConstructInConstructId::new),
            cross_stack_reference: config.cross_stack_reference.then(CrossStackReference::new),
            diagnostics: Vec::new(),
            visited: 0,
        }
    }

    /// Run every enabled rule against one node without recording anything
    pub fn check_node(&self, node: &dyn ConstructView) -> Vec<Diagnostic> {
        let ctx = LintContext::new(node);
        let mut diagnostics = Vec::new();

        // Checks are independent: each may fire on the same node
        if let Some(rule) = &self.pascal_case_construct_id {
            diagnostics.extend(rule.check(&ctx));
        }

        if let Some(rule) = &self.no_stack_in_construct_id {
            diagnostics.extend(rule.check(&ctx));
        }

        if let Some(rule) = &self.no_construct_in_construct_id {
            diagnostics.extend(rule.check(&ctx));
        }

        if let Some(rule) = &self.cross_stack_reference {
            diagnostics.extend(rule.check(&ctx));
        }

        diagnostics
    }

    /// Run all rules on the given tree
    pub fn run(mut self, tree: &ConstructTree) -> LintResult {
        tree.apply_aspect(&mut self);
        self.finish()
    }

    pub fn finish(self) -> LintResult {
        let result = LintResult {
            diagnostics: self.diagnostics,
            nodes_visited: self.visited,
        };
        info!(
            nodes = result.nodes_visited,
            errors = result.error_count(),
            warnings = result.warning_count(),
            "construct lint finished"
        );
        result
    }
}

impl Aspect for LintRunner {
    fn visit(&mut self, node: &dyn ConstructView) {
        trace!(path = node.path(), "visiting construct");
        self.visited += 1;
        for diagnostic in self.check_node(node) {
            debug!(code = %diagnostic.code, path = %diagnostic.path, "{}", diagnostic.message);
            self.diagnostics.push(diagnostic);
        }
    }
}

/// Result of running the linter
#[derive(Debug, Clone, Default)]
pub struct LintResult {
    /// Diagnostics in visit order
    pub diagnostics: Vec<Diagnostic>,
    pub nodes_visited: usize,
}

impl LintResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Diagnostics carrying `code`
    pub fn by_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    /// Forward every diagnostic to `sink`
    pub fn emit(&self, sink: &mut dyn DiagnosticSink) {
        for diagnostic in &self.diagnostics {
            diagnostic.emit(sink);
        }
    }
}

/// Lint a single construct
pub fn lint_node(node: &dyn ConstructView, config: &RulesConfig) -> Vec<Diagnostic> {
    LintRunner::new(config.clone()).check_node(node)
}

/// Convenience function to lint a tree with default configuration
pub fn lint(tree: &ConstructTree) -> LintResult {
    LintRunner::new(RulesConfig::default()).run(tree)
}

/// Convenience function to lint a tree with custom configuration
pub fn lint_with_config(tree: &ConstructTree, config: RulesConfig) -> LintResult {
    LintRunner::new(config).run(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{NodeId, StackDependencies};

    use crate::exclusions::Exclusions;

    /// Free-standing node, not backed by any tree
    struct FakeNode {
        path: &'static str,
        resource_type: Option<&'static str>,
        is_stack: bool,
        dependencies: Option<StackDependencies>,
    }

    impl ConstructView for FakeNode {
        fn path(&self) -> &str {
            self.path
        }

        fn resource_type(&self) -> Option<&str> {
            self.resource_type
        }

        fn is_stack(&self) -> bool {
            self.is_stack
        }

        fn stack_dependencies(&self) -> Option<&StackDependencies> {
            self.dependencies.as_ref()
        }
    }

    fn resource(path: &'static str, dependencies: Option<StackDependencies>) -> FakeNode {
        FakeNode {
            path,
            resource_type: Some("AWS::SNS::Topic"),
            is_stack: false,
            dependencies,
        }
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    fn single_stack(ids: &[&str]) -> ConstructTree {
        let mut tree = ConstructTree::new();
        let stack = tree.add_stack(tree.root(), "Isolated").unwrap();
        for id in ids {
            let construct = tree.add_construct(stack, id).unwrap();
            tree.add_resource(construct, "Resource", "AWS::SNS::Topic")
                .unwrap();
        }
        tree
    }

    #[test]
    fn test_lint_clean_tree() {
        let result = lint(&single_stack(&["Test"]));
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.nodes_visited, 4);
    }

    #[test]
    fn test_lint_camel_case() {
        let result = lint(&single_stack(&["testData"]));
        assert_eq!(codes(&result.diagnostics), vec![DiagnosticCode::Err001]);
        assert_eq!(result.diagnostics[0].path, "Isolated/testData/Resource");
        assert!(result.diagnostics[0].message.contains("\"testData\""));
    }

    #[test]
    fn test_checks_fire_independently() {
        let node = resource("App/my_Stack_Construct", Some(StackDependencies::new()));
        let diagnostics = lint_node(&node, &RulesConfig::default());
        assert_eq!(
            codes(&diagnostics),
            vec![
                DiagnosticCode::Err001,
                DiagnosticCode::Warn001,
                DiagnosticCode::Warn002
            ]
        );
    }

    #[test]
    fn test_empty_construct_id_skips_everything() {
        let node = resource("", Some(StackDependencies::new()));
        assert!(lint_node(&node, &RulesConfig::default()).is_empty());
        let node = resource("App/Resource/", Some(StackDependencies::new()));
        assert!(lint_node(&node, &RulesConfig::default()).is_empty());
    }

    #[test]
    fn test_first_dependency_suppresses_stack_warning() {
        let mut deps = StackDependencies::new();
        deps.record("Producer", None);
        deps.record("Other", None);

        let named = resource("Consumer/ProducerStackTopic", Some(deps.clone()));
        assert!(lint_node(&named, &RulesConfig::default()).is_empty());

        // Only the first dependency is consulted
        let second = resource("Consumer/OtherStackTopic", Some(deps));
        assert_eq!(
            codes(&lint_node(&second, &RulesConfig::default())),
            vec![DiagnosticCode::Warn001]
        );
    }

    #[test]
    fn test_lint_with_disabled_rules() {
        let config = RulesConfig::none().with_no_construct_in_construct_id(true);
        let node = resource("App/bad_StackConstruct", Some(StackDependencies::new()));
        assert_eq!(
            codes(&lint_node(&node, &config)),
            vec![DiagnosticCode::Warn002]
        );
    }

    #[test]
    fn test_config_from_json() {
        let config = RulesConfig::from_json(
            r#"{
                "crossStackReference": false,
                "pascalCaseConstructId": { "exclusions": { "resourceTypes": ["AWS::SNS::Topic"] } }
            }"#,
        )
        .unwrap();
        assert!(!config.cross_stack_reference);
        assert!(config.no_stack_in_construct_id);
        let rule = config.pascal_case_construct_id.as_ref().unwrap();
        assert_eq!(rule.exclusions.resource_types, vec!["AWS::SNS::Topic"]);

        let node = resource("App/lower_case", Some(StackDependencies::new()));
        assert!(lint_node(&node, &config).is_empty());
    }

    #[test]
    fn test_config_rule_flags() {
        let config = RulesConfig::from_json(r#"{ "pascalCaseConstructId": false }"#).unwrap();
        assert_eq!(config.pascal_case_construct_id, None);

        let config = RulesConfig::from_json(r#"{ "pascalCaseConstructId": true }"#).unwrap();
        assert_eq!(config, RulesConfig::default());

        let config = RulesConfig::from_json("{}").unwrap();
        assert_eq!(config, RulesConfig::default());

        assert!(RulesConfig::from_json(r#"{ "pascalCaseConstructId": { "prefixes": [] } }"#).is_err());
    }

    #[test]
    fn test_builder_carries_exclusions() {
        let rule = PascalCaseConstructId::new().with_exclusions(Exclusions::new().with_prefix("legacy_"));
        let config = RulesConfig::none().with_pascal_case_construct_id(rule);
        let node = resource("App/legacy_topic", None);
        assert!(lint_node(&node, &config).is_empty());

        let node = resource("App/other_topic", None);
        assert_eq!(codes(&lint_node(&node, &config)), vec![DiagnosticCode::Err001]);
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        assert!(matches!(
            RulesConfig::from_json(r#"{ "pascalCase": true }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_lint_twice_is_identical() {
        let mut tree = single_stack(&["testData", "TopicConstruct"]);
        let producer = tree.add_stack(tree.root(), "Producer").unwrap();
        let topic = tree.add_construct(producer, "Topic").unwrap();
        let consumer = tree.find("Isolated/testData").unwrap();
        tree.add_cross_stack_reference(consumer, topic).unwrap();

        let first = lint(&tree);
        let second = lint(&tree);
        assert_eq!(first.diagnostics, second.diagnostics);
        assert_eq!(first.by_code(DiagnosticCode::Warn003).count(), 1);
    }

    #[test]
    fn test_result_counts() {
        let result = lint(&single_stack(&["testData", "TopicConstruct"]));
        assert!(result.has_errors());
        assert!(result.has_warnings());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_emit_to_tree() {
        let mut tree = single_stack(&["testData"]);
        let result = lint(&tree);
        result.emit(&mut tree);

        let id: NodeId = tree.find("Isolated/testData/Resource").unwrap();
        assert_eq!(tree.annotations(id).len(), 1);
    }
}

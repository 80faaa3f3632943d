//! CDK Mentor
//!
//! Lints CDK construct trees for naming-convention violations and
//! cross-stack references before they are synthesized into templates.
//!
//! ## Usage
//!
//! ```rust
//! use cdk_mentor::{check_tree, ConstructTree, RulesConfig};
//!
//! let mut tree = ConstructTree::new();
//! let stack = tree.add_stack(tree.root(), "Storage").unwrap();
//! tree.add_resource(stack, "uploads_bucket", "AWS::S3::Bucket").unwrap();
//!
//! let result = check_tree(&mut tree, &RulesConfig::default());
//! assert!(result.has_errors());
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub use common::{
    construct_id, load_assembly, tree_from_json, Annotation, AnnotationLevel, AssemblyError,
    ConstructTree, ConstructView, DiagnosticSink, NodeId, NodeKind, StackDependencies, TreeError,
    TreeNode,
};
pub use mentor_linter::{
    lint, lint_node, lint_with_config, ConfigError, Diagnostic, DiagnosticCode,
    DiagnosticSeverity, Exclusions, LintResult, LintRunner, NamePattern, RulesConfig,
};

#[derive(Debug, Error)]
pub enum MentorError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of checking a cloud assembly
#[derive(Debug)]
pub struct Report {
    /// The loaded tree, with diagnostics attached as annotations
    pub tree: ConstructTree,
    pub result: LintResult,
}

impl Report {
    /// Whether the assembly should be rejected
    pub fn has_errors(&self) -> bool {
        self.result.has_errors()
    }
}

/// Lint `tree` and attach every diagnostic to its construct as an annotation.
///
/// Running this repeatedly over an unchanged tree leaves the annotations as
/// they were after the first run.
pub fn check_tree(tree: &mut ConstructTree, config: &RulesConfig) -> LintResult {
    let result = lint_with_config(tree, config.clone());
    result.emit(tree);
    result
}

/// Load the cloud assembly in `dir` (usually `cdk.out`) and check it
pub fn check_assembly(dir: &Path, config: &RulesConfig) -> Result<Report, MentorError> {
    let mut tree = load_assembly(dir)?;
    info!(dir = %dir.display(), constructs = tree.len(), "loaded cloud assembly");
    let result = check_tree(&mut tree, config);
    Ok(Report { tree, result })
}

/// Like [`check_assembly`], reading the rules configuration from a JSON file
pub fn check_assembly_with_config_file(
    dir: &Path,
    config_file: &Path,
) -> Result<Report, MentorError> {
    let contents = std::fs::read_to_string(config_file).map_err(|source| MentorError::Io {
        path: config_file.to_path_buf(),
        source,
    })?;
    let config = RulesConfig::from_json(&contents)?;
    check_assembly(dir, &config)
}

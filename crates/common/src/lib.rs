//! Construct tree model shared by the linter and the facade crate
//!
//! Provides the read-only [`ConstructView`] projection rules are written
//! against, the explicit cross-stack dependency registry, an in-memory
//! [`ConstructTree`] and a loader for synthesized cloud assemblies.

pub mod annotations;
pub mod assembly;
pub mod dependencies;
pub mod tree;
pub mod view;

pub use annotations::{Annotation, AnnotationLevel, DiagnosticSink};
pub use assembly::{load_assembly, tree_from_json, AssemblyError};
pub use dependencies::{DependencyReason, StackDependencies, StackDependency};
pub use tree::{Aspect, ConstructTree, NodeId, NodeKind, TreeError, TreeNode, Walk};
pub use view::{construct_id, ConstructView, PATH_SEPARATOR, RESOURCE_SEGMENT};

//! Lint context for rule execution

use common::{ConstructView, StackDependencies};

/// Context passed to rules for a single visited construct
pub struct LintContext<'a> {
    node: &'a dyn ConstructView,
    /// Derived once per visit
    construct_id: Option<&'a str>,
}

impl<'a> LintContext<'a> {
    pub fn new(node: &'a dyn ConstructView) -> Self {
        Self {
            node,
            construct_id: node.construct_id(),
        }
    }

    /// Get the visited node
    pub fn node(&self) -> &'a dyn ConstructView {
        self.node
    }

    pub fn path(&self) -> &'a str {
        self.node.path()
    }

    /// Short name of the node, `None` when the path yields an empty id
    pub fn construct_id(&self) -> Option<&'a str> {
        self.construct_id
    }

    pub fn resource_type(&self) -> Option<&'a str> {
        self.node.resource_type()
    }

    pub fn is_stack(&self) -> bool {
        self.node.is_stack()
    }

    /// Dependencies of the owning stack
    pub fn stack_dependencies(&self) -> Option<&'a StackDependencies> {
        self.node.stack_dependencies()
    }
}

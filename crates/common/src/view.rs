//! Read-only projection of a construct tree node

use crate::dependencies::StackDependencies;

/// Path segment the CDK appends for the L1 resource inside an L2 construct
pub const RESOURCE_SEGMENT: &str = "Resource";

/// Path separator between construct ids
pub const PATH_SEPARATOR: char = '/';

/// Narrow read-only view of a host construct.
///
/// Rules only ever see this projection, so they can be exercised against
/// synthetic values without building a whole tree.
pub trait ConstructView {
    /// Slash-delimited path from the root (`""` for the root itself)
    fn path(&self) -> &str;

    /// CloudFormation resource type, only set on resource leaves
    fn resource_type(&self) -> Option<&str>;

    /// Whether this node is a deployable stack boundary
    fn is_stack(&self) -> bool;

    /// Cross-stack dependencies recorded for the owning stack.
    ///
    /// `None` when no stack encloses the node.
    fn stack_dependencies(&self) -> Option<&StackDependencies>;

    /// The short name of this node, see [`construct_id`]
    fn construct_id(&self) -> Option<&str> {
        construct_id(self.path())
    }
}

/// Derive the construct id from a node path.
///
/// The last segment is the id, unless it is the literal `Resource` that the
/// CDK uses for the default child, in which case the segment before it is
/// used. Empty ids yield `None`.
pub fn construct_id(path: &str) -> Option<&str> {
    let mut segments = path.rsplit(PATH_SEPARATOR);
    let last = segments.next()?;
    let id = if last == RESOURCE_SEGMENT {
        segments.next()?
    } else {
        last
    };
    (!id.is_empty()).then_some(id)
}

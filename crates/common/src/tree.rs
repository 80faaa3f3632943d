//! In-memory construct tree
//!
//! Stands in for the host framework's tree: nodes are added through a small
//! builder API, cross-stack references are recorded explicitly on the
//! consuming stack, and aspects are driven over the tree in pre-order.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::annotations::{Annotation, AnnotationLevel, DiagnosticSink};
use crate::dependencies::{DependencyReason, StackDependencies};
use crate::view::{ConstructView, PATH_SEPARATOR};

/// Errors raised while building a tree
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("construct id must not be empty (scope: \"{scope}\")")]
    EmptyId { scope: String },

    #[error("construct id \"{0}\" must not contain '/'")]
    InvalidId(String),

    #[error("there is already a construct with id \"{id}\" in \"{scope}\"")]
    DuplicateId { scope: String, id: String },

    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("\"{0}\" is not a stack")]
    NotAStack(String),

    #[error("\"{0}\" is not inside a stack")]
    NoOwningStack(String),

    #[error("stack \"{0}\" cannot depend on itself")]
    SelfDependency(String),
}

/// Handle to a node inside a [`ConstructTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// What a node represents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The tree root
    App,
    /// Deployable unit
    Stack,
    /// Grouping construct without a CloudFormation counterpart
    Construct,
    /// CloudFormation resource
    Resource { resource_type: String },
}

#[derive(Debug)]
struct NodeData {
    id: String,
    path: String,
    kind: NodeKind,
    children: IndexMap<String, NodeId>,
    /// Nearest enclosing stack, the node itself for stacks
    stack: Option<NodeId>,
    dependencies: StackDependencies,
    annotations: Vec<Annotation>,
}

#[derive(Debug)]
pub struct ConstructTree {
    nodes: Vec<NodeData>,
    by_path: FxHashMap<String, NodeId>,
}

impl Default for ConstructTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructTree {
    /// Create a tree holding only the app root
    pub fn new() -> Self {
        let root = NodeData {
            id: String::new(),
            path: String::new(),
            kind: NodeKind::App,
            children: IndexMap::new(),
            stack: None,
            dependencies: StackDependencies::new(),
            annotations: Vec::new(),
        };
        let mut by_path = FxHashMap::default();
        by_path.insert(String::new(), NodeId(0));
        Self {
            nodes: vec![root],
            by_path,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn add_stack(&mut self, parent: NodeId, id: &str) -> Result<NodeId, TreeError> {
        self.add_node(parent, id, NodeKind::Stack)
    }

    pub fn add_construct(&mut self, parent: NodeId, id: &str) -> Result<NodeId, TreeError> {
        self.add_node(parent, id, NodeKind::Construct)
    }

    pub fn add_resource(
        &mut self,
        parent: NodeId,
        id: &str,
        resource_type: &str,
    ) -> Result<NodeId, TreeError> {
        self.add_node(
            parent,
            id,
            NodeKind::Resource {
                resource_type: resource_type.to_string(),
            },
        )
    }

    /// Add a child node under `parent`
    pub fn add_node(&mut self, parent: NodeId, id: &str, kind: NodeKind) -> Result<NodeId, TreeError> {
        let parent_data = self.data(parent)?;
        if id.is_empty() {
            return Err(TreeError::EmptyId {
                scope: parent_data.path.clone(),
            });
        }
        if id.contains(PATH_SEPARATOR) {
            return Err(TreeError::InvalidId(id.to_string()));
        }
        if parent_data.children.contains_key(id) {
            return Err(TreeError::DuplicateId {
                scope: parent_data.path.clone(),
                id: id.to_string(),
            });
        }

        let path = if parent_data.path.is_empty() {
            id.to_string()
        } else {
            format!("{}{}{}", parent_data.path, PATH_SEPARATOR, id)
        };
        let node_id = NodeId(self.nodes.len());
        let stack = if kind == NodeKind::Stack {
            Some(node_id)
        } else {
            parent_data.stack
        };

        self.nodes.push(NodeData {
            id: id.to_string(),
            path: path.clone(),
            kind,
            children: IndexMap::new(),
            stack,
            dependencies: StackDependencies::new(),
            annotations: Vec::new(),
        });
        self.nodes[parent.0].children.insert(id.to_string(), node_id);
        self.by_path.insert(path, node_id);
        Ok(node_id)
    }

    /// Record that `stack` depends on `target`
    pub fn add_stack_dependency(
        &mut self,
        stack: NodeId,
        target: NodeId,
        reason: Option<DependencyReason>,
    ) -> Result<(), TreeError> {
        let target_name = {
            let target_data = self.data(target)?;
            if target_data.kind != NodeKind::Stack {
                return Err(TreeError::NotAStack(target_data.path.clone()));
            }
            target_data.id.clone()
        };
        let stack_data = self.data(stack)?;
        if stack_data.kind != NodeKind::Stack {
            return Err(TreeError::NotAStack(stack_data.path.clone()));
        }
        if stack == target {
            return Err(TreeError::SelfDependency(stack_data.path.clone()));
        }

        debug!(stack = %stack_data.path, target = %target_name, "recording stack dependency");
        self.nodes[stack.0].dependencies.record(target_name, reason);
        Ok(())
    }

    /// Record a reference from `consumer` to `producer`.
    ///
    /// When the two live in different stacks the consumer's stack gains a
    /// dependency on the producer's stack and `true` is returned. References
    /// inside one stack record nothing.
    pub fn add_cross_stack_reference(
        &mut self,
        consumer: NodeId,
        producer: NodeId,
    ) -> Result<bool, TreeError> {
        let consumer_stack = self.require_stack(consumer)?;
        let producer_stack = self.require_stack(producer)?;
        if consumer_stack == producer_stack {
            return Ok(false);
        }
        let reason = DependencyReason::new(
            self.nodes[consumer.0].path.clone(),
            self.nodes[producer.0].path.clone(),
        );
        self.add_stack_dependency(consumer_stack, producer_stack, Some(reason))?;
        Ok(true)
    }

    /// View of a node
    pub fn node(&self, id: NodeId) -> Option<TreeNode<'_>> {
        (id.0 < self.nodes.len()).then_some(TreeNode { tree: self, id })
    }

    /// Look a node up by its full path
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// Nearest enclosing stack, the node itself for stacks
    pub fn owning_stack(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.stack)
    }

    /// Pre-order traversal: parents before children, siblings in insertion order
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            pending: vec![self.root()],
        }
    }

    /// Visit every node exactly once with `aspect`
    pub fn apply_aspect(&self, aspect: &mut dyn Aspect) {
        for node in self.walk() {
            aspect.visit(&node);
        }
    }

    /// Annotations attached to a node, in emission order
    pub fn annotations(&self, id: NodeId) -> &[Annotation] {
        self.nodes
            .get(id.0)
            .map(|n| n.annotations.as_slice())
            .unwrap_or_default()
    }

    /// Every annotation in the tree as `(path, annotation)`, in walk order
    pub fn all_annotations(&self) -> impl Iterator<Item = (&str, &Annotation)> + '_ {
        self.walk().flat_map(move |node| {
            let data = &self.nodes[node.id.0];
            data.annotations.iter().map(move |a| (data.path.as_str(), a))
        })
    }

    fn annotate(&mut self, path: &str, level: AnnotationLevel, message: &str) {
        let Some(id) = self.find(path) else {
            warn!(path, "dropping annotation for unknown construct path");
            return;
        };
        let annotations = &mut self.nodes[id.0].annotations;
        if annotations
            .iter()
            .any(|a| a.level == level && a.message == message)
        {
            return;
        }
        annotations.push(Annotation {
            level,
            message: message.to_string(),
        });
    }

    fn require_stack(&self, id: NodeId) -> Result<NodeId, TreeError> {
        let data = self.data(id)?;
        self.owning_stack(id)
            .ok_or_else(|| TreeError::NoOwningStack(data.path.clone()))
    }

    fn data(&self, id: NodeId) -> Result<&NodeData, TreeError> {
        self.nodes.get(id.0).ok_or(TreeError::UnknownNode(id))
    }
}

impl DiagnosticSink for ConstructTree {
    fn add_error(&mut self, path: &str, message: &str) {
        self.annotate(path, AnnotationLevel::Error, message);
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.annotate(path, AnnotationLevel::Warning, message);
    }
}

/// Callback driven once per node by [`ConstructTree::apply_aspect`]
pub trait Aspect {
    fn visit(&mut self, node: &dyn ConstructView);
}

/// Borrowed view of one node of a [`ConstructTree`]
#[derive(Debug, Clone, Copy)]
pub struct TreeNode<'t> {
    tree: &'t ConstructTree,
    id: NodeId,
}

impl<'t> TreeNode<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The id this node was added with
    pub fn name(&self) -> &'t str {
        &self.data().id
    }

    pub fn kind(&self) -> &'t NodeKind {
        &self.data().kind
    }

    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.0]
    }

    fn stack_data(&self) -> Option<&'t NodeData> {
        self.data().stack.map(|s| &self.tree.nodes[s.0])
    }
}

impl ConstructView for TreeNode<'_> {
    fn path(&self) -> &str {
        &self.data().path
    }

    fn resource_type(&self) -> Option<&str> {
        match &self.data().kind {
            NodeKind::Resource { resource_type } => Some(resource_type),
            _ => None,
        }
    }

    fn is_stack(&self) -> bool {
        self.data().kind == NodeKind::Stack
    }

    fn stack_dependencies(&self) -> Option<&StackDependencies> {
        self.stack_data().map(|s| &s.dependencies)
    }
}

/// Iterator returned by [`ConstructTree::walk`]
pub struct Walk<'t> {
    tree: &'t ConstructTree,
    pending: Vec<NodeId>,
}

impl<'t> Iterator for Walk<'t> {
    type Item = TreeNode<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.pending.pop()?;
        let data = &self.tree.nodes[id.0];
        self.pending.extend(data.children.values().rev().copied());
        Some(TreeNode {
            tree: self.tree,
            id,
        })
    }
}

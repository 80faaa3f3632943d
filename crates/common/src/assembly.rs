//! Loading construct trees from a synthesized cloud assembly (`cdk.out`)
//!
//! The construct hierarchy comes from `tree.json`. Stack dependencies come
//! from the `dependencies` of stack artifacts in `manifest.json`, which is
//! optional: without it every stack is treated as independent. Stacks inside
//! a `Stage` are listed in a nested assembly (`assembly-<Stage>/manifest.json`)
//! that the parent manifest links to through a `cdk:cloud-assembly` artifact.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::tree::{ConstructTree, NodeId, NodeKind, TreeError, TreeNode};

pub const TREE_FILE: &str = "tree.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Attribute carrying the CloudFormation type of a resource node
pub const CFN_TYPE_ATTRIBUTE: &str = "aws:cdk:cloudformation:type";

/// Artifact type of a CloudFormation stack in `manifest.json`
pub const STACK_ARTIFACT_TYPE: &str = "aws:cloudformation:stack";

/// Artifact type linking a nested assembly (one per `Stage`)
pub const NESTED_ASSEMBLY_ARTIFACT_TYPE: &str = "cdk:cloud-assembly";

const SUPPORTED_TREE_VERSION: &str = "tree-0.1";

/// Construct classes (by fully qualified name suffix) that are stacks
const STACK_FQN_SUFFIXES: &[&str] = &[".Stack", ".NestedStack"];

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid construct tree: {0}")]
    Tree(#[from] TreeError),
}

#[derive(Debug, Deserialize)]
struct TreeManifest {
    #[serde(default)]
    version: Option<String>,
    tree: TreeEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeEntry {
    id: String,
    #[serde(default)]
    children: IndexMap<String, TreeEntry>,
    #[serde(default)]
    attributes: Option<Map<String, Value>>,
    #[serde(default)]
    construct_info: Option<ConstructInfo>,
}

#[derive(Debug, Deserialize)]
struct ConstructInfo {
    fqn: String,
}

impl TreeEntry {
    fn kind(&self) -> NodeKind {
        let resource_type = self
            .attributes
            .as_ref()
            .and_then(|attrs| attrs.get(CFN_TYPE_ATTRIBUTE))
            .and_then(Value::as_str);
        if let Some(resource_type) = resource_type {
            return NodeKind::Resource {
                resource_type: resource_type.to_string(),
            };
        }
        let is_stack = self.construct_info.as_ref().is_some_and(|info| {
            STACK_FQN_SUFFIXES
                .iter()
                .any(|suffix| info.fqn.ends_with(suffix))
        });
        if is_stack {
            NodeKind::Stack
        } else {
            NodeKind::Construct
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssemblyManifest {
    #[serde(default)]
    artifacts: IndexMap<String, Artifact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    #[serde(rename = "type")]
    artifact_type: String,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    properties: Option<ArtifactProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactProperties {
    #[serde(default)]
    directory_name: Option<String>,
}

impl AssemblyManifest {
    /// Directories of the nested assemblies, relative to this manifest
    fn nested_assemblies(&self) -> impl Iterator<Item = &str> {
        self.artifacts
            .values()
            .filter(|artifact| artifact.artifact_type == NESTED_ASSEMBLY_ARTIFACT_TYPE)
            .filter_map(|artifact| artifact.properties.as_ref()?.directory_name.as_deref())
    }
}

/// Load the construct tree of the cloud assembly in `dir`
pub fn load_assembly(dir: &Path) -> Result<ConstructTree, AssemblyError> {
    let tree_json = read_file(&dir.join(TREE_FILE))?;
    let mut tree = tree_from_json(&tree_json, None)?;
    load_manifest(&mut tree, dir)?;
    Ok(tree)
}

/// Apply the stack dependencies of `dir/manifest.json` and of every nested
/// assembly below it
fn load_manifest(tree: &mut ConstructTree, dir: &Path) -> Result<(), AssemblyError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let manifest_json = match fs::read_to_string(&manifest_path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %manifest_path.display(), "no assembly manifest, stacks have no dependencies");
            return Ok(());
        }
        Err(source) => {
            return Err(AssemblyError::Io {
                path: manifest_path,
                source,
            })
        }
    };
    let assembly: AssemblyManifest =
        parse(&manifest_path.display().to_string(), &manifest_json)?;
    apply_dependencies(tree, &assembly)?;

    for directory in assembly.nested_assemblies() {
        // Nested assemblies always live below their parent
        let is_subdirectory = Path::new(directory)
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !is_subdirectory {
            warn!(directory, "nested assembly outside its parent, ignoring");
            continue;
        }
        debug!(directory, "loading nested assembly manifest");
        load_manifest(tree, &dir.join(directory))?;
    }
    Ok(())
}

/// Build a construct tree from the contents of `tree.json` and, optionally,
/// `manifest.json`
pub fn tree_from_json(
    tree_json: &str,
    manifest_json: Option<&str>,
) -> Result<ConstructTree, AssemblyError> {
    let manifest: TreeManifest = parse(TREE_FILE, tree_json)?;
    match manifest.version.as_deref() {
        Some(SUPPORTED_TREE_VERSION) | None => {}
        Some(other) => warn!(version = other, "unrecognized tree.json version, loading anyway"),
    }

    let mut tree = ConstructTree::new();
    let root = tree.root();
    for (id, entry) in &manifest.tree.children {
        add_entry(&mut tree, root, id, entry)?;
    }

    if let Some(manifest_json) = manifest_json {
        let assembly: AssemblyManifest = parse(MANIFEST_FILE, manifest_json)?;
        apply_dependencies(&mut tree, &assembly)?;
    }
    Ok(tree)
}

fn add_entry(
    tree: &mut ConstructTree,
    parent: NodeId,
    id: &str,
    entry: &TreeEntry,
) -> Result<(), AssemblyError> {
    if entry.id != id {
        warn!(key = id, id = %entry.id, "tree entry id differs from its key, using the key");
    }
    let node = tree.add_node(parent, id, entry.kind())?;
    for (child_id, child) in &entry.children {
        add_entry(tree, node, child_id, child)?;
    }
    Ok(())
}

fn apply_dependencies(
    tree: &mut ConstructTree,
    assembly: &AssemblyManifest,
) -> Result<(), AssemblyError> {
    let lookup: &ConstructTree = tree;
    let stacks: IndexMap<&str, NodeId> = assembly
        .artifacts
        .iter()
        .filter(|(_, artifact)| artifact.artifact_type == STACK_ARTIFACT_TYPE)
        .filter_map(|(artifact_id, artifact)| {
            let node = resolve_stack(lookup, artifact_id, artifact);
            if node.is_none() {
                warn!(artifact = %artifact_id, "stack artifact has no matching construct, ignoring");
            }
            node.map(|node| (artifact_id.as_str(), node))
        })
        .collect();

    for (artifact_id, &stack) in &stacks {
        for dependency in &assembly.artifacts[*artifact_id].dependencies {
            // Asset manifests and other non-stack artifacts are not cross-stack references
            if let Some(&target) = stacks.get(dependency.as_str()) {
                tree.add_stack_dependency(stack, target, None)?;
            }
        }
    }
    Ok(())
}

/// The display name is the stack's construct path. Artifact ids only match
/// by name, and only when a single stack carries it: stacks in different
/// stages may share an id.
fn resolve_stack(tree: &ConstructTree, artifact_id: &str, artifact: &Artifact) -> Option<NodeId> {
    let is_stack = |node: &TreeNode<'_>| *node.kind() == NodeKind::Stack;
    if let Some(path) = artifact.display_name.as_deref() {
        return tree
            .find(path)
            .and_then(|id| tree.node(id))
            .filter(is_stack)
            .map(|node| node.id());
    }
    let mut named = tree
        .walk()
        .filter(|node| is_stack(node) && node.name() == artifact_id);
    match (named.next(), named.next()) {
        (Some(node), None) => Some(node.id()),
        _ => None,
    }
}

fn read_file(path: &Path) -> Result<String, AssemblyError> {
    fs::read_to_string(path).map_err(|source| AssemblyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<'de, T: Deserialize<'de>>(file: &str, contents: &'de str) -> Result<T, AssemblyError> {
    serde_json::from_str(contents).map_err(|source| AssemblyError::Json {
        file: file.to_string(),
        source,
    })
}

//! Cross-stack dependency registry

use indexmap::IndexMap;

/// Why one stack depends on another: a construct in the consuming stack
/// referencing a construct in the producing stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReason {
    /// Path of the referencing construct
    pub source: String,
    /// Path of the referenced construct
    pub target: String,
}

impl DependencyReason {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A dependency on one other stack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackDependency {
    pub reasons: Vec<DependencyReason>,
}

/// Dependencies of a stack on other stacks, keyed by the depended-upon stack
/// name and kept in the order they were first recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackDependencies {
    entries: IndexMap<String, StackDependency>,
}

impl StackDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dependency on `stack`.
    ///
    /// A stack that is already present keeps its position; the reason, if any,
    /// is appended to it.
    pub fn record(&mut self, stack: impl Into<String>, reason: Option<DependencyReason>) {
        let entry = self.entries.entry(stack.into()).or_default();
        if let Some(reason) = reason {
            if !entry.reasons.contains(&reason) {
                entry.reasons.push(reason);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Name of the first stack depended upon, in insertion order
    pub fn first_key(&self) -> Option<&str> {
        self.entries.keys().next().map(String::as_str)
    }

    pub fn get(&self, stack: &str) -> Option<&StackDependency> {
        self.entries.get(stack)
    }

    /// Depended-upon stacks with their reasons, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StackDependency)> {
        self.entries.iter().map(|(stack, dep)| (stack.as_str(), dep))
    }
}

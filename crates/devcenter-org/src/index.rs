//! Repository ownership index
//!
//! Provides [`RepositoryIndex`] so fact ingestion can find every node that
//! claims a repository without walking the tree per row.

use std::collections::HashMap;

use devcenter_model::RepositoryId;

use crate::organization::NodeId;

/// Map of repository identity to the nodes that claim it
///
/// Owner lists keep traversal order, and a node appears at most once per
/// repository even if it lists the repository twice.
#[derive(Debug, Clone, Default)]
pub struct RepositoryIndex {
    owners: HashMap<RepositoryId, Vec<NodeId>>,
}

impl RepositoryIndex {
    /// Create empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `node` claims `id`
    pub fn insert(&mut self, id: RepositoryId, node: NodeId) {
        let owners = self.owners.entry(id).or_default();
        if !owners.contains(&node) {
            owners.push(node);
        }
    }

    /// Nodes claiming `id`; empty if none does
    #[must_use]
    pub fn get(&self, id: &RepositoryId) -> &[NodeId] {
        self.owners.get(id).map_or(&[], Vec::as_slice)
    }

    /// Whether any node claims `id`
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &RepositoryId) -> bool {
        self.owners.contains_key(id)
    }

    /// Number of distinct repositories
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether no repository is indexed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Iterate over distinct repositories
    pub fn repositories(&self) -> impl Iterator<Item = &RepositoryId> {
        self.owners.keys()
    }
}

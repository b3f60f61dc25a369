//! Organization trees
//!
//! An [`Organization<T>`] is an arena of named nodes. Nodes own their
//! children by id and refer to their parent by id only, so walking up for
//! path reconstruction never involves ownership cycles. Every repository
//! reference carries a materialized value of type `T`: `()` for a plain
//! hierarchy, a per-repository accumulator once rematerialized.

use devcenter_model::RepositoryId;

use crate::error::OrgError;
use crate::index::RepositoryIndex;
use crate::path::OrgPath;

/// Index of a node within its tree
///
/// Ids are stable across [`Organization::rematerialize`], but a path is the
/// portable way to address a node in a different tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A repository referenced by an organization, with its materialized slot
#[derive(Debug, Clone, PartialEq)]
pub struct RepositorySpec<T> {
    id: RepositoryId,
    materialized: T,
}

impl<T> RepositorySpec<T> {
    /// Create new reference
    #[inline]
    #[must_use]
    pub fn new(id: RepositoryId, materialized: T) -> Self {
        Self { id, materialized }
    }

    /// Repository identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> &RepositoryId {
        &self.id
    }

    /// Attached value
    #[inline]
    #[must_use]
    pub fn materialized(&self) -> &T {
        &self.materialized
    }

    /// Attached value, mutably
    #[inline]
    pub fn materialized_mut(&mut self) -> &mut T {
        &mut self.materialized
    }
}

impl RepositorySpec<()> {
    /// Reference without a materialized value
    #[inline]
    #[must_use]
    pub fn unmaterialized(id: RepositoryId) -> Self {
        Self::new(id, ())
    }
}

/// One node of the tree
#[derive(Debug, Clone)]
pub struct OrgNode<T> {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    repositories: Vec<RepositorySpec<T>>,
}

impl<T> OrgNode<T> {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            repositories: Vec::new(),
        }
    }

    /// Node name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent id, `None` for the root
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in insertion order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Repositories this node claims directly
    #[inline]
    #[must_use]
    pub fn repositories(&self) -> &[RepositorySpec<T>] {
        &self.repositories
    }

    /// Directly claimed repository with the given identity
    #[must_use]
    pub fn repository(&self, id: &RepositoryId) -> Option<&RepositorySpec<T>> {
        self.repositories.iter().find(|r| r.id() == id)
    }

    /// Directly claimed repository with the given identity, mutably
    pub fn repository_mut(&mut self, id: &RepositoryId) -> Option<&mut RepositorySpec<T>> {
        self.repositories.iter_mut().find(|r| r.id() == id)
    }
}

/// A tree of organizations
#[derive(Debug, Clone)]
pub struct Organization<T> {
    nodes: Vec<OrgNode<T>>,
    conceptual_root: bool,
}

impl<T> Organization<T> {
    /// Tree whose root is a real organization, part of every path
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![OrgNode::new(root_name.into(), None)],
            conceptual_root: false,
        }
    }

    /// Tree whose root is a synthetic "all repositories" node
    ///
    /// The root's name never appears in paths.
    #[must_use]
    pub fn conceptual(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![OrgNode::new(root_name.into(), None)],
            conceptual_root: true,
        }
    }

    /// Root node id
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Whether the root is a synthetic sentinel
    #[inline]
    #[must_use]
    pub fn is_conceptual_root(&self) -> bool {
        self.conceptual_root
    }

    /// Number of organizations, root included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id
    ///
    /// # Panics
    /// Panics if `id` belongs to a tree of a different shape.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &OrgNode<T> {
        &self.nodes[id.0]
    }

    /// Node by id, mutably
    ///
    /// # Panics
    /// Panics if `id` belongs to a tree of a different shape.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut OrgNode<T> {
        &mut self.nodes[id.0]
    }

    /// Add a new child organization
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(OrgNode::new(name.into(), Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Existing child with this name, or a new one
    pub fn ensure_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        match self.find_child(parent, name) {
            Some(id) => id,
            None => self.add_child(parent, name),
        }
    }

    /// Attach a repository to an organization
    ///
    /// The same repository may be attached to any number of organizations.
    pub fn add_repository(&mut self, node: NodeId, repository: RepositorySpec<T>) {
        self.nodes[node.0].repositories.push(repository);
    }

    fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|c| self.nodes[c.0].name == name)
    }

    /// Resolve a node by child names, starting at `from`
    ///
    /// # Errors
    /// Returns [`OrgError::NotFound`] if any segment is absent.
    pub fn child<S: AsRef<str>>(&self, from: NodeId, segments: &[S]) -> Result<NodeId, OrgError> {
        let mut current = from;
        for (i, segment) in segments.iter().enumerate() {
            current = self.find_child(current, segment.as_ref()).ok_or_else(|| {
                let mut missing = self.path_to(from);
                for s in &segments[..=i] {
                    missing = missing.child(s.as_ref());
                }
                OrgError::not_found(missing)
            })?;
        }
        Ok(current)
    }

    /// Path from the conceptual root to `id`
    ///
    /// Includes the root's name unless the root is a synthetic sentinel.
    #[must_use]
    pub fn path_to(&self, id: NodeId) -> OrgPath {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            if node.parent.is_some() || !self.conceptual_root {
                names.push(node.name.clone());
            }
            current = node.parent;
        }
        names.reverse();
        OrgPath::new(names)
    }

    /// Inverse of [`path_to`](Self::path_to), usable with paths from other trees
    ///
    /// # Errors
    /// Returns [`OrgError::NotFound`] if the path does not exist here.
    pub fn resolve(&self, path: &OrgPath) -> Result<NodeId, OrgError> {
        if self.conceptual_root {
            return self.child(self.root(), path.segments());
        }

        match path.segments().split_first() {
            Some((first, rest)) if *first == self.nodes[0].name => self.child(self.root(), rest),
            _ => Err(OrgError::not_found(path.clone())),
        }
    }

    /// Pre-order iterator over `start` and all of its descendants
    #[must_use]
    pub fn subtree(&self, start: NodeId) -> Subtree<'_, T> {
        Subtree {
            tree: self,
            stack: vec![start],
        }
    }

    /// Visit every organization once, depth-first, parent before children
    pub fn for_each_organization<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeId, &OrgNode<T>),
    {
        for id in self.subtree(self.root()) {
            visitor(id, &self.nodes[id.0]);
        }
    }

    /// Same-shaped tree with a freshly built value for every repository reference
    ///
    /// `factory` sees the owning node and the original reference, so the new
    /// value may depend on either.
    pub fn rematerialize<U, F>(&self, mut factory: F) -> Organization<U>
    where
        F: FnMut(&OrgNode<T>, &RepositorySpec<T>) -> U,
    {
        let nodes = self
            .nodes
            .iter()
            .map(|node| OrgNode {
                name: node.name.clone(),
                parent: node.parent,
                children: node.children.clone(),
                repositories: node
                    .repositories
                    .iter()
                    .map(|repo| RepositorySpec::new(repo.id.clone(), factory(node, repo)))
                    .collect(),
            })
            .collect();

        Organization {
            nodes,
            conceptual_root: self.conceptual_root,
        }
    }

    /// Map of repository identity to every node that claims it
    ///
    /// Built with a single traversal.
    #[must_use]
    pub fn repository_index(&self) -> RepositoryIndex {
        let mut index = RepositoryIndex::new();
        self.for_each_organization(|id, node| {
            for repo in &node.repositories {
                index.insert(repo.id.clone(), id);
            }
        });
        index
    }

    /// Total repository references, counting duplicates across nodes
    #[must_use]
    pub fn repository_reference_count(&self) -> usize {
        self.nodes.iter().map(|n| n.repositories.len()).sum()
    }
}

/// Pre-order traversal over a subtree
///
/// Created by [`Organization::subtree`].
#[derive(Debug)]
pub struct Subtree<'a, T> {
    tree: &'a Organization<T>,
    stack: Vec<NodeId>,
}

impl<T> Iterator for Subtree<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.nodes[id.0].children.iter().rev().copied());
        Some(id)
    }
}

/// Fluent construction of unmaterialized trees
///
/// # Example
/// ```rust
/// use devcenter_model::RepositoryId;
/// use devcenter_org::OrganizationBuilder;
///
/// let tree = OrganizationBuilder::conceptual("ALL")
///     .with_child("OrgX", |x| x.with_repository(RepositoryId::without_branch("github.com", "a/r")))
///     .with_child("OrgY", |y| y.with_repository(RepositoryId::without_branch("github.com", "a/r")))
///     .build();
///
/// assert_eq!(tree.len(), 3);
/// ```
#[derive(Debug)]
pub struct OrganizationBuilder {
    tree: Organization<()>,
    current: NodeId,
}

impl OrganizationBuilder {
    /// Builder for a tree with a real root
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        let tree = Organization::new(root_name);
        let current = tree.root();
        Self { tree, current }
    }

    /// Builder for a tree with a synthetic root
    #[must_use]
    pub fn conceptual(root_name: impl Into<String>) -> Self {
        let tree = Organization::conceptual(root_name);
        let current = tree.root();
        Self { tree, current }
    }

    /// Attach a repository to the current organization
    #[must_use]
    pub fn with_repository(mut self, id: RepositoryId) -> Self {
        self.tree
            .add_repository(self.current, RepositorySpec::unmaterialized(id));
        self
    }

    /// Add a child organization and populate it
    #[must_use]
    pub fn with_child<F>(mut self, name: impl Into<String>, populate: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let parent = self.current;
        self.current = self.tree.add_child(parent, name);
        let mut populated = populate(self);
        populated.current = parent;
        populated
    }

    /// Finish the tree
    #[must_use]
    pub fn build(self) -> Organization<()> {
        self.tree
    }
}

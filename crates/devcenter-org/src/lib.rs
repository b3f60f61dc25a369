//! DevCenter Organizations
//!
//! Organization hierarchies whose repository references carry a
//! materialized value per node.
//!
//! # Overview
//!
//! - **Organization**: arena tree of named nodes, parent before children
//! - **OrgPath**: names from the conceptual root, portable between trees
//! - **RepositoryIndex**: repository identity to owning nodes
//! - **OrganizationReader**: `repos.csv` ingestion
//!
//! # Example
//!
//! ```rust
//! use devcenter_model::RepositoryId;
//! use devcenter_org::{OrgPath, OrganizationBuilder};
//!
//! let tree = OrganizationBuilder::new("Default")
//!     .with_child("payments", |p| {
//!         p.with_repository(RepositoryId::without_branch("github.com", "acme/ledger"))
//!     })
//!     .build();
//!
//! let path: OrgPath = "Default/payments".parse().unwrap();
//! let node = tree.resolve(&path).unwrap();
//! assert_eq!(tree.node(node).repositories().len(), 1);
//!
//! // Attach a counter to every repository reference
//! let counted = tree.rematerialize(|_, _| 0u32);
//! assert_eq!(counted.repository_reference_count(), 1);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod index;
pub mod organization;
pub mod path;
pub mod reader;

// Re-exports
pub use error::OrgError;
pub use index::RepositoryIndex;
pub use organization::{
    NodeId, OrgNode, Organization, OrganizationBuilder, RepositorySpec, Subtree,
};
pub use path::OrgPath;
pub use reader::{OrganizationReader, ALL_ORGANIZATIONS};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with organization trees
    pub use crate::{
        NodeId, OrgError, OrgNode, OrgPath, Organization, OrganizationBuilder,
        OrganizationReader, RepositorySpec,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

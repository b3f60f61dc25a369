//! DevCenter Results
//!
//! Replays per-repository facts onto an organization tree and reduces any
//! organization to counts per card and measure.
//!
//! - Facts arrive as CSV ([`DevCenterResultReducer::from_csv`]) or as
//!   in-process scan outcomes ([`DevCenterResultReducer::from_scans`])
//! - Every distinct repository counts once per reduction, however many
//!   organizations under the reduced node claim it
//! - Every declared measure has a bucket, zeros included
//!
//! # Example
//!
//! ```rust
//! use devcenter_model::{Card, DevCenter, RepositoryId};
//! use devcenter_org::OrganizationBuilder;
//! use devcenter_result::DevCenterResultReducer;
//!
//! let devcenter = DevCenter::builder()
//!     .card(
//!         Card::builder("Java")
//!             .measure("Java 8+", "")
//!             .measure("Java 11+", "")
//!             .measure("Completed", "")
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let repo = RepositoryId::without_branch("github.com", "acme/ledger");
//! let tree = OrganizationBuilder::new("root")
//!     .with_child("OrgX", |x| x.with_repository(repo.clone()))
//!     .with_child("OrgY", |y| y.with_repository(repo.clone()))
//!     .build();
//!
//! let mut csv = "repositoryOrigin,repositoryPath,repositoryBranch,card,ordinal\n\
//!                github.com,acme/ledger,,Java,2\n"
//!     .as_bytes();
//! let reducer = DevCenterResultReducer::from_csv(devcenter, &tree, Some(&mut csv), None).unwrap();
//!
//! let result = reducer.reduce(&tree, tree.root()).unwrap();
//! assert_eq!(result.by_card("Java").unwrap().count(2), Some(1));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod reader;
pub mod reducer;
pub mod repository;
pub mod result;

// Re-exports
pub use error::DevCenterError;
pub use reader::{OrganizationStatisticsReader, SecurityIssuesReader, UpgradesAndMigrationsReader};
pub use reducer::DevCenterResultReducer;
pub use repository::RepositoryResult;
pub use result::{ByMeasure, CardSummary, DevCenterResult, MeasureCount, ResultSummary};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building and querying reductions
    pub use crate::{ByMeasure, DevCenterError, DevCenterResult, DevCenterResultReducer};
    pub use devcenter_model::{Card, DevCenter, Measure, RepositoryId};
    pub use devcenter_org::{OrgPath, Organization, OrganizationBuilder};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

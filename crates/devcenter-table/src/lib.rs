//! DevCenter Tables
//!
//! Per-repository fact recording with a worst-state-wins merge policy.
//!
//! # Overview
//!
//! - **merge_decision**: the insert policy, a pure function over two rows
//! - **UpgradesAndMigrations**: at most one retained fact per card
//! - **SecurityIssues**: every security occurrence
//! - **ScanSession**: catalog-validated recording for one repository
//! - **Writers**: CSV export in the layout the reducer reads back
//!
//! # Example
//!
//! ```rust
//! use devcenter_model::{measures::SemverMeasure, Card, DevCenter, RepositoryId};
//! use devcenter_table::ScanSession;
//!
//! let devcenter = DevCenter::builder()
//!     .card(Card::builder("Move to Jackson 3").measures(SemverMeasure::ALL).build())
//!     .build()
//!     .unwrap();
//!
//! let session = ScanSession::new(devcenter, RepositoryId::without_branch("github.com", "acme/ledger"));
//! session.record_measure("Move to Jackson 3", &SemverMeasure::Major, Some("2.12.3")).unwrap();
//! session.record_measure("Move to Jackson 3", &SemverMeasure::Major, Some("2.10.0")).unwrap();
//! session.record_measure("Move to Jackson 3", &SemverMeasure::Minor, Some("2.9.0")).unwrap();
//!
//! let outcome = session.finish();
//! assert_eq!(outcome.rows.len(), 1);
//! assert_eq!(outcome.rows[0].detail(), Some("2.10.0"));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod row;
pub mod security;
pub mod session;
pub mod upgrades;
pub mod writer;

// Re-exports
pub use error::TableError;
pub use row::{merge_decision, InsertOutcome, SecurityIssueRow, UpgradeRow};
pub use security::SecurityIssues;
pub use session::{ScanOutcome, ScanSession};
pub use upgrades::UpgradesAndMigrations;
pub use writer::{
    OrganizationStatisticsWriter, SecurityIssuesWriter, UpgradesAndMigrationsWriter,
    ORGANIZATION_STATISTICS_HEADERS, SECURITY_ISSUES_HEADERS, UPGRADES_AND_MIGRATIONS_HEADERS,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

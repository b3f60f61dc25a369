//! DevCenter Model
//!
//! Cards, their ordered measures, and the catalog they are tracked in.
//!
//! # Core Concepts
//!
//! - [`Measure`]: one ordinal-ordered progress state; the last one is "completed"
//! - [`Card`]: a trackable migration or security topic with its measures
//! - [`DevCenter`]: the validated catalog of cards, assembled by explicit registration
//! - [`RepositoryId`]: repository identity used to join facts to organizations
//! - [`Version`]: lenient latest-release version ordering
//!
//! # Example
//!
//! ```rust
//! use devcenter_model::{Card, DevCenter, measures::SemverMeasure};
//!
//! let devcenter = DevCenter::builder()
//!     .card(
//!         Card::builder("Move to Spring Boot 3.5.0")
//!             .measures(SemverMeasure::ALL)
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let card = devcenter.card("Move to Spring Boot 3.5.0").unwrap();
//! assert_eq!(card.measure(1).unwrap().name(), "Minor");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod card;
mod devcenter;
mod error;
mod measure;
mod repository;
mod version;

pub mod config;
pub mod measures;

// Re-exports
pub use card::{Aggregation, Card, CardBuilder};
pub use config::DevCenterConfig;
pub use devcenter::{DevCenter, DevCenterBuilder};
pub use error::ModelError;
pub use measure::{DevCenterMeasure, Measure};
pub use repository::RepositoryId;
pub use version::{compare_versions, Version};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Built-in measure sets
//!
//! Each set is a plain enum implementing [`DevCenterMeasure`](crate::DevCenterMeasure)
//! in declared order, so registering `ALL` (or a configured subset) on a
//! card yields dense ordinals.

mod build_tool;
mod java;
mod junit;
mod semver;

pub use build_tool::BuildToolMeasure;
pub use java::JavaVersionMeasure;
pub use junit::{JUnitJupiterMeasure, JUnitMeasure};
pub use semver::SemverMeasure;

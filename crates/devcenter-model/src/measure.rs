//! Measures: ordered progress states of a card
//!
//! Provides [`Measure`], the concrete state value stored in results, and
//! [`DevCenterMeasure`], the trait that measure enums implement so a card
//! can be assembled from them.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Anything that can be registered as one measure of a card
///
/// Ordinals are not part of the trait: a card assigns them by position when
/// the measures are registered, so the same enum can back several cards with
/// different configured subsets.
pub trait DevCenterMeasure {
    /// Display name, also the `value` written to fact tables
    fn name(&self) -> &str;

    /// Markdown description shown alongside the measure
    fn description(&self) -> &str;
}

/// One progress state within a card
///
/// Lower ordinals are less progressed. The final measure of a card always
/// denotes completion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measure {
    name: String,
    description: String,
    ordinal: usize,
}

impl Measure {
    /// Create a measure at a given position
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ordinal,
        }
    }

    /// Create from a registered measure value
    #[inline]
    #[must_use]
    pub fn from_measure<M: DevCenterMeasure + ?Sized>(measure: &M, ordinal: usize) -> Self {
        Self::new(measure.name(), measure.description(), ordinal)
    }

    /// Display name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Zero-based position within the owning card
    #[inline]
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

impl DevCenterMeasure for Measure {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl PartialOrd for Measure {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Measure {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal
            .cmp(&other.ordinal)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl Display for Measure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

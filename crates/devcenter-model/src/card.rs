//! Cards: trackable migration and security topics
//!
//! A [`Card`] is an immutable value identified by its display name. It owns
//! the ordered list of [`Measure`]s configured for it and knows how its
//! facts aggregate (one per repository, or counted per occurrence).

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::measure::{DevCenterMeasure, Measure};

/// How a card's facts roll up across repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Aggregation {
    /// Each repository contributes at most one measure
    #[default]
    PerRepository,

    /// Each repository contributes a count per measure (security findings)
    PerOccurrence,
}

#[derive(Debug)]
struct CardData {
    name: String,
    description: String,
    fix_recipe_id: Option<String>,
    target: Option<String>,
    measures: Vec<Measure>,
    aggregation: Aggregation,
}

/// One trackable topic
///
/// Cloning is cheap; equality and hashing use the name only, since names
/// are unique within a catalog.
#[derive(Debug, Clone)]
pub struct Card(Arc<CardData>);

impl Card {
    /// Start building a card
    #[inline]
    #[must_use]
    pub fn builder(name: impl Into<String>) -> CardBuilder {
        CardBuilder::new(name)
    }

    /// Display name, the join key used by fact tables
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.0.description
    }

    /// Recipe that moves repositories towards completion, if any
    #[inline]
    #[must_use]
    pub fn fix_recipe_id(&self) -> Option<&str> {
        self.0.fix_recipe_id.as_deref()
    }

    /// Version the card moves repositories towards, if it has one
    ///
    /// Detection code classifies a repository against this, for example
    /// with [`SemverMeasure::classify`](crate::measures::SemverMeasure::classify).
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.0.target.as_deref()
    }

    /// Configured measures in ordinal order
    #[inline]
    #[must_use]
    pub fn measures(&self) -> &[Measure] {
        &self.0.measures
    }

    /// Aggregation mode
    #[inline]
    #[must_use]
    pub fn aggregation(&self) -> Aggregation {
        self.0.aggregation
    }

    /// Whether facts for this card are counted per occurrence
    #[inline]
    #[must_use]
    pub fn is_per_occurrence(&self) -> bool {
        self.0.aggregation == Aggregation::PerOccurrence
    }

    /// Measure at `ordinal`
    ///
    /// # Errors
    /// Returns [`ModelError::OrdinalOutOfRange`] when the ordinal does not
    /// index into this card's measures. Out-of-range ordinals indicate
    /// corrupted data and are never clamped.
    pub fn measure(&self, ordinal: usize) -> Result<&Measure, ModelError> {
        self.0
            .measures
            .get(ordinal)
            .ok_or_else(|| ModelError::OrdinalOutOfRange {
                card: self.0.name.clone(),
                ordinal,
                measures: self.0.measures.len(),
            })
    }

    /// Position of the named measure within this card's configured subset
    #[must_use]
    pub fn ordinal(&self, measure_name: &str) -> Option<usize> {
        self.0.measures.iter().position(|m| m.name() == measure_name)
    }

    /// Position of a registered measure value within this card
    #[inline]
    #[must_use]
    pub fn ordinal_of<M: DevCenterMeasure + ?Sized>(&self, measure: &M) -> Option<usize> {
        self.ordinal(measure.name())
    }

    /// The terminal measure, denoting completion
    #[inline]
    #[must_use]
    pub fn completed(&self) -> Option<&Measure> {
        self.0.measures.last()
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Builder for [`Card`]
#[derive(Debug, Clone)]
pub struct CardBuilder {
    name: String,
    description: String,
    fix_recipe_id: Option<String>,
    target: Option<String>,
    measures: Vec<Measure>,
    aggregation: Aggregation,
}

impl CardBuilder {
    /// Create new builder
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            fix_recipe_id: None,
            target: None,
            measures: Vec::new(),
            aggregation: Aggregation::PerRepository,
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With fix recipe
    #[inline]
    #[must_use]
    pub fn fix_recipe_id(mut self, fix_recipe_id: impl Into<String>) -> Self {
        self.fix_recipe_id = Some(fix_recipe_id.into());
        self
    }

    /// With an optional fix recipe
    #[inline]
    #[must_use]
    pub fn maybe_fix_recipe_id(mut self, fix_recipe_id: Option<String>) -> Self {
        self.fix_recipe_id = fix_recipe_id;
        self
    }

    /// With target version
    #[inline]
    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// With aggregation mode
    #[inline]
    #[must_use]
    pub fn aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Append one measure; its ordinal is the next position
    #[must_use]
    pub fn measure(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        let ordinal = self.measures.len();
        self.measures.push(Measure::new(name, description, ordinal));
        self
    }

    /// Append measure values in order
    #[must_use]
    pub fn measures<M, I>(mut self, measures: I) -> Self
    where
        M: DevCenterMeasure,
        I: IntoIterator<Item = M>,
    {
        for m in measures {
            let ordinal = self.measures.len();
            self.measures.push(Measure::from_measure(&m, ordinal));
        }
        self
    }

    /// Finish the card
    #[must_use]
    pub fn build(self) -> Card {
        Card(Arc::new(CardData {
            name: self.name,
            description: self.description,
            fix_recipe_id: self.fix_recipe_id,
            target: self.target,
            measures: self.measures,
            aggregation: self.aggregation,
        }))
    }
}

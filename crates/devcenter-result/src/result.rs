//! Reduced card counts
//!
//! A [`DevCenterResult`] is what rendering code consumes: cards in catalog
//! order, each with a count for every declared measure.

use std::collections::BTreeMap;

use devcenter_model::{Aggregation, Card, Measure};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DevCenterError;

/// Counts for one card, ordered by ordinal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByMeasure {
    counts: BTreeMap<Measure, u32>,
}

impl ByMeasure {
    /// Zero count for every measure
    #[must_use]
    pub fn new(measures: &[Measure]) -> Self {
        Self {
            counts: measures.iter().map(|m| (m.clone(), 0)).collect(),
        }
    }

    /// Add to a measure's count
    ///
    /// Measures not declared on construction are ignored.
    pub fn add(&mut self, measure: &Measure, count: u32) {
        if let Some(current) = self.counts.get_mut(measure) {
            *current += count;
        }
    }

    /// Count for a measure
    #[must_use]
    pub fn get(&self, measure: &Measure) -> Option<u32> {
        self.counts.get(measure).copied()
    }

    /// Count for the measure at `ordinal`
    #[must_use]
    pub fn count(&self, ordinal: usize) -> Option<u32> {
        self.counts
            .iter()
            .find(|(m, _)| m.ordinal() == ordinal)
            .map(|(_, c)| *c)
    }

    /// Sum of all counts
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Counts from least to most progressed
    pub fn iter(&self) -> impl Iterator<Item = (&Measure, u32)> {
        self.counts.iter().map(|(m, c)| (m, *c))
    }

    /// Number of measures
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the card declared no measures
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Counts for every tracked card under one organization
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DevCenterResult {
    by_card: IndexMap<Card, ByMeasure>,
    line_count: u64,
}

impl DevCenterResult {
    pub(crate) fn new(by_card: IndexMap<Card, ByMeasure>, line_count: u64) -> Self {
        Self { by_card, line_count }
    }

    /// Visit each measure of a card with its count, least progressed first
    ///
    /// # Errors
    /// Returns [`DevCenterError::NotFound`] if the card is not tracked.
    pub fn for_each<F>(&self, card: &Card, mut visitor: F) -> Result<(), DevCenterError>
    where
        F: FnMut(&Measure, u32),
    {
        let by_measure = self
            .by_card
            .get(card)
            .ok_or_else(|| DevCenterError::NotFound(format!("card '{}'", card.name())))?;
        for (measure, count) in by_measure.iter() {
            visitor(measure, count);
        }
        Ok(())
    }

    /// Counts for a card
    #[must_use]
    pub fn get(&self, card: &Card) -> Option<&ByMeasure> {
        self.by_card.get(card)
    }

    /// Counts for a card by display name
    #[must_use]
    pub fn by_card(&self, name: &str) -> Option<&ByMeasure> {
        self.by_card
            .iter()
            .find(|(card, _)| card.name() == name)
            .map(|(_, by_measure)| by_measure)
    }

    /// Sum over all measures of a card; zero if the card is not tracked
    #[must_use]
    pub fn total(&self, card: &Card) -> u32 {
        self.by_card.get(card).map_or(0, ByMeasure::total)
    }

    /// Lines of code over the distinct repositories reduced
    ///
    /// Repositories without statistics contribute nothing.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    /// Cards in catalog order
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.by_card.keys()
    }

    /// Cards with their counts, in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&Card, &ByMeasure)> {
        self.by_card.iter()
    }

    /// Number of cards
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_card.len()
    }

    /// Whether no card is tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_card.is_empty()
    }

    /// Plain view for serialization
    #[must_use]
    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            line_count: self.line_count,
            cards: self
                .by_card
                .iter()
                .map(|(card, by_measure)| CardSummary {
                    name: card.name().to_string(),
                    aggregation: card.aggregation(),
                    fix_recipe_id: card.fix_recipe_id().map(str::to_string),
                    total: by_measure.total(),
                    measures: by_measure
                        .iter()
                        .map(|(measure, count)| MeasureCount {
                            name: measure.name().to_string(),
                            ordinal: measure.ordinal(),
                            count,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Summary as pretty-printed JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, DevCenterError> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }
}

/// Serializable view of a [`DevCenterResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Lines of code over the distinct repositories reduced
    #[serde(default)]
    pub line_count: u64,

    /// Cards in catalog order
    pub cards: Vec<CardSummary>,
}

/// Serializable counts for one card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    /// Card display name
    pub name: String,

    /// How the counts were aggregated
    pub aggregation: Aggregation,

    /// Recipe that moves repositories forward, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_recipe_id: Option<String>,

    /// Sum of all measure counts
    pub total: u32,

    /// Counts, least progressed first
    pub measures: Vec<MeasureCount>,
}

/// Serializable count for one measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureCount {
    /// Measure display name
    pub name: String,

    /// Position within the card
    pub ordinal: usize,

    /// Repositories or occurrences
    pub count: u32,
}

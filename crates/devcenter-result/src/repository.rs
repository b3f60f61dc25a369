//! Per-repository results attached to materialized trees

use std::collections::HashMap;

use devcenter_model::{Card, Measure};

/// Facts recorded for one repository
///
/// A card with no recorded measure is "not applicable" for the repository
/// and contributes nothing when reduced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepositoryResult {
    upgrades_and_migrations: HashMap<Card, Measure>,
    security_issues: HashMap<Measure, u32>,
    line_count: Option<u64>,
}

impl RepositoryResult {
    /// Create empty result
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the measure a repository has for a card, replacing any earlier one
    pub fn record_upgrade(&mut self, card: Card, measure: Measure) {
        self.upgrades_and_migrations.insert(card, measure);
    }

    /// Count one security occurrence
    pub fn record_security_issue(&mut self, measure: Measure) {
        *self.security_issues.entry(measure).or_default() += 1;
    }

    /// Set the lines of code counted in the repository
    pub fn record_line_count(&mut self, lines: u64) {
        self.line_count = Some(lines);
    }

    /// Fold in facts recorded elsewhere for the same repository
    ///
    /// Upgrades and a line count from `other` replace those recorded here;
    /// security counts add up.
    pub fn merge(&mut self, other: &Self) {
        for (card, measure) in &other.upgrades_and_migrations {
            self.upgrades_and_migrations.insert(card.clone(), measure.clone());
        }
        for (measure, count) in &other.security_issues {
            *self.security_issues.entry(measure.clone()).or_default() += count;
        }
        if other.line_count.is_some() {
            self.line_count = other.line_count;
        }
    }

    /// Measure recorded for a card
    #[must_use]
    pub fn upgrade(&self, card: &Card) -> Option<&Measure> {
        self.upgrades_and_migrations.get(card)
    }

    /// Security occurrence counts by measure
    pub fn security_issues(&self) -> impl Iterator<Item = (&Measure, u32)> {
        self.security_issues.iter().map(|(m, c)| (m, *c))
    }

    /// Lines of code, if statistics were gathered
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> Option<u64> {
        self.line_count
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upgrades_and_migrations.is_empty()
            && self.security_issues.is_empty()
            && self.line_count.is_none()
    }
}

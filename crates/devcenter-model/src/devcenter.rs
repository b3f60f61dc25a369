//! The card catalog
//!
//! [`DevCenter`] is assembled once, through explicit registration on a
//! [`DevCenterBuilder`], and validated before any scanning begins.

use std::collections::HashMap;

use crate::card::{Aggregation, Card};
use crate::error::ModelError;

/// Validated set of tracked cards
///
/// Holds any number of migration cards (in registration order) and at most
/// one security card.
#[derive(Debug, Clone)]
pub struct DevCenter {
    upgrades_and_migrations: Vec<Card>,
    security: Option<Card>,
}

impl DevCenter {
    /// Start registering cards
    #[inline]
    #[must_use]
    pub fn builder() -> DevCenterBuilder {
        DevCenterBuilder::new()
    }

    /// Migration cards in registration order
    #[inline]
    #[must_use]
    pub fn upgrades_and_migrations(&self) -> &[Card] {
        &self.upgrades_and_migrations
    }

    /// The security card, if one is tracked
    #[inline]
    #[must_use]
    pub fn security(&self) -> Option<&Card> {
        self.security.as_ref()
    }

    /// All cards: migrations first, then security
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.upgrades_and_migrations.iter().chain(self.security.iter())
    }

    /// Look up a card by display name
    ///
    /// # Errors
    /// Returns [`ModelError::CardNotFound`] when no card has that name.
    pub fn card(&self, name: &str) -> Result<&Card, ModelError> {
        self.find_card(name)
            .ok_or_else(|| ModelError::CardNotFound(name.to_string()))
    }

    /// Look up a card by display name, if present
    #[must_use]
    pub fn find_card(&self, name: &str) -> Option<&Card> {
        self.cards().find(|card| card.name() == name)
    }

    /// Number of tracked cards
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.upgrades_and_migrations.len() + usize::from(self.security.is_some())
    }

    /// Always false for a validated catalog
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registers cards and validates the resulting catalog
#[derive(Debug, Default, Clone)]
pub struct DevCenterBuilder {
    upgrades_and_migrations: Vec<Card>,
    security: Vec<Card>,
    violations: Vec<String>,
}

impl DevCenterBuilder {
    /// Create new empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a migration card
    #[must_use]
    pub fn card(mut self, card: Card) -> Self {
        self.upgrades_and_migrations.push(card);
        self
    }

    /// Register the security card
    #[must_use]
    pub fn security(mut self, card: Card) -> Self {
        self.security.push(card);
        self
    }

    /// Record a violation found while preparing cards (e.g. from configuration)
    #[must_use]
    pub fn violation(mut self, message: impl Into<String>) -> Self {
        self.violations.push(message.into());
        self
    }

    /// Validate and build the catalog
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidConfiguration`] listing every problem:
    /// no cards at all, more than one security card, cards without
    /// measures, duplicate names, a migration card registered with
    /// per-occurrence aggregation, or violations recorded earlier.
    pub fn build(self) -> Result<DevCenter, ModelError> {
        let mut violations = self.violations;

        if self.upgrades_and_migrations.is_empty() && self.security.is_empty() {
            violations.push(
                "No cards included that provide upgrades and migrations or security advice."
                    .to_string(),
            );
        }
        if self.security.len() > 1 {
            violations.push("Only one security card can be included.".to_string());
        }

        for card in self.upgrades_and_migrations.iter().chain(&self.security) {
            if card.measures().is_empty() {
                violations.push(format!("Card '{}' declares no measures.", card.name()));
            }
        }
        for card in &self.upgrades_and_migrations {
            if card.aggregation() != Aggregation::PerRepository {
                violations.push(format!(
                    "Card '{}' must aggregate per repository.",
                    card.name()
                ));
            }
        }

        let mut count_by_name: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for card in self.upgrades_and_migrations.iter().chain(&self.security) {
            let count = count_by_name.entry(card.name()).or_insert(0);
            if *count == 0 {
                order.push(card.name());
            }
            *count += 1;
        }
        for name in order {
            if count_by_name[name] > 1 {
                violations.push(format!(
                    "Card names must be unique. The name '{name}' is included multiple times."
                ));
            }
        }

        if !violations.is_empty() {
            tracing::warn!(count = violations.len(), "card catalog failed validation");
            return Err(ModelError::InvalidConfiguration(violations));
        }

        let security = self.security.into_iter().next().map(|card| {
            if card.is_per_occurrence() {
                card
            } else {
                Card::builder(card.name())
                    .description(card.description())
                    .maybe_fix_recipe_id(card.fix_recipe_id().map(str::to_string))
                    .measures(card.measures().iter().cloned())
                    .aggregation(Aggregation::PerOccurrence)
                    .build()
            }
        });

        tracing::debug!(
            upgrades = self.upgrades_and_migrations.len(),
            security = security.is_some(),
            "card catalog validated"
        );

        Ok(DevCenter {
            upgrades_and_migrations: self.upgrades_and_migrations,
            security,
        })
    }
}

//! Upgrades and migrations fact sink
//!
//! Provides [`UpgradesAndMigrations`], the single table of upgrade facts for
//! one repository scan.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::row::{merge_decision, InsertOutcome, UpgradeRow};

/// Retained upgrade facts, at most one per card
///
/// Inserts for one card serialize on that card's map entry: the retained row
/// is read and replaced under the same lock, so concurrent detectors never
/// lose a worse state. Inserts for different cards do not contend.
#[derive(Debug, Default)]
pub struct UpgradesAndMigrations {
    rows: DashMap<String, UpgradeRow>,
}

impl UpgradesAndMigrations {
    /// Display name of the table
    pub const DISPLAY_NAME: &'static str = "Upgrades and migrations";

    /// Create empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a fact; it is kept only if it is worse than what is retained
    pub fn insert(&self, row: UpgradeRow) -> InsertOutcome {
        match self.rows.entry(row.card.clone()) {
            Entry::Vacant(vacant) => {
                tracing::trace!(card = %row.card, ordinal = row.ordinal, "fact inserted");
                vacant.insert(row);
                InsertOutcome::Inserted
            }
            Entry::Occupied(mut occupied) => {
                let outcome = merge_decision(Some(occupied.get()), &row);
                tracing::trace!(
                    card = %row.card,
                    ordinal = row.ordinal,
                    retained = occupied.get().ordinal,
                    ?outcome,
                    "fact offered"
                );
                if outcome == InsertOutcome::Replaced {
                    occupied.insert(row);
                }
                outcome
            }
        }
    }

    /// Retained fact for a card
    #[must_use]
    pub fn get(&self, card: &str) -> Option<UpgradeRow> {
        self.rows.get(card).map(|r| r.value().clone())
    }

    /// Number of cards with a retained fact
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no fact was retained
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Take the retained facts, in no particular order
    #[must_use]
    pub fn into_rows(self) -> Vec<UpgradeRow> {
        self.rows.into_iter().map(|(_, row)| row).collect()
    }
}

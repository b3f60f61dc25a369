//! Per-repository scan sessions
//!
//! A [`ScanSession`] is handed to whatever detects repository state. It owns
//! the one upgrades table and the one security table for that repository,
//! validates every fact against the catalog, and yields a [`ScanOutcome`]
//! when the scan is over.

use devcenter_model::{Card, DevCenter, DevCenterMeasure, RepositoryId};
use parking_lot::Mutex;

use crate::error::TableError;
use crate::row::{InsertOutcome, SecurityIssueRow, UpgradeRow};
use crate::security::SecurityIssues;
use crate::upgrades::UpgradesAndMigrations;

/// Fact recording for a single repository
///
/// `record_*` take `&self`, so detectors may run in parallel against one
/// session. Scans of different repositories use different sessions.
#[derive(Debug)]
pub struct ScanSession {
    devcenter: DevCenter,
    repository: RepositoryId,
    upgrades: UpgradesAndMigrations,
    security: SecurityIssues,
    line_count: Mutex<Option<u64>>,
}

/// Facts retained for one repository after its scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Scanned repository
    pub repository: RepositoryId,

    /// Retained upgrade facts, in card registration order
    pub rows: Vec<UpgradeRow>,

    /// Every security occurrence, in recording order
    pub security: Vec<SecurityIssueRow>,

    /// Lines of code counted, if statistics were gathered
    pub line_count: Option<u64>,
}

impl ScanSession {
    /// Start recording facts for `repository`
    #[must_use]
    pub fn new(devcenter: DevCenter, repository: RepositoryId) -> Self {
        tracing::debug!(repository = %repository, "scan session started");
        Self {
            devcenter,
            repository,
            upgrades: UpgradesAndMigrations::new(),
            security: SecurityIssues::new(),
            line_count: Mutex::new(None),
        }
    }

    /// Repository under scan
    #[inline]
    #[must_use]
    pub fn repository(&self) -> &RepositoryId {
        &self.repository
    }

    /// Catalog facts are validated against
    #[inline]
    #[must_use]
    pub fn devcenter(&self) -> &DevCenter {
        &self.devcenter
    }

    fn upgrade_card(&self, name: &str) -> Result<&Card, TableError> {
        let card = self.devcenter.card(name)?;
        if card.is_per_occurrence() {
            return Err(TableError::PerOccurrenceCard(name.to_string()));
        }
        Ok(card)
    }

    /// Offer an upgrade fact for a card
    ///
    /// # Errors
    /// Fails if the card is unknown, counts occurrences, or has no measure
    /// at `ordinal`. Nothing is recorded on failure.
    pub fn record_fact(
        &self,
        card: &str,
        ordinal: usize,
        value: impl Into<String>,
        detail: Option<&str>,
    ) -> Result<InsertOutcome, TableError> {
        let card = self.upgrade_card(card)?;
        card.measure(ordinal)?;

        let mut row = UpgradeRow::new(card.name(), ordinal, value);
        row.current_minimum_version = detail.map(str::to_string);
        Ok(self.upgrades.insert(row))
    }

    /// Offer a fact by measure, using the measure name as the value
    ///
    /// # Errors
    /// Fails as [`record_fact`](Self::record_fact) does, or with
    /// [`TableError::UnknownMeasure`] if the card was configured without it.
    pub fn record_measure<M: DevCenterMeasure + ?Sized>(
        &self,
        card: &str,
        measure: &M,
        detail: Option<&str>,
    ) -> Result<InsertOutcome, TableError> {
        let resolved = self.upgrade_card(card)?;
        let ordinal = resolved
            .ordinal_of(measure)
            .ok_or_else(|| TableError::UnknownMeasure {
                card: card.to_string(),
                measure: measure.name().to_string(),
            })?;
        self.record_fact(card, ordinal, measure.name(), detail)
    }

    /// Record one security finding
    ///
    /// # Errors
    /// Fails if the catalog has no security card or the ordinal is out of
    /// its range.
    pub fn record_security_issue(
        &self,
        ordinal: usize,
        issue_name: impl Into<String>,
    ) -> Result<(), TableError> {
        let card = self.devcenter.security().ok_or(TableError::NoSecurityCard)?;
        card.measure(ordinal)?;
        self.security.insert(SecurityIssueRow::new(ordinal, issue_name));
        Ok(())
    }

    /// Add lines of code counted in one or more source files
    pub fn record_line_count(&self, lines: u64) {
        let mut count = self.line_count.lock();
        *count = Some(count.unwrap_or(0).saturating_add(lines));
    }

    /// Currently retained fact for a card
    #[must_use]
    pub fn current(&self, card: &str) -> Option<UpgradeRow> {
        self.upgrades.get(card)
    }

    /// End the scan
    #[must_use]
    pub fn finish(self) -> ScanOutcome {
        let order = |row: &UpgradeRow| {
            self.devcenter
                .upgrades_and_migrations()
                .iter()
                .position(|c| c.name() == row.card)
                .unwrap_or(usize::MAX)
        };

        let mut rows = self.upgrades.into_rows();
        rows.sort_by_key(order);
        let security = self.security.into_rows();
        let line_count = self.line_count.into_inner();

        tracing::debug!(
            repository = %self.repository,
            facts = rows.len(),
            security = security.len(),
            lines = ?line_count,
            "scan session finished"
        );

        ScanOutcome {
            repository: self.repository,
            rows,
            security,
            line_count,
        }
    }
}

impl ScanOutcome {
    /// Outcome with no facts
    #[must_use]
    pub fn empty(repository: RepositoryId) -> Self {
        Self {
            repository,
            rows: Vec::new(),
            security: Vec::new(),
            line_count: None,
        }
    }

    /// Retained fact for a card
    #[must_use]
    pub fn row(&self, card: &str) -> Option<&UpgradeRow> {
        self.rows.iter().find(|r| r.card == card)
    }
}

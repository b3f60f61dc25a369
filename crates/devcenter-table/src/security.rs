//! Security issue fact sink

use parking_lot::Mutex;

use crate::row::SecurityIssueRow;

/// Security findings for one repository scan
///
/// Every occurrence is kept; findings are counted, not merged.
#[derive(Debug, Default)]
pub struct SecurityIssues {
    rows: Mutex<Vec<SecurityIssueRow>>,
}

impl SecurityIssues {
    /// Display name of the table
    pub const DISPLAY_NAME: &'static str = "Security issues";

    /// Create empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence
    pub fn insert(&self, row: SecurityIssueRow) {
        tracing::trace!(ordinal = row.ordinal, issue = %row.issue_name, "security issue recorded");
        self.rows.lock().push(row);
    }

    /// Number of occurrences recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    /// Take the recorded occurrences in insertion order
    #[must_use]
    pub fn into_rows(self) -> Vec<SecurityIssueRow> {
        self.rows.into_inner()
    }
}

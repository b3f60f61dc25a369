//! Fact rows and the insert policy
//!
//! A repository holds at most one [`UpgradeRow`] per card: the worst state
//! seen during the scan. [`merge_decision`] is the whole policy, kept free of
//! any storage so the sinks and the tests share it.

use devcenter_model::Version;
use serde::{Deserialize, Serialize};

/// One upgrade or migration fact for a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeRow {
    /// Card display name
    pub card: String,

    /// Position of the measure within the card
    pub ordinal: usize,

    /// Display value of the state, usually the measure name
    pub value: String,

    /// Oldest matching version found, used to break ties
    pub current_minimum_version: Option<String>,
}

impl UpgradeRow {
    /// Create row without a version detail
    #[must_use]
    pub fn new(card: impl Into<String>, ordinal: usize, value: impl Into<String>) -> Self {
        Self {
            card: card.into(),
            ordinal,
            value: value.into(),
            current_minimum_version: None,
        }
    }

    /// Attach the version detail
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.current_minimum_version = Some(detail.into());
        self
    }

    /// Version detail, if any
    #[inline]
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.current_minimum_version.as_deref()
    }
}

/// One security finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityIssueRow {
    /// Position of the measure within the security card
    pub ordinal: usize,

    /// Name of the finding
    pub issue_name: String,
}

impl SecurityIssueRow {
    /// Create row
    #[must_use]
    pub fn new(ordinal: usize, issue_name: impl Into<String>) -> Self {
        Self {
            ordinal,
            issue_name: issue_name.into(),
        }
    }
}

/// What happened to a candidate row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// First fact for the card
    Inserted,

    /// Candidate took the place of the retained fact
    Replaced,

    /// Retained fact stays, candidate dropped
    Discarded,
}

impl InsertOutcome {
    /// Whether the candidate is now the retained fact
    #[inline]
    #[must_use]
    pub fn is_retained(self) -> bool {
        !matches!(self, Self::Discarded)
    }
}

/// How a version detail ranks when breaking a tie, best first
///
/// Parseable details order oldest first, then any unparseable detail, then
/// no detail at all. The raw text settles versions that compare equal
/// (`3.0` and `3.0.0`), so the order is total.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DetailRank<'a> {
    Parsed(Version, &'a str),
    Unparsed(&'a str),
    Missing,
}

impl<'a> DetailRank<'a> {
    fn of(detail: Option<&'a str>) -> Self {
        match detail {
            None => Self::Missing,
            Some(raw) => match Version::parse(raw) {
                Some(version) => Self::Parsed(version, raw),
                None => Self::Unparsed(raw),
            },
        }
    }
}

fn rank(row: &UpgradeRow) -> (usize, DetailRank<'_>, &str) {
    (row.ordinal, DetailRank::of(row.detail()), &row.value)
}

/// Decide whether `candidate` displaces `retained` for the same card
///
/// Lower ordinals are worse and win. At equal ordinals the older version
/// detail wins; an unparseable detail loses to any parseable one and a
/// missing detail loses to both. Rows are ranked totally, so the retained
/// fact never depends on the order candidates arrive in.
#[must_use]
pub fn merge_decision(retained: Option<&UpgradeRow>, candidate: &UpgradeRow) -> InsertOutcome {
    let Some(retained) = retained else {
        return InsertOutcome::Inserted;
    };

    if rank(candidate) < rank(retained) {
        InsertOutcome::Replaced
    } else {
        InsertOutcome::Discarded
    }
}

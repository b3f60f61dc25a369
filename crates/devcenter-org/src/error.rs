//! Error types for organization trees

use crate::path::OrgPath;

/// Errors from building, reading, or navigating organization trees
#[derive(Debug, thiserror::Error)]
pub enum OrgError {
    /// A path does not resolve to a node
    #[error("organization not found: {path}")]
    NotFound { path: OrgPath },

    /// Organization input could not be parsed
    #[error("malformed organization input at line {line}: {reason}")]
    MalformedInput { line: u64, reason: String },

    /// Path text contains an empty segment
    #[error("organization path contains empty segment")]
    EmptySegment,

    /// IO error while reading organization input
    #[error("io error reading organizations: {0}")]
    Io(#[from] std::io::Error),
}

impl OrgError {
    /// Create not-found error for path
    #[inline]
    pub fn not_found(path: impl Into<OrgPath>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create malformed input error
    #[inline]
    pub fn malformed(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for OrgError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, csv::Position::line);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            kind => Self::malformed(line, csv_reason(&kind)),
        }
    }
}

/// Human readable reason for a CSV parse failure
pub(crate) fn csv_reason(kind: &csv::ErrorKind) -> String {
    match kind {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        csv::ErrorKind::Utf8 { err, .. } => format!("invalid UTF-8: {err}"),
        other => format!("{other:?}"),
    }
}

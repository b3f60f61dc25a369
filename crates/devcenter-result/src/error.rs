//! Error types for fact ingestion and reduction
//!
//! [`DevCenterError`] is the error surfaced by the reducer. Component errors
//! convert into it, with their not-found, malformed-input and ordinal
//! failures lifted into the matching top-level variant so callers can match
//! on one taxonomy.

use devcenter_model::ModelError;
use devcenter_org::OrgError;
use devcenter_table::TableError;

/// Main DevCenter error type
#[derive(Debug, thiserror::Error)]
pub enum DevCenterError {
    /// The card catalog violates one or more structural rules
    #[error("invalid configuration:\n{}", .0.join("\n"))]
    InvalidConfiguration(Vec<String>),

    /// Fact input could not be parsed; nothing from the batch was applied
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: u64, reason: String },

    /// An organization path or card name does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// A fact names an ordinal the card does not have
    #[error("ordinal {ordinal} is out of range for card '{card}' ({measures} measures)")]
    OrdinalOutOfRange {
        card: String,
        ordinal: usize,
        measures: usize,
    },

    /// Other catalog error
    #[error("model error: {0}")]
    Model(ModelError),

    /// Other organization error
    #[error("organization error: {0}")]
    Org(OrgError),

    /// Fact table error
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// Summary could not be serialized
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while reading facts
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DevCenterError {
    /// Create malformed input error
    #[inline]
    pub fn malformed(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            reason: reason.into(),
        }
    }

    /// Check if a path or card could not be found
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if input could not be parsed
    #[inline]
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }
}

impl From<ModelError> for DevCenterError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidConfiguration(violations) => Self::InvalidConfiguration(violations),
            ModelError::CardNotFound(name) => Self::NotFound(format!("card '{name}'")),
            ModelError::OrdinalOutOfRange {
                card,
                ordinal,
                measures,
            } => Self::OrdinalOutOfRange {
                card,
                ordinal,
                measures,
            },
            other => Self::Model(other),
        }
    }
}

impl From<OrgError> for DevCenterError {
    fn from(err: OrgError) -> Self {
        match err {
            OrgError::NotFound { path } => Self::NotFound(format!("organization '{path}'")),
            OrgError::MalformedInput { line, reason } => Self::MalformedInput { line, reason },
            OrgError::Io(io) => Self::Io(io),
            other => Self::Org(other),
        }
    }
}

impl From<csv::Error> for DevCenterError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, csv::Position::line);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => Self::malformed(line, format!("expected {expected_len} fields, found {len}")),
            csv::ErrorKind::Utf8 { err, .. } => Self::malformed(line, format!("invalid UTF-8: {err}")),
            other => Self::malformed(line, format!("{other:?}")),
        }
    }
}

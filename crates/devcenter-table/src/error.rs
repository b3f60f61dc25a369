//! Error types for fact tables

use devcenter_model::ModelError;

/// Errors raised while recording or exporting facts
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Card or ordinal lookup against the catalog failed
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A measure is not part of the card's configured subset
    #[error("measure '{measure}' is not configured for card '{card}'")]
    UnknownMeasure { card: String, measure: String },

    /// Upgrade fact recorded against a card that counts occurrences
    #[error("card '{0}' counts occurrences; record security issues instead")]
    PerOccurrenceCard(String),

    /// Security issue recorded against a catalog without a security card
    #[error("catalog has no security card")]
    NoSecurityCard,

    /// CSV encoding failed
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error while writing facts
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

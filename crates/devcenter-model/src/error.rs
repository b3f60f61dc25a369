//! Error types for the DevCenter model
//!
//! Provides error handling for:
//! - Catalog validation (duplicate names, empty measure sets, missing cards)
//! - Card and measure lookups
//! - Catalog configuration loading

use std::path::PathBuf;

/// Errors raised while assembling or querying the card catalog
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The catalog violates one or more structural rules.
    ///
    /// Every violation found is reported, not just the first one.
    #[error("DevCenter validation failed:\n{}", render_violations(.0))]
    InvalidConfiguration(Vec<String>),

    /// No card with the requested name exists in the catalog
    #[error("no card found with name: {0}")]
    CardNotFound(String),

    /// An ordinal does not index into the card's configured measures
    #[error("ordinal {ordinal} is out of range for card '{card}' ({measures} measures)")]
    OrdinalOutOfRange {
        card: String,
        ordinal: usize,
        measures: usize,
    },

    /// Catalog configuration could not be parsed
    #[error("invalid catalog configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error while reading catalog configuration
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ModelError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Validation messages, if this is a configuration error
    #[must_use]
    pub fn violations(&self) -> &[String] {
        match self {
            Self::InvalidConfiguration(violations) => violations,
            _ => &[],
        }
    }
}

fn render_violations(violations: &[String]) -> String {
    violations
        .iter()
        .map(|v| format!(" - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

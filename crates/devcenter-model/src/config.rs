//! Catalog configuration
//!
//! Declares the tracked cards in TOML and turns them into a validated
//! [`DevCenter`].
//!
//! ```toml
//! [[card]]
//! kind = "library"
//! name = "Move to Spring Boot 3.5.0"
//! target = "3.5.0"
//! fix_recipe_id = "io.moderne.java.spring.boot3.UpgradeSpringBoot_3_5"
//!
//! [[card]]
//! kind = "java"
//! target = 21
//!
//! [security]
//! name = "OWASP top ten"
//! measures = [{ name = "A01", description = "Broken access control" }]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::card::{Aggregation, Card};
use crate::devcenter::DevCenter;
use crate::error::ModelError;
use crate::measures::{
    BuildToolMeasure, JUnitJupiterMeasure, JUnitMeasure, JavaVersionMeasure, SemverMeasure,
};
use crate::version::Version;

/// Top-level catalog configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevCenterConfig {
    /// Migration cards in display order
    #[serde(default, rename = "card")]
    pub cards: Vec<CardConfig>,

    /// Security card
    #[serde(default)]
    pub security: Option<SecurityConfig>,
}

/// One migration card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CardConfig {
    /// Dependency upgrade measured by semver distance
    Library {
        name: String,
        target: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        fix_recipe_id: Option<String>,
    },

    /// Java language level upgrade
    Java {
        target: u32,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        fix_recipe_id: Option<String>,
    },

    /// Build tool in use
    BuildTool {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        fix_recipe_id: Option<String>,
    },

    /// JUnit 4 to JUnit Jupiter
    Junit {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        fix_recipe_id: Option<String>,
    },

    /// JUnit 4 and 5 to JUnit Jupiter 6
    JunitJupiter {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        fix_recipe_id: Option<String>,
    },

    /// Explicit measure list
    Custom {
        name: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        fix_recipe_id: Option<String>,
        measures: Vec<MeasureConfig>,
    },
}

/// Security card configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fix_recipe_id: Option<String>,
    pub measures: Vec<MeasureConfig>,
}

/// A measure declared by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeasureConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl DevCenterConfig {
    /// Parse from TOML string
    ///
    /// # Errors
    /// Returns error if TOML is invalid or does not match the schema
    pub fn from_toml_str(toml: &str) -> Result<Self, ModelError> {
        Ok(toml::from_str(toml)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ModelError::io_error(path, e))?;
        tracing::debug!(path = %path.display(), "loading card catalog");
        Self::from_toml_str(&text)
    }

    /// Build the validated catalog
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidConfiguration`] with every violation,
    /// including unparseable library targets.
    pub fn into_devcenter(self) -> Result<DevCenter, ModelError> {
        let mut builder = DevCenter::builder();
        for card in self.cards {
            builder = match card.into_card() {
                Ok(card) => builder.card(card),
                Err(violation) => builder.violation(violation),
            };
        }
        if let Some(security) = self.security {
            builder = builder.security(security.into_card());
        }
        builder.build()
    }
}

impl CardConfig {
    /// Display name this card will carry
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Library { name, .. } | Self::Custom { name, .. } => name.clone(),
            Self::Java { name, target, .. } => {
                name.clone().unwrap_or_else(|| format!("Move to Java {target}"))
            }
            Self::BuildTool { name, .. } => name.clone().unwrap_or_else(|| "Build tool".to_string()),
            Self::Junit { name, .. } => name.clone().unwrap_or_else(|| "Move to JUnit 5".to_string()),
            Self::JunitJupiter { name, .. } => {
                name.clone().unwrap_or_else(|| "Move to JUnit 6".to_string())
            }
        }
    }

    fn into_card(self) -> Result<Card, String> {
        let name = self.name();
        let card = match self {
            Self::Library {
                target,
                description,
                fix_recipe_id,
                ..
            } => {
                if Version::parse(&target).is_none() {
                    return Err(format!(
                        "Card '{name}' has an unparseable target version '{target}'."
                    ));
                }
                Card::builder(name)
                    .description(description.unwrap_or_else(|| {
                        "Determine the current state of a repository relative to a desired library upgrade."
                            .to_string()
                    }))
                    .maybe_fix_recipe_id(fix_recipe_id)
                    .target(target)
                    .measures(SemverMeasure::ALL)
            }
            Self::Java {
                target,
                fix_recipe_id,
                ..
            } => Card::builder(name)
                .description(
                    "Determine the current state of a repository relative to a desired Java version upgrade.",
                )
                .maybe_fix_recipe_id(fix_recipe_id)
                .target(target.to_string())
                .measures(JavaVersionMeasure::ALL),
            Self::BuildTool { fix_recipe_id, .. } => Card::builder(name)
                .description("Identify the build tool used by repositories.")
                .maybe_fix_recipe_id(fix_recipe_id)
                .measures(BuildToolMeasure::ALL),
            Self::Junit { fix_recipe_id, .. } => Card::builder(name)
                .description("Move to JUnit Jupiter.")
                .maybe_fix_recipe_id(fix_recipe_id)
                .measures(JUnitMeasure::ALL),
            Self::JunitJupiter { fix_recipe_id, .. } => Card::builder(name)
                .description("Move to JUnit Jupiter.")
                .fix_recipe_id(fix_recipe_id.unwrap_or_else(|| {
                    "org.openrewrite.java.testing.junit5.JUnit4to5Migration".to_string()
                }))
                .measures(JUnitJupiterMeasure::ALL),
            Self::Custom {
                description,
                fix_recipe_id,
                measures,
                ..
            } => measures.into_iter().fold(
                Card::builder(name)
                    .description(description.unwrap_or_default())
                    .maybe_fix_recipe_id(fix_recipe_id),
                |card, m| card.measure(m.name, m.description),
            ),
        };
        Ok(card.aggregation(Aggregation::PerRepository).build())
    }
}

impl SecurityConfig {
    fn into_card(self) -> Card {
        self.measures
            .into_iter()
            .fold(
                Card::builder(self.name)
                    .description(self.description.unwrap_or_default())
                    .maybe_fix_recipe_id(self.fix_recipe_id)
                    .aggregation(Aggregation::PerOccurrence),
                |card, m| card.measure(m.name, m.description),
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::Measure;
    use std::io::Write;

    const CATALOG: &str = r#"
[[card]]
kind = "library"
name = "Move to Spring Boot 3.5.0"
target = "3.5.0"
fix_recipe_id = "io.moderne.java.spring.boot3.UpgradeSpringBoot_3_5"

[[card]]
kind = "java"
target = 21

[[card]]
kind = "junit"

[security]
name = "OWASP top ten"
measures = [
    { name = "A01", description = "Broken access control" },
    { name = "A08", description = "Software and data integrity failures" },
]
"#;

    #[test]
    fn parses_catalog() {
        let config = DevCenterConfig::from_toml_str(CATALOG).unwrap();
        assert_eq!(config.cards.len(), 3);
        assert_eq!(config.cards[1].name(), "Move to Java 21");
        assert!(config.security.is_some());
    }

    #[test]
    fn builds_devcenter_in_declared_order() {
        let devcenter = DevCenterConfig::from_toml_str(CATALOG)
            .unwrap()
            .into_devcenter()
            .unwrap();

        let names: Vec<_> = devcenter.cards().map(Card::name).collect();
        assert_eq!(
            names,
            vec![
                "Move to Spring Boot 3.5.0",
                "Move to Java 21",
                "Move to JUnit 5",
                "OWASP top ten"
            ]
        );

        let java = devcenter.card("Move to Java 21").unwrap();
        assert_eq!(java.measures().len(), 5);
        assert_eq!(java.ordinal("Completed"), Some(4));
        assert_eq!(java.target(), Some("21"));

        let boot = devcenter.card("Move to Spring Boot 3.5.0").unwrap();
        assert_eq!(
            boot.fix_recipe_id(),
            Some("io.moderne.java.spring.boot3.UpgradeSpringBoot_3_5")
        );

        let security = devcenter.security().unwrap();
        assert!(security.is_per_occurrence());
        assert_eq!(security.measure(1).unwrap().name(), "A08");
    }

    #[test]
    fn library_target_drives_classification() {
        let devcenter = DevCenterConfig::from_toml_str(CATALOG)
            .unwrap()
            .into_devcenter()
            .unwrap();
        let boot = devcenter.card("Move to Spring Boot 3.5.0").unwrap();
        let target = boot.target().unwrap();

        let measure = SemverMeasure::classify(target, "3.4.1").unwrap();
        assert_eq!(boot.ordinal_of(&measure), Some(1));
        let done = SemverMeasure::classify(target, "3.5.0").unwrap();
        assert_eq!(boot.ordinal_of(&done), Some(3));
    }

    #[test]
    fn junit_jupiter_card() {
        let devcenter = DevCenterConfig::from_toml_str(
            r#"
[[card]]
kind = "junit-jupiter"
"#,
        )
        .unwrap()
        .into_devcenter()
        .unwrap();

        let card = devcenter.card("Move to JUnit 6").unwrap();
        let names: Vec<_> = card.measures().iter().map(Measure::name).collect();
        assert_eq!(names, vec!["JUnit 4", "JUnit 5", "Completed"]);
        assert_eq!(
            card.fix_recipe_id(),
            Some("org.openrewrite.java.testing.junit5.JUnit4to5Migration")
        );
    }

    #[test]
    fn unparseable_target_is_a_violation() {
        let err = DevCenterConfig::from_toml_str(
            r#"
[[card]]
kind = "library"
name = "Guava"
target = "latest"
"#,
        )
        .unwrap()
        .into_devcenter()
        .unwrap_err();

        assert_eq!(
            err.violations(),
            &[
                "Card 'Guava' has an unparseable target version 'latest'.",
                "No cards included that provide upgrades and migrations or security advice."
            ]
        );
    }

    #[test]
    fn custom_card_without_measures_is_rejected() {
        let err = DevCenterConfig::from_toml_str(
            r#"
[[card]]
kind = "custom"
name = "Parent POM"
measures = []
"#,
        )
        .unwrap()
        .into_devcenter()
        .unwrap_err();

        assert_eq!(err.violations(), &["Card 'Parent POM' declares no measures."]);
    }

    #[test]
    fn unknown_kind_is_config_error() {
        let err = DevCenterConfig::from_toml_str(
            r#"
[[card]]
kind = "kotlin"
name = "Kotlin"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Config(_)));
    }

    #[test]
    fn from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let config = DevCenterConfig::from_path(file.path()).unwrap();
        assert_eq!(config.cards.len(), 3);
    }

    #[test]
    fn from_path_missing_file() {
        let err = DevCenterConfig::from_path("/nonexistent/devcenter.toml").unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }
}

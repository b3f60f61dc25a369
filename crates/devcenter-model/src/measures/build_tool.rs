//! Build tool measures

use crate::measure::DevCenterMeasure;

/// Build tool in use by a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuildToolMeasure {
    Gradle,
    Maven,
    Bazel,
    ModerneCli,
}

impl BuildToolMeasure {
    /// Every build tool in declared order
    pub const ALL: [BuildToolMeasure; 4] = [Self::Gradle, Self::Maven, Self::Bazel, Self::ModerneCli];

    /// Look up a build tool by its type name, case-insensitively
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        Self::ALL.into_iter().find(|tool| {
            let candidate: String = tool
                .name()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect();
            candidate.eq_ignore_ascii_case(&normalized)
        })
    }
}

impl DevCenterMeasure for BuildToolMeasure {
    fn name(&self) -> &str {
        match self {
            Self::Gradle => "Gradle",
            Self::Maven => "Maven",
            Self::Bazel => "Bazel",
            Self::ModerneCli => "Moderne CLI",
        }
    }

    fn description(&self) -> &str {
        match self {
            Self::Gradle => "Uses Gradle as build tool.",
            Self::Maven => "Uses Maven as build tool.",
            Self::Bazel => "Uses Bazel as build tool.",
            Self::ModerneCli => "Uses Moderne CLI as build tool.",
        }
    }
}

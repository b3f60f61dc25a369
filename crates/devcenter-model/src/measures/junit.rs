//! JUnit migration measures

use crate::measure::DevCenterMeasure;

/// Test framework generation in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JUnitMeasure {
    JUnit4,
    Completed,
}

impl JUnitMeasure {
    /// Every measure in declared order
    pub const ALL: [JUnitMeasure; 2] = [Self::JUnit4, Self::Completed];
}

impl DevCenterMeasure for JUnitMeasure {
    fn name(&self) -> &str {
        match self {
            Self::JUnit4 => "JUnit 4",
            Self::Completed => "Completed",
        }
    }

    fn description(&self) -> &str {
        match self {
            Self::JUnit4 => "On JUnit 4 or less. Specifically looks for `@org.junit.Test`.",
            Self::Completed => "On JUnit Jupiter.",
        }
    }
}

/// Test framework generation when the goal is JUnit Jupiter 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JUnitJupiterMeasure {
    JUnit4,
    JUnit5,
    Completed,
}

impl JUnitJupiterMeasure {
    /// Every measure in declared order
    pub const ALL: [JUnitJupiterMeasure; 3] = [Self::JUnit4, Self::JUnit5, Self::Completed];

    /// Measure for a repository given the annotations found
    ///
    /// `jupiter_api_version` is the major version of `junit-jupiter-api` on
    /// the classpath, when known. Returns `None` when no test annotation was
    /// found at all.
    #[must_use]
    pub fn classify(
        junit4_annotations: bool,
        jupiter_annotations: bool,
        jupiter_api_version: Option<u32>,
    ) -> Option<Self> {
        if junit4_annotations {
            Some(Self::JUnit4)
        } else if jupiter_annotations {
            Some(match jupiter_api_version {
                Some(major) if major >= 6 => Self::Completed,
                _ => Self::JUnit5,
            })
        } else {
            None
        }
    }
}

impl DevCenterMeasure for JUnitJupiterMeasure {
    fn name(&self) -> &str {
        match self {
            Self::JUnit4 => "JUnit 4",
            Self::JUnit5 => "JUnit 5",
            Self::Completed => "Completed",
        }
    }

    fn description(&self) -> &str {
        match self {
            Self::JUnit4 => "On JUnit 4 or less. Specifically looks for `@org.junit.Test`.",
            Self::JUnit5 => "On JUnit Jupiter 5.",
            Self::Completed => "On JUnit Jupiter 6.",
        }
    }
}

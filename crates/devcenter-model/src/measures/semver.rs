//! Semver distance measures for library upgrades

use crate::measure::DevCenterMeasure;
use crate::version::Version;

/// How far a dependency version is from a target version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SemverMeasure {
    /// At least one major version behind the target
    Major,
    /// Same major, at least one minor version behind
    Minor,
    /// Same major and minor, at least one patch behind
    Patch,
    /// At or beyond the target
    Completed,
}

impl SemverMeasure {
    /// Every semver measure in declared order
    pub const ALL: [SemverMeasure; 4] = [Self::Major, Self::Minor, Self::Patch, Self::Completed];

    /// Classify `actual` relative to `target`
    ///
    /// Returns `None` when either version cannot be parsed.
    #[must_use]
    pub fn classify(target: &str, actual: &str) -> Option<Self> {
        let target = Version::parse(target)?;
        let actual = Version::parse(actual)?;

        let target_key = (target.part(0), target.part(1), target.part(2));
        let actual_key = (actual.part(0), actual.part(1), actual.part(2));
        if actual_key >= target_key {
            return Some(Self::Completed);
        }

        Some(if actual_key.0 < target_key.0 {
            Self::Major
        } else if actual_key.1 < target_key.1 {
            Self::Minor
        } else {
            Self::Patch
        })
    }
}

impl DevCenterMeasure for SemverMeasure {
    fn name(&self) -> &str {
        match self {
            Self::Major => "Major",
            Self::Minor => "Minor",
            Self::Patch => "Patch",
            Self::Completed => "Completed",
        }
    }

    fn description(&self) -> &str {
        match self {
            Self::Major => "The version is a major version away from the target version.",
            Self::Minor => "The version is a minor version away from the target version.",
            Self::Patch => "The version is a patch version away from the target version.",
            Self::Completed => "The version is greater than or equal to the target version.",
        }
    }
}

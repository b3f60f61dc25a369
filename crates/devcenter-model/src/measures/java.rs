//! Java language level measures

use crate::measure::DevCenterMeasure;

/// Java language tiers, ordered from oldest to completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JavaVersionMeasure {
    Java8Plus,
    Java11Plus,
    Java17Plus,
    Java21Plus,
    Completed,
}

impl JavaVersionMeasure {
    /// Every tier in declared order
    pub const ALL: [JavaVersionMeasure; 5] = [
        Self::Java8Plus,
        Self::Java11Plus,
        Self::Java17Plus,
        Self::Java21Plus,
        Self::Completed,
    ];

    /// Lowest major version belonging to this tier
    #[must_use]
    pub fn floor(self) -> Option<u32> {
        match self {
            Self::Java8Plus => Some(8),
            Self::Java11Plus => Some(11),
            Self::Java17Plus => Some(17),
            Self::Java21Plus => Some(21),
            Self::Completed => None,
        }
    }

    /// Tier of a project on `actual` when the goal is `target`
    ///
    /// Every target registers all five tiers, so ordinals stay stable across
    /// cards; tiers at or above the target are simply never reported.
    #[must_use]
    pub fn classify(target: u32, actual: u32) -> Self {
        if actual >= target {
            return Self::Completed;
        }
        Self::ALL
            .into_iter()
            .rev()
            .find(|m| m.floor().is_some_and(|floor| floor <= actual))
            .unwrap_or(Self::Java8Plus)
    }
}

impl DevCenterMeasure for JavaVersionMeasure {
    fn name(&self) -> &str {
        match self {
            Self::Java8Plus => "Java 8+",
            Self::Java11Plus => "Java 11+",
            Self::Java17Plus => "Java 17+",
            Self::Java21Plus => "Java 21+",
            Self::Completed => "Completed",
        }
    }

    fn description(&self) -> &str {
        match self {
            Self::Java8Plus => "On Java 8 or earlier.",
            Self::Java11Plus => "On Java 11 up to but excluding 17.",
            Self::Java17Plus => "On Java 17 up to but excluding 21.",
            Self::Java21Plus => "On Java 21 but below the target.",
            Self::Completed => "On the target Java version or later.",
        }
    }
}

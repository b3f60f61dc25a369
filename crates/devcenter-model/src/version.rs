//! Lenient version ordering
//!
//! Dependency and language versions seen in the wild are rarely strict
//! semver (`17`, `2.12.3.Final`, `1.8.0_292`, `3.0.0-RC1`). [`Version`]
//! accepts all of these and orders them with latest-release semantics:
//! numeric parts first, then a release sorts after any pre-release
//! qualifier of the same numbers.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// Qualifiers that denote a final release rather than a pre-release
const RELEASE_QUALIFIERS: [&str; 3] = ["release", "final", "ga"];

/// A parsed, comparable version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    parts: Vec<u64>,
    qualifier: Option<String>,
}

impl Version {
    /// Parse a version string
    ///
    /// Returns `None` when the string does not start with a digit
    /// (an optional leading `v` is allowed) or a numeric part overflows.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let trimmed = trimmed
            .strip_prefix(['v', 'V'])
            .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
            .unwrap_or(trimmed);

        if !trimmed.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        let mut parts = Vec::new();
        let mut rest = trimmed;
        loop {
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            parts.push(rest[..end].parse::<u64>().ok()?);
            rest = &rest[end..];

            match rest.strip_prefix('.') {
                Some(next) if next.starts_with(|c: char| c.is_ascii_digit()) => rest = next,
                _ => break,
            }
        }

        let qualifier = rest.trim_start_matches(['.', '-', '_', '+']);
        let qualifier = if qualifier.is_empty() {
            None
        } else if qualifier.chars().all(|c| c.is_ascii_digit()) {
            // 1.8.0_292 style update numbers
            parts.push(qualifier.parse::<u64>().ok()?);
            None
        } else {
            Some(qualifier.to_string())
        };

        Some(Self { parts, qualifier })
    }

    /// Numeric parts in order of significance
    #[inline]
    #[must_use]
    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    /// Numeric part at `index`, zero when absent
    #[inline]
    #[must_use]
    pub fn part(&self, index: usize) -> u64 {
        self.parts.get(index).copied().unwrap_or(0)
    }

    /// Major version
    #[inline]
    #[must_use]
    pub fn major(&self) -> u64 {
        self.part(0)
    }

    /// Qualifier following the numeric parts, if any
    #[inline]
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Whether this version is a final release
    #[must_use]
    pub fn is_release(&self) -> bool {
        self.qualifier.as_deref().map_or(true, |q| {
            RELEASE_QUALIFIERS
                .iter()
                .any(|release| q.eq_ignore_ascii_case(release))
        })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            match self.part(i).cmp(&other.part(i)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        match (self.is_release(), other.is_release()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let a = self.qualifier.as_deref().unwrap_or_default().to_ascii_lowercase();
                let b = other.qualifier.as_deref().unwrap_or_default().to_ascii_lowercase();
                a.cmp(&b)
            }
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let numeric: Vec<String> = self.parts.iter().map(u64::to_string).collect();
        write!(f, "{}", numeric.join("."))?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, "-{qualifier}")?;
        }
        Ok(())
    }
}

/// Compare two version strings
///
/// Returns `None` when either side cannot be parsed.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    Some(Version::parse(a)?.cmp(&Version::parse(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn parses_plain_and_partial_versions() {
        assert_eq!(v("2.12.3").parts(), &[2, 12, 3]);
        assert_eq!(v("17").parts(), &[17]);
        assert_eq!(v("v1.2").parts(), &[1, 2]);
    }

    #[test]
    fn parses_update_numbers_as_parts() {
        assert_eq!(v("1.8.0_292").parts(), &[1, 8, 0, 292]);
        assert!(v("1.8.0_292").qualifier().is_none());
    }

    #[test]
    fn parses_qualifiers() {
        let final_release = v("2.12.3.Final");
        assert_eq!(final_release.parts(), &[2, 12, 3]);
        assert_eq!(final_release.qualifier(), Some("Final"));
        assert!(final_release.is_release());

        let rc = v("3.0.0-RC1");
        assert_eq!(rc.qualifier(), Some("RC1"));
        assert!(!rc.is_release());
    }

    #[test]
    fn rejects_non_versions() {
        assert!(Version::parse("").is_none());
        assert!(Version::parse("latest.release").is_none());
        assert!(Version::parse("JUnit 4").is_none());
        assert!(Version::parse("99999999999999999999999").is_none());
    }

    #[test]
    fn missing_parts_are_zero() {
        assert_eq!(compare_versions("2.12", "2.12.0"), Some(Ordering::Equal));
        assert_eq!(compare_versions("17", "17.0.1"), Some(Ordering::Less));
    }

    #[test]
    fn numeric_not_lexicographic() {
        assert_eq!(compare_versions("2.9.0", "2.10.0"), Some(Ordering::Less));
    }

    #[test]
    fn release_after_prerelease() {
        assert_eq!(compare_versions("3.0.0-RC1", "3.0.0"), Some(Ordering::Less));
        assert_eq!(compare_versions("3.0.0-M1", "3.0.0-RC1"), Some(Ordering::Less));
        assert_eq!(compare_versions("3.0.0.RELEASE", "3.0.0"), Some(Ordering::Equal));
    }

    #[test]
    fn unparseable_side_is_incomparable() {
        assert_eq!(compare_versions("2.12.3", "unknown"), None);
    }

    #[test]
    fn display_normalizes() {
        assert_eq!(v("v1.2.3-rc1").to_string(), "1.2.3-rc1");
    }

    proptest! {
        #[test]
        fn prop_numeric_order_matches_tuples(
            a in (0u64..50, 0u64..50, 0u64..50),
            b in (0u64..50, 0u64..50, 0u64..50),
        ) {
            let sa = format!("{}.{}.{}", a.0, a.1, a.2);
            let sb = format!("{}.{}.{}", b.0, b.1, b.2);
            prop_assert_eq!(compare_versions(&sa, &sb), Some(a.cmp(&b)));
        }
    }
}

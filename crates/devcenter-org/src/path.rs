//! Organization paths
//!
//! Provides [`OrgPath`] for addressing a node by the names leading to it
//! from the conceptual root.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OrgError;

/// Names from the conceptual root down to a node
///
/// A synthetic "all repositories" root is never part of a path, so a path
/// computed on one tree resolves on any other tree describing the same
/// hierarchy, with or without such a root.
///
/// # Examples
/// - `[]` → the conceptual root itself
/// - `["Default", "payments"]` → `Default/payments`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct OrgPath(Vec<String>);

impl OrgPath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Empty path (conceptual root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get parent path (if not root)
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Get last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append a segment, returning new path
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Check if this path is a prefix of another
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Iterator over segments from root to leaf
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Display for OrgPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        write!(f, "{}", self.0.join("/"))
    }
}

impl FromStr for OrgPath {
    type Err = OrgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let segments = trimmed
            .split('/')
            .map(|seg| {
                if seg.trim().is_empty() {
                    Err(OrgError::EmptySegment)
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

impl From<Vec<String>> for OrgPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for OrgPath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_root() {
        let path = OrgPath::root();
        assert!(path.is_empty());
        assert!(path.parent().is_none());
        assert_eq!(path.to_string(), "/");
    }

    #[test]
    fn path_parent_and_child() {
        let path = OrgPath::from(&["Default", "payments"][..]);
        assert_eq!(path.parent().unwrap().segments(), &["Default"]);
        assert_eq!(path.child("ledger").last(), Some("ledger"));
    }

    #[test]
    fn path_is_prefix_of() {
        let a: OrgPath = "Default".parse().unwrap();
        let b: OrgPath = "Default/payments".parse().unwrap();
        assert!(a.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
        assert!(OrgPath::root().is_prefix_of(&a));
    }

    #[test]
    fn path_from_str_allows_spaces_and_symbols() {
        let path: OrgPath = "/Default/Team A (legacy)/".parse().unwrap();
        assert_eq!(path.segments(), &["Default", "Team A (legacy)"]);
        assert_eq!(path.to_string(), "Default/Team A (legacy)");
    }

    #[test]
    fn path_from_str_empty_segment() {
        let result: Result<OrgPath, _> = "a//b".parse();
        assert!(matches!(result, Err(OrgError::EmptySegment)));
    }
}

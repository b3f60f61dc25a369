//! Repository identity
//!
//! Provides [`RepositoryId`], the key that joins fact rows to the
//! repositories an organization tree references.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Stable identity of one repository
///
/// Independent of which organizations reference it. Blank branches are
/// normalized to absent so `""` and a missing column compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RepositoryId {
    origin: String,
    path: String,
    branch: Option<String>,
}

impl RepositoryId {
    /// Create new identity
    #[must_use]
    pub fn new(
        origin: impl Into<String>,
        path: impl Into<String>,
        branch: Option<impl Into<String>>,
    ) -> Self {
        Self {
            origin: origin.into().trim().to_string(),
            path: path.into().trim().to_string(),
            branch: branch
                .map(Into::into)
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty()),
        }
    }

    /// Identity without a branch
    #[inline]
    #[must_use]
    pub fn without_branch(origin: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(origin, path, None::<String>)
    }

    /// Origin host, e.g. `github.com`
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Path within the origin, e.g. `openrewrite/rewrite`
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Branch, if any
    #[inline]
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }
}

impl Display for RepositoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.origin, self.path)?;
        if let Some(branch) = &self.branch {
            write!(f, "@{branch}")?;
        }
        Ok(())
    }
}

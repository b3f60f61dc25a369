//! Reading organization trees from `repos.csv`
//!
//! Each row names a repository and the organizations it belongs to, innermost
//! first:
//!
//! ```text
//! cloneUrl,branch,origin,path,org1,org2
//! https://github.com/acme/ledger,main,github.com,acme/ledger,payments,Default
//! https://github.com/acme/search,,github.com,acme/search,search,Default
//! ```

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use devcenter_model::RepositoryId;

use crate::error::OrgError;
use crate::organization::{Organization, RepositorySpec};

/// Name given to the synthetic root above several outermost organizations
pub const ALL_ORGANIZATIONS: &str = "ALL";

/// Reads `repos.csv` style input into an [`Organization`]
#[derive(Debug, Clone)]
pub struct OrganizationReader {
    root_name: String,
}

impl Default for OrganizationReader {
    fn default() -> Self {
        Self {
            root_name: ALL_ORGANIZATIONS.to_string(),
        }
    }
}

struct Columns {
    origin: usize,
    path: usize,
    branch: Option<usize>,
    /// Innermost first
    orgs: Vec<usize>,
}

struct Row {
    line: u64,
    id: RepositoryId,
    /// Outermost first
    orgs: Vec<String>,
}

impl OrganizationReader {
    /// Reader using [`ALL_ORGANIZATIONS`] for a synthetic root
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different name for the synthetic root
    #[must_use]
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    /// Read a tree from a file
    ///
    /// # Errors
    /// See [`read`](Self::read).
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Organization<()>, OrgError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading organizations");
        self.read(File::open(path)?)
    }

    /// Read a tree from CSV text
    ///
    /// A single outermost organization becomes a real root. Several outermost
    /// organizations, or any repository listed without one, put a synthetic
    /// root above them.
    ///
    /// # Errors
    /// Returns [`OrgError::MalformedInput`] for CSV syntax errors, missing
    /// `origin`/`path` columns or blank values in them.
    pub fn read<R: Read>(&self, input: R) -> Result<Organization<()>, OrgError> {
        let mut reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let columns = Columns::from_headers(reader.headers()?)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            rows.push(columns.row(line, &record)?);
        }

        let tree = self.assemble(rows);
        tracing::info!(
            organizations = tree.len(),
            repositories = tree.repository_reference_count(),
            "organizations read"
        );
        Ok(tree)
    }

    fn assemble(&self, rows: Vec<Row>) -> Organization<()> {
        let single_root = {
            let outermost: HashSet<&str> = rows
                .iter()
                .filter_map(|r| r.orgs.first().map(String::as_str))
                .collect();
            let unowned = rows.iter().any(|r| r.orgs.is_empty());
            match (outermost.len(), unowned) {
                (1, false) => outermost.into_iter().next().map(str::to_string),
                _ => None,
            }
        };

        let (mut tree, skip) = match single_root {
            Some(name) => (Organization::new(name), 1),
            None => (Organization::conceptual(self.root_name.clone()), 0),
        };

        for row in rows {
            let mut node = tree.root();
            for org in row.orgs.iter().skip(skip) {
                node = tree.ensure_child(node, org);
            }
            tracing::trace!(line = row.line, repository = %row.id, "repository attached");
            tree.add_repository(node, RepositorySpec::unmaterialized(row.id));
        }
        tree
    }
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, OrgError> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let missing = |name: &str| OrgError::malformed(1, format!("missing column '{name}'"));

        let origin = find("origin").ok_or_else(|| missing("origin"))?;
        let path = find("path").ok_or_else(|| missing("path"))?;
        let branch = find("branch");

        let mut orgs: Vec<(u32, usize)> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| {
                let lower = h.to_ascii_lowercase();
                let level = lower.strip_prefix("org")?.parse::<u32>().ok()?;
                Some((level, i))
            })
            .collect();
        orgs.sort_unstable();

        Ok(Self {
            origin,
            path,
            branch,
            orgs: orgs.into_iter().map(|(_, i)| i).collect(),
        })
    }

    fn row(&self, line: u64, record: &csv::StringRecord) -> Result<Row, OrgError> {
        let required = |index: usize, name: &str| {
            record
                .get(index)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| OrgError::malformed(line, format!("missing value for '{name}'")))
        };

        let origin = required(self.origin, "origin")?;
        let path = required(self.path, "path")?;
        let branch = self
            .branch
            .and_then(|i| record.get(i))
            .filter(|b| !b.is_empty());

        let mut orgs: Vec<String> = self
            .orgs
            .iter()
            .filter_map(|&i| record.get(i))
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        orgs.reverse();

        Ok(Row {
            line,
            id: RepositoryId::new(origin, path, branch),
            orgs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read(csv: &str) -> Organization<()> {
        OrganizationReader::new().read(csv.as_bytes()).unwrap()
    }

    #[test]
    fn single_outermost_org_is_real_root() {
        let tree = read(
            "cloneUrl,branch,origin,path,org1,org2\n\
             https://github.com/acme/ledger,main,github.com,acme/ledger,payments,Default\n\
             https://github.com/acme/search,,github.com,acme/search,search,Default\n",
        );

        assert!(!tree.is_conceptual_root());
        assert_eq!(tree.node(tree.root()).name(), "Default");

        let payments = tree.child(tree.root(), &["payments"]).unwrap();
        let repos = tree.node(payments).repositories();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].id().branch(), Some("main"));
        assert_eq!(tree.path_to(payments).to_string(), "Default/payments");
    }

    #[test]
    fn several_outermost_orgs_get_synthetic_root() {
        let tree = read(
            "origin,path,org1\n\
             github.com,a/r,OrgX\n\
             github.com,a/r,OrgY\n",
        );

        assert!(tree.is_conceptual_root());
        assert_eq!(tree.node(tree.root()).name(), ALL_ORGANIZATIONS);
        assert_eq!(tree.len(), 3);

        let index = tree.repository_index();
        let id = RepositoryId::without_branch("github.com", "a/r");
        assert_eq!(index.get(&id).len(), 2);
    }

    #[test]
    fn repository_without_org_attaches_to_synthetic_root() {
        let tree = read(
            "origin,path,org1\n\
             github.com,a/one,Default\n\
             github.com,a/two,\n",
        );

        assert!(tree.is_conceptual_root());
        assert_eq!(tree.node(tree.root()).repositories().len(), 1);
    }

    #[test]
    fn org_columns_ordered_by_level_not_position() {
        let tree = read(
            "org2,ORIGIN,Path,org1\n\
             Default,github.com,a/r,payments\n",
        );
        let payments = tree.child(tree.root(), &["payments"]).unwrap();
        assert_eq!(tree.node(payments).repositories().len(), 1);
    }

    #[test]
    fn comments_and_short_rows_are_accepted() {
        let tree = read(
            "origin,path,org1,org2,org3\n\
             # exported nightly\n\
             github.com,a/one,team,Default\n\
             github.com,a/two,Default\n",
        );
        assert_eq!(tree.node(tree.root()).name(), "Default");
        assert_eq!(tree.node(tree.root()).repositories().len(), 1);
    }

    #[test]
    fn missing_path_value_is_malformed() {
        let err = OrganizationReader::new()
            .read("origin,path,org1\ngithub.com,,Default\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, OrgError::MalformedInput { line: 2, .. }));
    }

    #[test]
    fn missing_origin_column_is_malformed() {
        let err = OrganizationReader::new()
            .read("path,org1\na/r,Default\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, OrgError::MalformedInput { line: 1, .. }));
    }
}

//! CSV export of scan outcomes
//!
//! The column layout matches what `devcenter-result` reads back, so a set of
//! outcomes written here replays onto an organization tree unchanged.

use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::error::TableError;
use crate::session::ScanOutcome;

/// Header of the upgrades and migrations CSV
pub const UPGRADES_AND_MIGRATIONS_HEADERS: [&str; 7] = [
    "repositoryOrigin",
    "repositoryPath",
    "repositoryBranch",
    "card",
    "ordinal",
    "value",
    "currentMinimumVersion",
];

/// Header of the security issues CSV
pub const SECURITY_ISSUES_HEADERS: [&str; 5] = [
    "repositoryOrigin",
    "repositoryPath",
    "repositoryBranch",
    "ordinal",
    "issueName",
];

/// Header of the organization statistics CSV
pub const ORGANIZATION_STATISTICS_HEADERS: [&str; 4] = [
    "repositoryOrigin",
    "repositoryPath",
    "repositoryBranch",
    "lineCount",
];

#[derive(Serialize)]
struct UpgradeRecord<'a> {
    origin: &'a str,
    path: &'a str,
    branch: Option<&'a str>,
    card: &'a str,
    ordinal: usize,
    value: &'a str,
    current_minimum_version: Option<&'a str>,
}

#[derive(Serialize)]
struct SecurityRecord<'a> {
    origin: &'a str,
    path: &'a str,
    branch: Option<&'a str>,
    ordinal: usize,
    issue_name: &'a str,
}

#[derive(Serialize)]
struct StatisticsRecord<'a> {
    origin: &'a str,
    path: &'a str,
    branch: Option<&'a str>,
    line_count: u64,
}

fn writer<W: Write>(inner: W, headers: &[&str]) -> Result<csv::Writer<W>, TableError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(inner);
    csv.write_record(headers)?;
    Ok(csv)
}

fn finish<W: Write>(csv: csv::Writer<W>) -> Result<W, TableError> {
    csv.into_inner()
        .map_err(|e| TableError::Io(e.into_error()))
}

/// Writes retained upgrade facts
pub struct UpgradesAndMigrationsWriter<W: Write> {
    csv: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> fmt::Debug for UpgradesAndMigrationsWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpgradesAndMigrationsWriter")
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

impl<W: Write> UpgradesAndMigrationsWriter<W> {
    /// Start a new CSV, writing the header immediately
    ///
    /// # Errors
    /// Returns error if the header cannot be written
    pub fn new(inner: W) -> Result<Self, TableError> {
        Ok(Self {
            csv: writer(inner, &UPGRADES_AND_MIGRATIONS_HEADERS)?,
            rows: 0,
        })
    }

    /// Append every fact of one outcome
    ///
    /// # Errors
    /// Returns error if a record cannot be written
    pub fn write(&mut self, outcome: &ScanOutcome) -> Result<(), TableError> {
        let repository = &outcome.repository;
        for row in &outcome.rows {
            self.csv.serialize(UpgradeRecord {
                origin: repository.origin(),
                path: repository.path(),
                branch: repository.branch(),
                card: &row.card,
                ordinal: row.ordinal,
                value: &row.value,
                current_minimum_version: row.detail(),
            })?;
            self.rows += 1;
        }
        Ok(())
    }

    /// Append several outcomes
    ///
    /// # Errors
    /// Returns error if a record cannot be written
    pub fn write_all<'a, I>(&mut self, outcomes: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = &'a ScanOutcome>,
    {
        outcomes.into_iter().try_for_each(|o| self.write(o))
    }

    /// Flush and return the underlying writer
    ///
    /// # Errors
    /// Returns error if buffered records cannot be flushed
    pub fn into_inner(self) -> Result<W, TableError> {
        tracing::debug!(rows = self.rows, "upgrades and migrations written");
        finish(self.csv)
    }
}

/// Writes security occurrences
pub struct SecurityIssuesWriter<W: Write> {
    csv: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> fmt::Debug for SecurityIssuesWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityIssuesWriter")
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

impl<W: Write> SecurityIssuesWriter<W> {
    /// Start a new CSV, writing the header immediately
    ///
    /// # Errors
    /// Returns error if the header cannot be written
    pub fn new(inner: W) -> Result<Self, TableError> {
        Ok(Self {
            csv: writer(inner, &SECURITY_ISSUES_HEADERS)?,
            rows: 0,
        })
    }

    /// Append every occurrence of one outcome
    ///
    /// # Errors
    /// Returns error if a record cannot be written
    pub fn write(&mut self, outcome: &ScanOutcome) -> Result<(), TableError> {
        let repository = &outcome.repository;
        for issue in &outcome.security {
            self.csv.serialize(SecurityRecord {
                origin: repository.origin(),
                path: repository.path(),
                branch: repository.branch(),
                ordinal: issue.ordinal,
                issue_name: &issue.issue_name,
            })?;
            self.rows += 1;
        }
        Ok(())
    }

    /// Append several outcomes
    ///
    /// # Errors
    /// Returns error if a record cannot be written
    pub fn write_all<'a, I>(&mut self, outcomes: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = &'a ScanOutcome>,
    {
        outcomes.into_iter().try_for_each(|o| self.write(o))
    }

    /// Flush and return the underlying writer
    ///
    /// # Errors
    /// Returns error if buffered records cannot be flushed
    pub fn into_inner(self) -> Result<W, TableError> {
        tracing::debug!(rows = self.rows, "security issues written");
        finish(self.csv)
    }
}

/// Writes per-repository line counts
///
/// Outcomes scanned without gathering statistics produce no row.
pub struct OrganizationStatisticsWriter<W: Write> {
    csv: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> fmt::Debug for OrganizationStatisticsWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrganizationStatisticsWriter")
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

impl<W: Write> OrganizationStatisticsWriter<W> {
    /// Start a new CSV, writing the header immediately
    ///
    /// # Errors
    /// Returns error if the header cannot be written
    pub fn new(inner: W) -> Result<Self, TableError> {
        Ok(Self {
            csv: writer(inner, &ORGANIZATION_STATISTICS_HEADERS)?,
            rows: 0,
        })
    }

    /// Append the line count of one outcome, if it has one
    ///
    /// # Errors
    /// Returns error if the record cannot be written
    pub fn write(&mut self, outcome: &ScanOutcome) -> Result<(), TableError> {
        let Some(line_count) = outcome.line_count else {
            return Ok(());
        };
        let repository = &outcome.repository;
        self.csv.serialize(StatisticsRecord {
            origin: repository.origin(),
            path: repository.path(),
            branch: repository.branch(),
            line_count,
        })?;
        self.rows += 1;
        Ok(())
    }

    /// Append several outcomes
    ///
    /// # Errors
    /// Returns error if a record cannot be written
    pub fn write_all<'a, I>(&mut self, outcomes: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = &'a ScanOutcome>,
    {
        outcomes.into_iter().try_for_each(|o| self.write(o))
    }

    /// Flush and return the underlying writer
    ///
    /// # Errors
    /// Returns error if buffered records cannot be flushed
    pub fn into_inner(self) -> Result<W, TableError> {
        tracing::debug!(rows = self.rows, "organization statistics written");
        finish(self.csv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{SecurityIssueRow, UpgradeRow};
    use devcenter_model::RepositoryId;
    use pretty_assertions::assert_eq;

    fn outcome() -> ScanOutcome {
        ScanOutcome {
            repository: RepositoryId::new("github.com", "acme/ledger", Some("main")),
            rows: vec![
                UpgradeRow::new("Move to Java 21", 1, "Java 11+"),
                UpgradeRow::new("Move to Jackson 3", 0, "Major").with_detail("2.10.0"),
            ],
            security: vec![SecurityIssueRow::new(0, "SQL injection")],
            line_count: Some(4_210),
        }
    }

    #[test]
    fn upgrades_csv_layout() {
        let mut writer = UpgradesAndMigrationsWriter::new(Vec::new()).unwrap();
        writer.write(&outcome()).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        assert_eq!(
            text,
            "repositoryOrigin,repositoryPath,repositoryBranch,card,ordinal,value,currentMinimumVersion\n\
             github.com,acme/ledger,main,Move to Java 21,1,Java 11+,\n\
             github.com,acme/ledger,main,Move to Jackson 3,0,Major,2.10.0\n"
        );
    }

    #[test]
    fn security_csv_layout() {
        let mut writer = SecurityIssuesWriter::new(Vec::new()).unwrap();
        let empty = ScanOutcome::empty(RepositoryId::without_branch("gitlab.com", "x"));
        writer.write_all([&outcome(), &empty]).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        assert_eq!(
            text,
            "repositoryOrigin,repositoryPath,repositoryBranch,ordinal,issueName\n\
             github.com,acme/ledger,main,0,SQL injection\n"
        );
    }

    #[test]
    fn statistics_csv_skips_outcomes_without_counts() {
        let mut writer = OrganizationStatisticsWriter::new(Vec::new()).unwrap();
        let empty = ScanOutcome::empty(RepositoryId::without_branch("gitlab.com", "x"));
        writer.write_all([&outcome(), &empty]).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        assert_eq!(
            text,
            "repositoryOrigin,repositoryPath,repositoryBranch,lineCount\n\
             github.com,acme/ledger,main,4210\n"
        );
    }

    #[test]
    fn writers_report_rows_in_debug() {
        let mut writer = SecurityIssuesWriter::new(Vec::new()).unwrap();
        writer.write(&outcome()).unwrap();
        assert_eq!(format!("{writer:?}"), "SecurityIssuesWriter { rows: 1, .. }");
        assert!(format!("{:?}", UpgradesAndMigrationsWriter::new(Vec::new()).unwrap()).contains("rows: 0"));
    }

    #[test]
    fn header_written_without_rows() {
        let writer = UpgradesAndMigrationsWriter::new(Vec::new()).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}

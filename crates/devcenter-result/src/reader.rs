//! CSV fact ingestion
//!
//! All readers are header driven: columns may come in any order, names
//! match case-insensitively and unrecognised columns are ignored. Blank rows
//! are skipped. A batch is parsed and validated completely before any fact
//! is applied, so a bad line leaves the tree untouched.

use std::io::Read;

use devcenter_model::{Card, DevCenter, Measure, RepositoryId};
use devcenter_org::{Organization, RepositoryIndex};

use crate::error::DevCenterError;
use crate::repository::RepositoryResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    RepositoryOrigin,
    RepositoryPath,
    RepositoryBranch,
    Card,
    Ordinal,
    LineCount,
    Unknown,
}

impl Column {
    fn from_header(header: &str) -> Self {
        const KNOWN: [(&str, Column); 6] = [
            ("repositoryOrigin", Column::RepositoryOrigin),
            ("repositoryPath", Column::RepositoryPath),
            ("repositoryBranch", Column::RepositoryBranch),
            ("card", Column::Card),
            ("ordinal", Column::Ordinal),
            ("lineCount", Column::LineCount),
        ];
        KNOWN
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(header))
            .map_or(Self::Unknown, |(_, column)| *column)
    }

    fn name(self) -> &'static str {
        match self {
            Self::RepositoryOrigin => "repositoryOrigin",
            Self::RepositoryPath => "repositoryPath",
            Self::RepositoryBranch => "repositoryBranch",
            Self::Card => "card",
            Self::Ordinal => "ordinal",
            Self::LineCount => "lineCount",
            Self::Unknown => "unknown",
        }
    }
}

/// Known columns of one data row, blanks already dropped
struct FactRecord<'r> {
    line: u64,
    origin: Option<&'r str>,
    path: Option<&'r str>,
    branch: Option<&'r str>,
    card: Option<&'r str>,
    ordinal: Option<&'r str>,
    line_count: Option<&'r str>,
}

impl<'r> FactRecord<'r> {
    fn parse(columns: &[Column], record: &'r csv::StringRecord, line: u64) -> Self {
        let mut fact = Self {
            line,
            origin: None,
            path: None,
            branch: None,
            card: None,
            ordinal: None,
            line_count: None,
        };
        for (column, value) in columns.iter().zip(record.iter()) {
            let value = Some(value).filter(|v| !v.is_empty());
            match column {
                Column::RepositoryOrigin => fact.origin = value,
                Column::RepositoryPath => fact.path = value,
                Column::RepositoryBranch => fact.branch = value,
                Column::Card => fact.card = value,
                Column::Ordinal => fact.ordinal = value,
                Column::LineCount => fact.line_count = value,
                Column::Unknown => {}
            }
        }
        fact
    }

    fn require(&self, value: Option<&'r str>, column: Column) -> Result<&'r str, DevCenterError> {
        value.ok_or_else(|| {
            DevCenterError::malformed(self.line, format!("missing value for '{}'", column.name()))
        })
    }

    fn repository(&self) -> Result<RepositoryId, DevCenterError> {
        let origin = self.require(self.origin, Column::RepositoryOrigin)?;
        let path = self.require(self.path, Column::RepositoryPath)?;
        Ok(RepositoryId::new(origin, path, self.branch))
    }

    fn ordinal(&self) -> Result<usize, DevCenterError> {
        let raw = self.require(self.ordinal, Column::Ordinal)?;
        raw.parse().map_err(|_| {
            DevCenterError::malformed(self.line, format!("invalid ordinal '{raw}'"))
        })
    }

    fn line_count(&self) -> Result<u64, DevCenterError> {
        let raw = self.require(self.line_count, Column::LineCount)?;
        raw.parse().map_err(|_| {
            DevCenterError::malformed(self.line, format!("invalid line count '{raw}'"))
        })
    }
}

/// Line numbers of records, counted from their byte offsets
///
/// Record positions reported by `csv` start before any skipped blank or
/// comment lines, and a CRLF terminator is only consumed with the next
/// record, so the line is recomputed from the raw input.
struct LineCounter<'i> {
    input: &'i [u8],
    offset: usize,
    line: u64,
}

impl<'i> LineCounter<'i> {
    fn new(input: &'i [u8]) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
        }
    }

    /// Line of the first content byte at or after `start`
    fn line_at(&mut self, start: u64) -> u64 {
        let input = self.input;
        let mut pos = usize::try_from(start).map_or(input.len(), |s| s.min(input.len()));
        loop {
            match input.get(pos) {
                Some(b'\r' | b'\n') => pos += 1,
                Some(b'#') => {
                    pos = input[pos..]
                        .iter()
                        .position(|&b| b == b'\n')
                        .map_or(input.len(), |n| pos + n + 1);
                }
                _ => break,
            }
        }

        if pos >= self.offset {
            let newlines = input[self.offset..pos].iter().filter(|&&b| b == b'\n').count();
            self.line += newlines as u64;
            self.offset = pos;
        }
        self.line
    }
}

/// Walk every non-blank data row, checking the header for the required
/// columns first
fn for_each_record<R, F>(mut input: R, required: &[Column], mut visit: F) -> Result<(), DevCenterError>
where
    R: Read,
    F: FnMut(FactRecord<'_>) -> Result<(), DevCenterError>,
{
    let mut raw = Vec::new();
    input.read_to_end(&mut raw)?;
    let mut lines = LineCounter::new(&raw);

    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(raw.as_slice());

    let columns: Vec<Column> = reader.headers()?.iter().map(Column::from_header).collect();
    if !columns.is_empty() {
        for column in required {
            if !columns.contains(column) {
                return Err(DevCenterError::malformed(
                    1,
                    format!("missing column '{}'", column.name()),
                ));
            }
        }
    }

    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record)? {
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = lines.line_at(record.position().map_or(0, csv::Position::byte));
        if record.len() != columns.len() {
            return Err(DevCenterError::malformed(
                line,
                format!("expected {} fields, found {}", columns.len(), record.len()),
            ));
        }
        visit(FactRecord::parse(&columns, &record, line))?;
    }
    Ok(())
}

/// Apply a validated fact to every node claiming the repository
fn apply_to_owners<F>(
    tree: &mut Organization<RepositoryResult>,
    index: &RepositoryIndex,
    id: &RepositoryId,
    mut apply: F,
) where
    F: FnMut(&mut RepositoryResult),
{
    for &node in index.get(id) {
        if let Some(spec) = tree.node_mut(node).repository_mut(id) {
            apply(spec.materialized_mut());
        }
    }
}

/// Staged upgrade fact
#[derive(Debug)]
struct UpgradeFact {
    repository: RepositoryId,
    card: Card,
    measure: Measure,
}

/// Reads the upgrades and migrations CSV
///
/// Columns: `repositoryOrigin, repositoryPath, repositoryBranch, card, ordinal`.
#[derive(Debug)]
pub struct UpgradesAndMigrationsReader<'a> {
    devcenter: &'a DevCenter,
    index: &'a RepositoryIndex,
}

impl<'a> UpgradesAndMigrationsReader<'a> {
    /// Create reader resolving cards in `devcenter` and repositories in `index`
    #[must_use]
    pub fn new(devcenter: &'a DevCenter, index: &'a RepositoryIndex) -> Self {
        Self { devcenter, index }
    }

    /// Ingest one CSV into the materialized tree
    ///
    /// Returns the number of facts applied. Rows for repositories missing
    /// from the tree and rows naming cards missing from the catalog are
    /// skipped.
    ///
    /// # Errors
    /// Returns [`DevCenterError::MalformedInput`] or
    /// [`DevCenterError::OrdinalOutOfRange`]; the tree is unchanged then.
    pub fn read<R: Read>(
        &self,
        tree: &mut Organization<RepositoryResult>,
        input: R,
    ) -> Result<usize, DevCenterError> {
        let staged = self.parse(input)?;
        let applied = staged.len();
        for fact in staged {
            apply_to_owners(tree, self.index, &fact.repository, |result| {
                result.record_upgrade(fact.card.clone(), fact.measure.clone());
            });
        }
        tracing::info!(facts = applied, "upgrades and migrations ingested");
        Ok(applied)
    }

    fn parse<R: Read>(&self, input: R) -> Result<Vec<UpgradeFact>, DevCenterError> {
        let mut staged = Vec::new();
        let required = [
            Column::RepositoryOrigin,
            Column::RepositoryPath,
            Column::Card,
            Column::Ordinal,
        ];

        for_each_record(input, &required, |record| {
            let repository = record.repository()?;
            let card_name = record.require(record.card, Column::Card)?;
            let ordinal = record.ordinal()?;

            let Some(card) = self.devcenter.find_card(card_name) else {
                tracing::warn!(line = record.line, card = card_name, "skipping fact for unknown card");
                return Ok(());
            };
            let measure = card.measure(ordinal)?.clone();

            if !self.index.contains(&repository) {
                tracing::trace!(line = record.line, %repository, "skipping fact for untracked repository");
                return Ok(());
            }

            staged.push(UpgradeFact {
                repository,
                card: card.clone(),
                measure,
            });
            Ok(())
        })?;

        Ok(staged)
    }
}

/// Reads the security issues CSV
///
/// Columns: `repositoryOrigin, repositoryPath, repositoryBranch, ordinal`.
/// Each row is one occurrence.
#[derive(Debug)]
pub struct SecurityIssuesReader<'a> {
    devcenter: &'a DevCenter,
    index: &'a RepositoryIndex,
}

impl<'a> SecurityIssuesReader<'a> {
    /// Create reader resolving the security card in `devcenter` and
    /// repositories in `index`
    #[must_use]
    pub fn new(devcenter: &'a DevCenter, index: &'a RepositoryIndex) -> Self {
        Self { devcenter, index }
    }

    /// Ingest one CSV into the materialized tree
    ///
    /// Returns the number of occurrences applied. Without a security card in
    /// the catalog every row is skipped.
    ///
    /// # Errors
    /// Returns [`DevCenterError::MalformedInput`] or
    /// [`DevCenterError::OrdinalOutOfRange`]; the tree is unchanged then.
    pub fn read<R: Read>(
        &self,
        tree: &mut Organization<RepositoryResult>,
        input: R,
    ) -> Result<usize, DevCenterError> {
        let staged = self.parse(input)?;
        let applied = staged.len();
        for (repository, measure) in staged {
            apply_to_owners(tree, self.index, &repository, |result| {
                result.record_security_issue(measure.clone());
            });
        }
        tracing::info!(occurrences = applied, "security issues ingested");
        Ok(applied)
    }

    fn parse<R: Read>(&self, input: R) -> Result<Vec<(RepositoryId, Measure)>, DevCenterError> {
        let mut staged = Vec::new();
        let mut skipped = 0usize;
        let security = self.devcenter.security();
        let required = [
            Column::RepositoryOrigin,
            Column::RepositoryPath,
            Column::Ordinal,
        ];

        for_each_record(input, &required, |record| {
            let repository = record.repository()?;
            let ordinal = record.ordinal()?;

            let Some(card) = security else {
                skipped += 1;
                return Ok(());
            };
            let measure = card.measure(ordinal)?.clone();

            if !self.index.contains(&repository) {
                tracing::trace!(line = record.line, %repository, "skipping issue for untracked repository");
                return Ok(());
            }

            staged.push((repository, measure));
            Ok(())
        })?;

        if skipped > 0 {
            tracing::warn!(rows = skipped, "skipping security issues; catalog has no security card");
        }
        Ok(staged)
    }
}

/// Reads the organization statistics CSV
///
/// Columns: `repositoryOrigin, repositoryPath, repositoryBranch, lineCount`.
/// A later row for the same repository replaces an earlier one.
#[derive(Debug)]
pub struct OrganizationStatisticsReader<'a> {
    index: &'a RepositoryIndex,
}

impl<'a> OrganizationStatisticsReader<'a> {
    /// Create reader resolving repositories in `index`
    #[must_use]
    pub fn new(index: &'a RepositoryIndex) -> Self {
        Self { index }
    }

    /// Ingest one CSV into the materialized tree
    ///
    /// Returns the number of line counts applied.
    ///
    /// # Errors
    /// Returns [`DevCenterError::MalformedInput`]; the tree is unchanged then.
    pub fn read<R: Read>(
        &self,
        tree: &mut Organization<RepositoryResult>,
        input: R,
    ) -> Result<usize, DevCenterError> {
        let mut staged = Vec::new();
        let required = [
            Column::RepositoryOrigin,
            Column::RepositoryPath,
            Column::LineCount,
        ];

        for_each_record(input, &required, |record| {
            let repository = record.repository()?;
            let lines = record.line_count()?;
            if self.index.contains(&repository) {
                staged.push((repository, lines));
            } else {
                tracing::trace!(line = record.line, %repository, "skipping statistics for untracked repository");
            }
            Ok(())
        })?;

        let applied = staged.len();
        for (repository, lines) in staged {
            apply_to_owners(tree, self.index, &repository, |result| {
                result.record_line_count(lines);
            });
        }
        tracing::info!(repositories = applied, "organization statistics ingested");
        Ok(applied)
    }
}

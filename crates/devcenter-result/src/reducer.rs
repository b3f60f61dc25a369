//! Reduction of per-repository facts to organization counts
//!
//! The reducer owns one materialized copy of the organization tree. Facts are
//! ingested once, on construction; afterwards the tree is read-only and
//! `reduce` may be called from any number of threads.

use std::collections::HashSet;
use std::io::Read;

use devcenter_model::{DevCenter, RepositoryId};
use devcenter_org::{NodeId, OrgPath, Organization};
use devcenter_table::ScanOutcome;
use indexmap::IndexMap;

use crate::error::DevCenterError;
use crate::reader::{
    OrganizationStatisticsReader, SecurityIssuesReader, UpgradesAndMigrationsReader,
};
use crate::repository::RepositoryResult;
use crate::result::{ByMeasure, DevCenterResult};

/// Folds repository results into per-card counts for any organization
#[derive(Debug)]
pub struct DevCenterResultReducer {
    devcenter: DevCenter,
    results: Organization<RepositoryResult>,
}

impl DevCenterResultReducer {
    /// Materialize `root` and ingest the two fact CSVs
    ///
    /// Either input may be absent; an absent input contributes no facts.
    ///
    /// # Errors
    /// Returns [`DevCenterError::MalformedInput`] or
    /// [`DevCenterError::OrdinalOutOfRange`] if either CSV is bad. No reducer
    /// is built in that case.
    pub fn from_csv<T>(
        devcenter: DevCenter,
        root: &Organization<T>,
        upgrades_and_migrations: Option<&mut dyn Read>,
        security_issues: Option<&mut dyn Read>,
    ) -> Result<Self, DevCenterError> {
        let mut results = root.rematerialize(|_, _| RepositoryResult::new());
        let index = results.repository_index();

        if let Some(input) = upgrades_and_migrations {
            UpgradesAndMigrationsReader::new(&devcenter, &index).read(&mut results, input)?;
        }
        if let Some(input) = security_issues {
            SecurityIssuesReader::new(&devcenter, &index).read(&mut results, input)?;
        }

        tracing::info!(
            organizations = results.len(),
            repositories = index.len(),
            "reducer built from csv"
        );
        Ok(Self {
            devcenter,
            results,
        })
    }

    /// Materialize `root` and apply in-process scan outcomes
    ///
    /// Produces the same reductions as writing the outcomes to CSV and
    /// calling [`from_csv`](Self::from_csv).
    ///
    /// # Errors
    /// Returns [`DevCenterError::NotFound`] for a fact naming an unknown card
    /// and [`DevCenterError::OrdinalOutOfRange`] for an ordinal outside its
    /// card. No reducer is built in that case.
    pub fn from_scans<'a, T, I>(
        devcenter: DevCenter,
        root: &Organization<T>,
        outcomes: I,
    ) -> Result<Self, DevCenterError>
    where
        I: IntoIterator<Item = &'a ScanOutcome>,
    {
        let mut results = root.rematerialize(|_, _| RepositoryResult::new());
        let index = results.repository_index();

        let mut staged = Vec::new();
        for outcome in outcomes {
            if !index.contains(&outcome.repository) {
                tracing::trace!(repository = %outcome.repository, "skipping outcome for untracked repository");
                continue;
            }

            let mut result = RepositoryResult::new();
            for row in &outcome.rows {
                let card = devcenter.card(&row.card)?;
                result.record_upgrade(card.clone(), card.measure(row.ordinal)?.clone());
            }
            if let Some(security) = devcenter.security() {
                for issue in &outcome.security {
                    result.record_security_issue(security.measure(issue.ordinal)?.clone());
                }
            }
            if let Some(lines) = outcome.line_count {
                result.record_line_count(lines);
            }
            staged.push((&outcome.repository, result));
        }

        let applied = staged.len();
        for (repository, result) in staged {
            for &node in index.get(repository) {
                if let Some(spec) = results.node_mut(node).repository_mut(repository) {
                    spec.materialized_mut().merge(&result);
                }
            }
        }

        tracing::info!(
            organizations = results.len(),
            outcomes = applied,
            "reducer built from scans"
        );
        Ok(Self {
            devcenter,
            results,
        })
    }

    /// Ingest the organization statistics CSV
    ///
    /// # Errors
    /// Returns [`DevCenterError::MalformedInput`] if the CSV is bad; the
    /// reducer is dropped in that case.
    pub fn with_statistics<R: Read>(mut self, input: R) -> Result<Self, DevCenterError> {
        let index = self.results.repository_index();
        OrganizationStatisticsReader::new(&index).read(&mut self.results, input)?;
        Ok(self)
    }

    /// Catalog the reducer counts against
    #[inline]
    #[must_use]
    pub fn devcenter(&self) -> &DevCenter {
        &self.devcenter
    }

    /// The materialized tree
    #[inline]
    #[must_use]
    pub fn results(&self) -> &Organization<RepositoryResult> {
        &self.results
    }

    /// Counts for a node of any tree describing the same hierarchy
    ///
    /// # Errors
    /// Returns [`DevCenterError::NotFound`] if the node's path does not
    /// exist in the materialized tree.
    pub fn reduce<T>(&self, tree: &Organization<T>, node: NodeId) -> Result<DevCenterResult, DevCenterError> {
        self.reduce_path(&tree.path_to(node))
    }

    /// Counts for the organization at `path`
    ///
    /// # Errors
    /// Returns [`DevCenterError::NotFound`] if the path does not resolve.
    pub fn reduce_path(&self, path: &OrgPath) -> Result<DevCenterResult, DevCenterError> {
        let node = self.results.resolve(path)?;
        Ok(self.reduce_node(node))
    }

    /// Counts for the whole tree
    #[must_use]
    pub fn reduce_all(&self) -> DevCenterResult {
        self.reduce_node(self.results.root())
    }

    fn reduce_node(&self, start: NodeId) -> DevCenterResult {
        let mut by_card: IndexMap<_, _> = self
            .devcenter
            .cards()
            .map(|card| (card.clone(), ByMeasure::new(card.measures())))
            .collect();

        let mut seen: HashSet<&RepositoryId> = HashSet::new();
        let mut line_count = 0u64;
        for id in self.results.subtree(start) {
            for repository in self.results.node(id).repositories() {
                if !seen.insert(repository.id()) {
                    continue;
                }

                let result = repository.materialized();
                line_count = line_count.saturating_add(result.line_count().unwrap_or(0));
                for card in self.devcenter.upgrades_and_migrations() {
                    if let (Some(measure), Some(counts)) = (result.upgrade(card), by_card.get_mut(card)) {
                        counts.add(measure, 1);
                    }
                }

                if let Some(counts) = self.devcenter.security().and_then(|s| by_card.get_mut(s)) {
                    for (measure, count) in result.security_issues() {
                        counts.add(measure, count);
                    }
                }
            }
        }

        tracing::debug!(
            path = %self.results.path_to(start),
            repositories = seen.len(),
            lines = line_count,
            "organization reduced"
        );
        DevCenterResult::new(by_card, line_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcenter_model::Card;
    use devcenter_org::OrganizationBuilder;

    fn devcenter() -> DevCenter {
        DevCenter::builder()
            .card(Card::builder("Java").measure("8", "").measure("11", "").measure("17", "").build())
            .build()
            .unwrap()
    }

    #[test]
    fn reducer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DevCenterResultReducer>();
    }

    #[test]
    fn no_inputs_gives_zero_buckets() {
        let tree = OrganizationBuilder::new("root")
            .with_repository(RepositoryId::without_branch("github.com", "a/r"))
            .build();
        let reducer = DevCenterResultReducer::from_csv(devcenter(), &tree, None, None).unwrap();

        let result = reducer.reduce(&tree, tree.root()).unwrap();
        let counts: Vec<_> = result.by_card("Java").unwrap().iter().map(|(_, c)| c).collect();
        assert_eq!(counts, vec![0, 0, 0]);
    }

    #[test]
    fn unknown_card_in_scan_is_not_found() {
        let id = RepositoryId::without_branch("github.com", "a/r");
        let tree = OrganizationBuilder::new("root").with_repository(id.clone()).build();
        let outcome = ScanOutcome {
            repository: id,
            rows: vec![devcenter_table::UpgradeRow::new("Kotlin", 0, "x")],
            security: Vec::new(),
            line_count: None,
        };

        let err = DevCenterResultReducer::from_scans(devcenter(), &tree, [&outcome]).unwrap_err();
        assert!(err.is_not_found());
    }
}

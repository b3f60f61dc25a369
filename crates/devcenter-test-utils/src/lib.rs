//! Testing utilities for the DevCenter workspace
//!
//! Shared fixtures (catalog, organization trees, CSV text) and tracing setup.

#![allow(missing_docs)]

use std::fmt::Write;
use std::sync::Once;

use devcenter_model::measures::{JUnitMeasure, JavaVersionMeasure, SemverMeasure};
use devcenter_model::{Card, DevCenter, RepositoryId};
use devcenter_org::{Organization, OrganizationBuilder};
use devcenter_table::{ScanOutcome, ScanSession};
use tracing_subscriber::EnvFilter;

pub const JAVA: &str = "Move to Java 21";
pub const JACKSON: &str = "Move to Jackson 3";
pub const JUNIT: &str = "Move to JUnit 5";
pub const SECURITY: &str = "OWASP top ten";

static TRACING: Once = Once::new();

/// Route `tracing` output to the test harness, filtered by `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Three migration cards and a security card
pub fn create_test_devcenter() -> DevCenter {
    DevCenter::builder()
        .card(
            Card::builder(JAVA)
                .fix_recipe_id("org.openrewrite.java.migrate.UpgradeToJava21")
                .target("21")
                .measures(JavaVersionMeasure::ALL)
                .build(),
        )
        .card(
            Card::builder(JACKSON)
                .fix_recipe_id("com.fasterxml.jackson.UpgradeJackson_2_3")
                .target("3.0.0")
                .measures(SemverMeasure::ALL)
                .build(),
        )
        .card(Card::builder(JUNIT).measures(JUnitMeasure::ALL).build())
        .security(
            Card::builder(SECURITY)
                .measure("A01", "Broken access control")
                .measure("A03", "Injection")
                .measure("A08", "Software and data integrity failures")
                .build(),
        )
        .build()
        .expect("test catalog is valid")
}

pub fn repo(path: &str) -> RepositoryId {
    RepositoryId::new("github.com", path, Some("main"))
}

/// `root` with children `OrgX` and `OrgY`, both claiming `acme/shared`
pub fn create_sibling_tree() -> Organization<()> {
    OrganizationBuilder::new("root")
        .with_child("OrgX", |x| x.with_repository(repo("acme/shared")))
        .with_child("OrgY", |y| y.with_repository(repo("acme/shared")))
        .build()
}

/// Synthetic `ALL` root over `Default` (payments, search) and `Labs`
///
/// `acme/common` is claimed by both payments and search.
pub fn create_nested_tree() -> Organization<()> {
    OrganizationBuilder::conceptual("ALL")
        .with_child("Default", |d| {
            d.with_child("payments", |p| {
                p.with_repository(repo("acme/ledger"))
                    .with_repository(repo("acme/common"))
            })
            .with_child("search", |s| {
                s.with_repository(repo("acme/search"))
                    .with_repository(repo("acme/common"))
            })
        })
        .with_child("Labs", |l| l.with_repository(repo("acme/prototype")))
        .build()
}

/// Upgrades CSV for `(repository path, card, ordinal)` rows on branch `main`
pub fn upgrades_csv(rows: &[(&str, &str, usize)]) -> String {
    let mut csv = String::from("repositoryOrigin,repositoryPath,repositoryBranch,card,ordinal\n");
    for (path, card, ordinal) in rows {
        let _ = writeln!(csv, "github.com,{path},main,{card},{ordinal}");
    }
    csv
}

/// Security CSV for `(repository path, ordinal)` rows on branch `main`
pub fn security_csv(rows: &[(&str, usize)]) -> String {
    let mut csv = String::from("repositoryOrigin,repositoryPath,repositoryBranch,ordinal,issueName\n");
    for (path, ordinal) in rows {
        let _ = writeln!(csv, "github.com,{path},main,{ordinal},finding");
    }
    csv
}

/// Organization statistics CSV for `(repository path, line count)` rows on
/// branch `main`
pub fn statistics_csv(rows: &[(&str, u64)]) -> String {
    let mut csv = String::from("repositoryOrigin,repositoryPath,repositoryBranch,lineCount\n");
    for (path, lines) in rows {
        let _ = writeln!(csv, "github.com,{path},main,{lines}");
    }
    csv
}

/// Run a scan of `repository` against `devcenter` and return its outcome
pub fn scan<F>(devcenter: &DevCenter, repository: RepositoryId, record: F) -> ScanOutcome
where
    F: FnOnce(&ScanSession),
{
    let session = ScanSession::new(devcenter.clone(), repository);
    record(&session);
    session.finish()
}

use std::fs::File;
use std::io::Write;

use devcenter_model::measures::{JavaVersionMeasure, SemverMeasure};
use devcenter_model::DevCenter;
use devcenter_org::{OrgPath, Organization, OrganizationBuilder, OrganizationReader};
use devcenter_result::{DevCenterError, DevCenterResult, DevCenterResultReducer};
use devcenter_table::{
    OrganizationStatisticsWriter, ScanOutcome, SecurityIssuesWriter, UpgradesAndMigrationsWriter,
};
use devcenter_test_utils::{
    create_nested_tree, create_sibling_tree, create_test_devcenter, init_tracing, repo, scan,
    security_csv, statistics_csv, upgrades_csv, JACKSON, JAVA, JUNIT, SECURITY,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn reducer(
    tree: &Organization<()>,
    upgrades: Option<&str>,
    security: Option<&str>,
) -> Result<DevCenterResultReducer, DevCenterError> {
    let mut upgrades = upgrades.map(str::as_bytes);
    let mut security = security.map(str::as_bytes);
    DevCenterResultReducer::from_csv(
        create_test_devcenter(),
        tree,
        upgrades.as_mut().map(|r| r as &mut dyn std::io::Read),
        security.as_mut().map(|r| r as &mut dyn std::io::Read),
    )
}

fn counts(result: &DevCenterResult, card: &str) -> Vec<u32> {
    result
        .by_card(card)
        .unwrap()
        .iter()
        .map(|(_, count)| count)
        .collect()
}

fn path(text: &str) -> OrgPath {
    text.parse().unwrap()
}

#[test]
fn shared_repository_counts_once_per_reduction() {
    init_tracing();
    let tree = create_sibling_tree();
    let reducer = reducer(&tree, Some(&upgrades_csv(&[("acme/shared", JAVA, 2)])), None).unwrap();

    for node in ["root", "root/OrgX", "root/OrgY"] {
        let result = reducer.reduce_path(&path(node)).unwrap();
        assert_eq!(counts(&result, JAVA), vec![0, 0, 1, 0, 0], "at {node}");
    }

    let root = reducer.reduce(&tree, tree.root()).unwrap();
    assert_eq!(root.total(root.cards().next().unwrap()), 1);
}

#[test]
fn empty_csv_gives_every_bucket_at_zero() {
    init_tracing();
    let tree = create_nested_tree();
    let reducer = reducer(&tree, Some(&upgrades_csv(&[])), Some(&security_csv(&[]))).unwrap();
    let result = reducer.reduce_all();

    let devcenter = create_test_devcenter();
    let cards: Vec<_> = result.cards().map(|c| c.name().to_string()).collect();
    assert_eq!(cards, vec![JAVA, JACKSON, JUNIT, SECURITY]);

    for card in devcenter.cards() {
        let by_measure = result.get(card).unwrap();
        assert_eq!(by_measure.len(), card.measures().len());
        assert_eq!(by_measure.total(), 0);
    }
}

#[test]
fn security_occurrences_are_not_deduplicated() {
    init_tracing();
    let tree = OrganizationBuilder::new("root")
        .with_repository(repo("a/one"))
        .with_repository(repo("a/two"))
        .with_repository(repo("a/three"))
        .build();
    let rows: Vec<_> = ["a/one", "a/two", "a/three"]
        .iter()
        .flat_map(|p| [(*p, 0), (*p, 0)])
        .collect();

    let reducer = reducer(&tree, None, Some(&security_csv(&rows))).unwrap();
    let result = reducer.reduce_all();
    assert_eq!(counts(&result, SECURITY), vec![6, 0, 0]);
}

#[test]
fn nested_reduction_counts_distinct_repositories() {
    init_tracing();
    let tree = create_nested_tree();
    let csv = upgrades_csv(&[
        ("acme/ledger", JAVA, 0),
        ("acme/common", JAVA, 1),
        ("acme/search", JAVA, 1),
        ("acme/prototype", JAVA, 3),
        ("acme/retired", JAVA, 0),
    ]);
    let reducer = reducer(&tree, Some(&csv), None).unwrap();

    assert_eq!(counts(&reducer.reduce_all(), JAVA), vec![1, 2, 0, 1, 0]);
    assert_eq!(
        counts(&reducer.reduce_path(&path("Default")).unwrap(), JAVA),
        vec![1, 2, 0, 0, 0]
    );
    assert_eq!(
        counts(&reducer.reduce_path(&path("Default/search")).unwrap(), JAVA),
        vec![0, 2, 0, 0, 0]
    );
    // cards with no facts still report every bucket
    assert_eq!(
        counts(&reducer.reduce_path(&path("Labs")).unwrap(), JACKSON),
        vec![0, 0, 0, 0]
    );
}

#[test]
fn node_from_another_tree_resolves_by_path() {
    init_tracing();
    let canonical = create_nested_tree();
    let csv = upgrades_csv(&[("acme/search", JUNIT, 0)]);
    let reducer = reducer(&canonical, Some(&csv), None).unwrap();

    // same hierarchy without the synthetic root, as a repos.csv export would give
    let exported = OrganizationReader::new()
        .read(
            "origin,path,branch,org1,org2\n\
             github.com,acme/search,main,search,Default\n"
                .as_bytes(),
        )
        .unwrap();
    let search = exported.child(exported.root(), &["search"]).unwrap();

    let result = reducer.reduce(&exported, search).unwrap();
    assert_eq!(counts(&result, JUNIT), vec![1, 0]);
}

#[test]
fn path_drift_is_not_found() {
    init_tracing();
    let reducer = reducer(&create_nested_tree(), None, None).unwrap();
    let drifted = OrganizationBuilder::new("Default")
        .with_child("billing", |b| b)
        .build();
    let billing = drifted.child(drifted.root(), &["billing"]).unwrap();

    let err = reducer.reduce(&drifted, billing).unwrap_err();
    assert!(err.is_not_found());
    assert!(reducer.reduce_path(&path("Nowhere")).unwrap_err().is_not_found());
}

#[test]
fn unknown_columns_are_ignored() {
    init_tracing();
    let tree = create_sibling_tree();
    let csv = "value,card,repositoryBranch,currentMinimumVersion,repositoryPath,ordinal,repositoryOrigin,extra\n\
               Minor,Move to Jackson 3,main,2.12.3,acme/shared,1,github.com,x\n";
    let reducer = reducer(&tree, Some(csv), None).unwrap();
    assert_eq!(counts(&reducer.reduce_all(), JACKSON), vec![0, 1, 0, 0]);
}

#[test]
fn malformed_security_csv_aborts_whole_ingestion() {
    init_tracing();
    let tree = create_sibling_tree();
    let upgrades = upgrades_csv(&[("acme/shared", JAVA, 1)]);
    let security = "repositoryOrigin,repositoryPath,repositoryBranch,ordinal\n\
                    github.com,acme/shared,main\n";

    let err = reducer(&tree, Some(&upgrades), Some(security)).unwrap_err();
    assert!(matches!(err, DevCenterError::MalformedInput { line: 2, .. }));
}

#[test]
fn ordinal_out_of_range_fails_loudly() {
    init_tracing();
    let tree = create_sibling_tree();
    let err = reducer(&tree, Some(&upgrades_csv(&[("acme/shared", JUNIT, 5)])), None).unwrap_err();
    assert!(matches!(
        err,
        DevCenterError::OrdinalOutOfRange { ordinal: 5, measures: 2, .. }
    ));
}

#[test]
fn java_ordinals_match_all_five_tiers() {
    init_tracing();
    let tree = create_nested_tree();
    let csv = upgrades_csv(&[
        ("acme/ledger", JAVA, 4),
        ("acme/search", JAVA, 3),
        ("acme/prototype", JAVA, 4),
    ]);
    let reducer = reducer(&tree, Some(&csv), None).unwrap();
    let result = reducer.reduce_all();

    assert_eq!(counts(&result, JAVA), vec![0, 0, 0, 1, 2]);
    let names: Vec<_> = result
        .by_card(JAVA)
        .unwrap()
        .iter()
        .map(|(m, _)| m.name().to_string())
        .collect();
    assert_eq!(names[3], "Java 21+");
    assert_eq!(names[4], "Completed");
}

#[test]
fn blank_crlf_lines_between_facts_are_skipped() {
    init_tracing();
    let tree = create_sibling_tree();
    let csv = "repositoryOrigin,repositoryPath,repositoryBranch,card,ordinal\r\n   \r\n\
               github.com,acme/shared,main,Move to JUnit 5,1\r\n\r\n";
    let reducer = reducer(&tree, Some(csv), None).unwrap();
    assert_eq!(counts(&reducer.reduce_all(), JUNIT), vec![0, 1]);
}

#[test]
fn shared_repository_line_count_is_summed_once() {
    init_tracing();
    let siblings = create_sibling_tree();
    let shared = reducer(&siblings, None, None)
        .unwrap()
        .with_statistics(statistics_csv(&[("acme/shared", 900)]).as_bytes())
        .unwrap();
    for node in ["root", "root/OrgX", "root/OrgY"] {
        assert_eq!(shared.reduce_path(&path(node)).unwrap().line_count(), 900, "at {node}");
    }

    let tree = create_nested_tree();
    let stats = statistics_csv(&[
        ("acme/ledger", 1_000),
        ("acme/common", 250),
        ("acme/search", 400),
        ("acme/prototype", 75),
    ]);
    let nested = reducer(&tree, None, None)
        .unwrap()
        .with_statistics(stats.as_bytes())
        .unwrap();

    assert_eq!(nested.reduce_all().line_count(), 1_725);
    assert_eq!(nested.reduce_path(&path("Default")).unwrap().line_count(), 1_650);
    assert_eq!(nested.reduce_path(&path("Default/search")).unwrap().line_count(), 650);
    assert_eq!(nested.reduce_path(&path("Labs")).unwrap().line_count(), 75);
}

#[test]
fn csv_files_on_disk() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let upgrades_path = dir.path().join("upgrades.csv");
    File::create(&upgrades_path)
        .unwrap()
        .write_all(upgrades_csv(&[("acme/shared", JACKSON, 3)]).as_bytes())
        .unwrap();

    let tree = create_sibling_tree();
    let mut file = File::open(&upgrades_path).unwrap();
    let reducer =
        DevCenterResultReducer::from_csv(create_test_devcenter(), &tree, Some(&mut file), None)
            .unwrap();

    let summary = reducer.reduce_all().summary();
    let jackson = summary.cards.iter().find(|c| c.name == JACKSON).unwrap();
    assert_eq!(jackson.total, 1);
    assert_eq!(jackson.measures[3].name, "Completed");
    assert_eq!(jackson.measures[3].count, 1);
}

fn outcomes(devcenter: &DevCenter) -> Vec<ScanOutcome> {
    vec![
        scan(devcenter, repo("acme/ledger"), |s| {
            s.record_measure(JAVA, &JavaVersionMeasure::Java8Plus, None).unwrap();
            s.record_line_count(1_000);
            s.record_measure(JACKSON, &SemverMeasure::Minor, Some("2.12.3")).unwrap();
            s.record_measure(JACKSON, &SemverMeasure::Minor, Some("2.12.5")).unwrap();
            s.record_security_issue(1, "SQL injection").unwrap();
        }),
        scan(devcenter, repo("acme/common"), |s| {
            s.record_measure(JAVA, &JavaVersionMeasure::Java17Plus, None).unwrap();
            s.record_line_count(250);
            s.record_security_issue(1, "SQL injection").unwrap();
            s.record_security_issue(2, "Unsafe deserialization").unwrap();
        }),
        scan(devcenter, repo("acme/prototype"), |s| {
            s.record_measure(JAVA, &JavaVersionMeasure::Completed, None).unwrap();
        }),
        scan(devcenter, repo("acme/untracked"), |s| {
            s.record_measure(JAVA, &JavaVersionMeasure::Java8Plus, None).unwrap();
        }),
    ]
}

#[test]
fn csv_round_trip_matches_in_process_scans() {
    init_tracing();
    let devcenter = create_test_devcenter();
    let tree = create_nested_tree();
    let outcomes = outcomes(&devcenter);

    let mut upgrades = UpgradesAndMigrationsWriter::new(Vec::new()).unwrap();
    upgrades.write_all(&outcomes).unwrap();
    let upgrades = upgrades.into_inner().unwrap();

    let mut security = SecurityIssuesWriter::new(Vec::new()).unwrap();
    security.write_all(&outcomes).unwrap();
    let security = security.into_inner().unwrap();

    let mut statistics = OrganizationStatisticsWriter::new(Vec::new()).unwrap();
    statistics.write_all(&outcomes).unwrap();
    let statistics = statistics.into_inner().unwrap();

    let from_csv = DevCenterResultReducer::from_csv(
        devcenter.clone(),
        &tree,
        Some(&mut upgrades.as_slice()),
        Some(&mut security.as_slice()),
    )
    .unwrap()
    .with_statistics(statistics.as_slice())
    .unwrap();
    let from_scans = DevCenterResultReducer::from_scans(devcenter, &tree, &outcomes).unwrap();

    for node in ["", "Default", "Default/payments", "Default/search", "Labs"] {
        assert_eq!(
            from_csv.reduce_path(&path(node)).unwrap(),
            from_scans.reduce_path(&path(node)).unwrap(),
            "at {node:?}"
        );
    }

    let all = from_scans.reduce_all();
    assert_eq!(counts(&all, JAVA), vec![1, 0, 1, 0, 1]);
    assert_eq!(counts(&all, JACKSON), vec![0, 1, 0, 0]);
    assert_eq!(counts(&all, SECURITY), vec![0, 2, 1]);
    assert_eq!(all.line_count(), 1_250);
    assert_eq!(from_scans.reduce_path(&path("Labs")).unwrap().line_count(), 0);
}

proptest! {
    #[test]
    fn prop_every_declared_measure_has_a_bucket(
        facts in proptest::collection::vec((0..4usize, 0..5usize), 0..12),
    ) {
        let paths = ["acme/ledger", "acme/common", "acme/search", "acme/prototype"];
        let rows: Vec<_> = facts.iter().map(|(p, o)| (paths[*p], JAVA, *o)).collect();
        let tree = create_nested_tree();
        let reducer = reducer(&tree, Some(&upgrades_csv(&rows)), None).unwrap();

        let devcenter = create_test_devcenter();
        for node in ["", "Default", "Labs"] {
            let result = reducer.reduce_path(&path(node)).unwrap();
            for card in devcenter.cards() {
                prop_assert_eq!(result.get(card).map(|b| b.len()), Some(card.measures().len()));
            }
            // one fact per distinct repository at most
            prop_assert!(result.by_card(JAVA).unwrap().total() <= 4);
        }
    }
}

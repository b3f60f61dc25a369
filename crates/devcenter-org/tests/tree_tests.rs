use devcenter_model::RepositoryId;
use devcenter_org::{NodeId, OrgPath, Organization, OrganizationReader};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Random tree: node `i + 1` hangs below one of the nodes created before it
fn build(parents: &[usize], conceptual: bool) -> Organization<()> {
    let mut tree = if conceptual {
        Organization::conceptual("ALL")
    } else {
        Organization::new("root")
    };
    let mut ids = vec![tree.root()];
    for (i, parent) in parents.iter().enumerate() {
        let parent = ids[parent % ids.len()];
        ids.push(tree.add_child(parent, format!("org{i}")));
    }
    tree
}

proptest! {
    #[test]
    fn prop_every_node_visited_once_parent_first(
        parents in proptest::collection::vec(0..64usize, 0..40),
        conceptual in any::<bool>(),
    ) {
        let tree = build(&parents, conceptual);
        let mut order: Vec<NodeId> = Vec::new();
        tree.for_each_organization(|id, node| {
            if let Some(parent) = node.parent() {
                assert!(order.contains(&parent));
            }
            order.push(id);
        });

        prop_assert_eq!(order.len(), tree.len());
        order.sort();
        order.dedup();
        prop_assert_eq!(order.len(), tree.len());
    }

    #[test]
    fn prop_path_resolves_back_to_node(
        parents in proptest::collection::vec(0..64usize, 0..40),
        conceptual in any::<bool>(),
    ) {
        let tree = build(&parents, conceptual);
        for id in tree.subtree(tree.root()) {
            let path = tree.path_to(id);
            prop_assert_eq!(tree.resolve(&path).ok(), Some(id));

            let reparsed: OrgPath = path.to_string().parse().unwrap();
            prop_assert_eq!(reparsed, path);
        }
    }
}

#[test]
fn reader_tree_matches_programmatic_tree() {
    let csv = "\
cloneUrl,branch,origin,path,org1,org2
https://github.com/acme/ledger,main,github.com,acme/ledger,payments,Default
https://github.com/acme/shared,main,github.com,acme/shared,payments,Default
https://github.com/acme/shared,main,github.com,acme/shared,search,Default
";
    let read = OrganizationReader::new().read(csv.as_bytes()).unwrap();

    let shared = RepositoryId::new("github.com", "acme/shared", Some("main"));
    let index = read.repository_index();
    let owners: Vec<String> = index
        .get(&shared)
        .iter()
        .map(|id| read.path_to(*id).to_string())
        .collect();

    assert_eq!(owners, vec!["Default/payments", "Default/search"]);
}

#[test]
fn read_path_reports_missing_file() {
    let err = OrganizationReader::new()
        .read_path("/nonexistent/repos.csv")
        .unwrap_err();
    assert!(matches!(err, devcenter_org::OrgError::Io(_)));
}

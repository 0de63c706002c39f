//! Tests for editing operations on the forest

use rstest::{fixture, rstest};

use orgtree::domain::{flatten, DomainError, NodeData, OrgForest};

/// a
/// ├── b
/// │   └── d
/// └── c
#[fixture]
fn forest() -> OrgForest {
    let mut forest = OrgForest::new();
    forest.insert(NodeData::new("a", "Ada"), None).unwrap();
    forest.insert(NodeData::new("b", "Bob"), Some("a")).unwrap();
    forest.insert(NodeData::new("c", "Cy"), Some("a")).unwrap();
    forest.insert(NodeData::new("d", "Di"), Some("b")).unwrap();
    forest
}

fn pairs(forest: &OrgForest) -> Vec<(String, Option<String>)> {
    flatten(forest)
        .into_iter()
        .map(|r| (r.id, r.parent_id))
        .collect()
}

fn pair(id: &str, parent: Option<&str>) -> (String, Option<String>) {
    (id.to_string(), parent.map(str::to_string))
}

#[rstest]
fn given_sibling_as_new_parent_when_updating_then_subtree_moves(mut forest: OrgForest) {
    // Act
    forest
        .update(NodeData::new("b", "Bob").with_title("Lead"), Some("c"))
        .unwrap();

    // Assert
    assert_eq!(
        pairs(&forest),
        vec![
            pair("a", None),
            pair("c", Some("a")),
            pair("b", Some("c")),
            pair("d", Some("b")),
        ]
    );
    assert_eq!(forest.get("a").unwrap().children.len(), 1);
    assert_eq!(forest.get("b").unwrap().data.title, "Lead");
}

#[rstest]
fn given_no_parent_when_updating_then_node_becomes_last_root(mut forest: OrgForest) {
    forest.update(NodeData::new("b", "Bob"), None).unwrap();

    assert_eq!(forest.roots().len(), 2);
    assert_eq!(
        pairs(&forest),
        vec![
            pair("a", None),
            pair("c", Some("a")),
            pair("b", None),
            pair("d", Some("b")),
        ]
    );
}

#[rstest]
fn given_same_parent_when_updating_then_position_is_kept(mut forest: OrgForest) {
    forest.update(NodeData::new("b", "Robert"), Some("a")).unwrap();

    let order: Vec<String> = flatten(&forest).into_iter().map(|r| r.name).collect();
    assert_eq!(order, vec!["Ada", "Robert", "Di", "Cy"]);
}

#[rstest]
#[case::self_parent("b", "b")]
#[case::child("b", "d")]
#[case::grandchild("a", "d")]
fn given_own_subtree_as_parent_when_updating_then_cycle_is_rejected(
    mut forest: OrgForest,
    #[case] id: &str,
    #[case] parent: &str,
) {
    // Arrange
    let before = pairs(&forest);

    // Act
    let result = forest.update(NodeData::new(id, "Changed"), Some(parent));

    // Assert
    assert_eq!(
        result,
        Err(DomainError::CycleDetected {
            node: id.to_string(),
            parent: parent.to_string()
        })
    );
    assert_eq!(pairs(&forest), before);
    assert_ne!(forest.get(id).unwrap().data.name, "Changed");
}

#[rstest]
fn given_unknown_node_when_updating_then_not_found(mut forest: OrgForest) {
    let result = forest.update(NodeData::new("zz", "Nobody"), None);
    assert_eq!(result, Err(DomainError::NotFound("zz".into())));
}

#[rstest]
fn given_unknown_parent_when_updating_then_nothing_changes(mut forest: OrgForest) {
    let before = pairs(&forest);

    let result = forest.update(NodeData::new("b", "Changed"), Some("zz"));

    assert_eq!(result, Err(DomainError::NotFound("zz".into())));
    assert_eq!(pairs(&forest), before);
    assert_eq!(forest.get("b").unwrap().data.name, "Bob");
}

#[rstest]
fn given_new_node_when_inserting_then_appended_as_last_child(mut forest: OrgForest) {
    forest.insert(NodeData::new("e", "Eve"), Some("a")).unwrap();

    let a = forest.get("a").unwrap();
    let last = a.children.last().and_then(|&i| forest.get_node(i)).unwrap();
    assert_eq!(last.data.id, "e");
    assert_eq!(pairs(&forest).last(), Some(&pair("e", Some("a"))));
}

#[rstest]
fn given_existing_id_when_inserting_then_duplicate_is_rejected(mut forest: OrgForest) {
    let result = forest.insert(NodeData::new("c", "Clone"), None);

    assert_eq!(result, Err(DomainError::DuplicateId("c".into())));
    assert_eq!(forest.len(), 4);
}

#[rstest]
fn given_inner_node_when_deleting_then_descendants_go_too(mut forest: OrgForest) {
    // Act
    let removed = forest.delete("b").unwrap();

    // Assert
    assert_eq!(removed, 2);
    assert!(!forest.contains("b"));
    assert!(!forest.contains("d"));
    assert_eq!(pairs(&forest), vec![pair("a", None), pair("c", Some("a"))]);
}

#[rstest]
fn given_root_when_deleting_then_forest_is_empty(mut forest: OrgForest) {
    assert_eq!(forest.delete("a").unwrap(), 4);
    assert!(forest.is_empty());
    assert!(forest.roots().is_empty());
}

#[rstest]
fn given_deleted_id_when_inserting_again_then_id_is_free(mut forest: OrgForest) {
    forest.delete("d").unwrap();
    forest.insert(NodeData::new("d", "Dana"), Some("c")).unwrap();
    assert_eq!(forest.get("d").unwrap().data.name, "Dana");
}

#[rstest]
fn given_unknown_node_when_deleting_then_not_found(mut forest: OrgForest) {
    assert_eq!(forest.delete("zz"), Err(DomainError::NotFound("zz".into())));
    assert_eq!(forest.len(), 4);
}

#[rstest]
fn given_collapsed_parent_when_toggling_then_children_keep_their_flags(mut forest: OrgForest) {
    // Act
    assert!(forest.toggle_collapse("a").unwrap());
    assert!(forest.toggle_collapse("b").unwrap());
    assert!(!forest.toggle_collapse("a").unwrap());

    // Assert
    assert!(!forest.get("a").unwrap().collapsed);
    assert!(forest.get("b").unwrap().collapsed);
    assert!(!forest.get("d").unwrap().collapsed);
}

#[rstest]
fn given_leaf_when_toggling_then_flag_flips(mut forest: OrgForest) {
    assert!(forest.toggle_collapse("d").unwrap());
    assert!(forest.get("d").unwrap().collapsed);
}

#[rstest]
fn given_node_when_listing_candidate_parents_then_excludes_self_and_descendants(
    forest: OrgForest,
) {
    let ids: Vec<&str> = forest
        .candidate_parents(Some("b"))
        .unwrap()
        .into_iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[rstest]
fn given_new_node_when_listing_candidate_parents_then_all_qualify(forest: OrgForest) {
    let ids: Vec<&str> = forest
        .candidate_parents(None)
        .unwrap()
        .into_iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(ids, vec!["a", "b", "d", "c"]);
}

#[rstest]
fn given_root_when_listing_candidate_parents_then_none_qualify(forest: OrgForest) {
    assert!(forest.candidate_parents(Some("a")).unwrap().is_empty());
}

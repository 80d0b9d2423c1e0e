//! Integration tests for loading seed files

use std::fs;

use tempfile::TempDir;

use treestore::application::{load_seed, ApplicationError};
use treestore::{TreeNode, TreeStore};

#[test]
fn given_json_seed_file_when_loading_then_nodes_are_normalized() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seed.json");
    fs::write(
        &path,
        r#"[
            {"id": 1, "parent": null, "label": "Root"},
            {"id": 2, "parent": "1", "label": "A"},
            {"id": "3", "parent": 2, "label": "B"}
        ]"#,
    )
    .unwrap();

    let nodes = load_seed(&path).unwrap();

    assert_eq!(
        nodes,
        vec![
            TreeNode::root("1", "Root"),
            TreeNode::child("2", "1", "A"),
            TreeNode::child("3", "2", "B"),
        ]
    );
    let store = TreeStore::from_items(nodes);
    assert_eq!(store.get_all_parents("3").len(), 2);
}

#[test]
fn given_toml_seed_file_when_loading_then_reads_node_tables() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seed.toml");
    fs::write(
        &path,
        r#"
[[nodes]]
id = 1
label = "Root"

[[nodes]]
id = 2
parent = 1
label = "A"
"#,
    )
    .unwrap();

    let nodes = load_seed(&path).unwrap();

    assert_eq!(nodes, vec![TreeNode::root(1, "Root"), TreeNode::child(2, 1, "A")]);
}

#[test]
fn given_malformed_seed_when_loading_then_seed_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "[{\"id\": 1, \"label\": ").unwrap();

    let err = load_seed(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Seed { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn given_missing_seed_when_loading_then_operation_failed() {
    let dir = TempDir::new().unwrap();

    let err = load_seed(&dir.path().join("nope.json")).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::model::{Component, ComponentKind};
use serde_json::json;
use std::fs;

fn sample() -> Project {
    Project::new("p1", "Blog")
        .with_component(Component::new("c1", ComponentKind::Element, "Post"))
        .with_component(Component::new("c2", ComponentKind::Worker, "Mailer"))
}

#[test]
fn test_memory_store_roundtrip() {
    let store = MemoryStore::with_projects([sample()]);
    assert_eq!(store.len(), 1);
    assert_eq!(store.find_project("p1").unwrap().unwrap(), sample());
    assert!(store.find_project("nope").unwrap().is_none());
}

#[test]
fn test_memory_store_component_edits_keep_order() {
    let store = MemoryStore::with_projects([sample()]);
    store
        .upsert_component(
            "p1",
            Component::new("c1", ComponentKind::Element, "Article"),
        )
        .unwrap();
    store
        .upsert_component("p1", Component::new("c3", ComponentKind::Helper, "Utils"))
        .unwrap();
    let names: Vec<_> = store
        .find_project("p1")
        .unwrap()
        .unwrap()
        .components
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Article", "Mailer", "Utils"]);

    assert!(store.remove_component("p1", "c2").is_some());
    assert!(store.remove_component("p1", "c2").is_none());
    assert!(store
        .upsert_component("missing", Component::new("x", ComponentKind::Helper, "X"))
        .is_err());
}

#[test]
fn test_memory_store_snapshots_are_independent() {
    let store = MemoryStore::with_projects([sample()]);
    let before = store.find_project("p1").unwrap().unwrap();
    store.remove_component("p1", "c1");
    assert_eq!(before.components.len(), 2);
    assert_eq!(store.find_project("p1").unwrap().unwrap().components.len(), 1);

    assert!(store.remove_project("p1").is_some());
    assert!(store.find_project("p1").unwrap().is_none());
    assert!(store.is_empty());
}

#[test]
fn test_fs_store_reads_json_and_yaml() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("blog.json"),
        serde_json::to_string(&json!({
            "id": "blog",
            "name": "Blog",
            "components": [{ "id": "c1", "type": "element", "name": "Post", "schema": { "properties": [] } }]
        }))
        .unwrap(),
    )
    .unwrap();
    fs::write(
        dir.path().join("shop.yaml"),
        "name: Shop\ncomponents:\n  - id: c1\n    type: worker\n    name: Mailer\n",
    )
    .unwrap();

    let store = FsStore::new(dir.path());
    let blog = store.find_project("blog").unwrap().unwrap();
    assert_eq!(blog.components[0].kind, ComponentKind::Element);

    let shop = store.find_project("shop").unwrap().unwrap();
    assert_eq!(shop.id, "shop");
    assert_eq!(shop.components[0].name, "Mailer");

    assert!(store.find_project("missing").unwrap().is_none());
    assert!(store.find_project("../blog").unwrap().is_none());
    assert_eq!(store.project_ids().unwrap(), ["blog", "shop"]);
}

#[test]
fn test_fs_store_reports_unreadable_documents() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
    let err = FsStore::new(dir.path()).find_project("bad").unwrap_err();
    assert!(err.to_string().contains("Failed to parse project file"));
}

#[test]
fn test_store_is_read_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.json");
    fs::write(&path, r#"{ "id": "p", "name": "First" }"#).unwrap();
    let store = FsStore::new(dir.path());
    assert_eq!(store.find_project("p").unwrap().unwrap().name, "First");
    fs::write(&path, r#"{ "id": "p", "name": "Second" }"#).unwrap();
    assert_eq!(store.find_project("p").unwrap().unwrap().name, "Second");
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for the project linter

use crate::linter::{has_errors, lint_project, LintIssue, LintSeverity};
use crate::model::{Component, ComponentKind, Project};
use serde_json::json;

fn kinds(issues: &[LintIssue]) -> Vec<&str> {
    issues.iter().map(|i| i.kind.as_str()).collect()
}

fn project(components: Vec<Component>) -> Project {
    components
        .into_iter()
        .fold(Project::new("p1", "Lint"), Project::with_component)
}

#[test]
fn test_clean_project_has_no_issues() {
    let issues = lint_project(&project(vec![
        Component::new("e1", ComponentKind::Element, "Post")
            .with_schema(json!({ "properties": [{ "name": "title", "type": "string" }] })),
        Component::new("m1", ComponentKind::Manipulator, "Posts API")
            .with_schema(json!({ "linkedElement": "Post" })),
    ]));
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn test_empty_name_is_an_error() {
    let issues = lint_project(&project(vec![Component::new(
        "w1",
        ComponentKind::Worker,
        "***",
    )]));
    assert_eq!(kinds(&issues), ["empty_name"]);
    assert_eq!(issues[0].severity, LintSeverity::Error);
    assert!(has_errors(&issues));
}

#[test]
fn test_duplicate_paths() {
    let issues = lint_project(&project(vec![
        Component::new("w1", ComponentKind::Worker, "Mailer"),
        Component::new("w2", ComponentKind::Worker, "mailer"),
        Component::new("h1", ComponentKind::Helper, "Mailer"),
    ]));
    assert_eq!(kinds(&issues), ["duplicate_path"]);
    assert_eq!(issues[0].location, "component:mailer");
    assert!(issues[0].message.contains("src/workers/mailer.worker.ts"));
    assert!(!has_errors(&issues));
}

#[test]
fn test_two_manipulators_on_one_element_collide() {
    let issues = lint_project(&project(vec![
        Component::new("e1", ComponentKind::Element, "Post")
            .with_schema(json!({ "properties": [{ "name": "title" }] })),
        Component::new("m1", ComponentKind::Manipulator, "Public API")
            .with_schema(json!({ "linkedElement": "Post" })),
        Component::new("m2", ComponentKind::Manipulator, "Admin API")
            .with_schema(json!({ "linkedElementId": "e1" })),
    ]));
    assert_eq!(kinds(&issues), ["duplicate_path"]);
}

#[test]
fn test_manipulator_links() {
    let issues = lint_project(&project(vec![
        Component::new("m1", ComponentKind::Manipulator, "Loose API"),
        Component::new("m2", ComponentKind::Manipulator, "Dangling API")
            .with_schema(json!({ "linkedElement": "Ghost" })),
    ]));
    assert_eq!(kinds(&issues), ["unlinked_manipulator", "unresolved_link"]);
    assert!(issues[1].message.contains("'Ghost'"));
}

#[test]
fn test_element_checks() {
    let issues = lint_project(&project(vec![
        Component::new("e1", ComponentKind::Element, "Empty"),
        Component::new("e2", ComponentKind::Element, "Post").with_schema(json!({
            "properties": [{ "name": "shape", "type": "hologram" }],
            "relationships": [{ "type": "belongsTo", "target": "Author" }]
        })),
    ]));
    assert_eq!(
        kinds(&issues),
        ["no_properties", "unknown_property_type", "unresolved_link"]
    );
    assert_eq!(issues[1].location, "component:Post/property:shape");
    assert_eq!(issues[1].severity, LintSeverity::Info);
}

#[test]
fn test_invalid_schema() {
    let issues = lint_project(&project(vec![Component::new(
        "e1",
        ComponentKind::Element,
        "Post",
    )
    .with_schema(json!("not an object"))]));
    assert_eq!(kinds(&issues), ["invalid_schema"]);
}

#[test]
fn test_step_and_event_references() {
    let issues = lint_project(&project(vec![
        Component::new("h1", ComponentKind::Helper, "Mailer Utils"),
        Component::new("w1", ComponentKind::Worker, "Digest").with_schema(json!({
            "steps": [
                { "name": "render", "component": "mailer-utils" },
                { "name": "send", "component": "Smtp Gateway" },
                { "name": "by id", "component": "h1" }
            ]
        })),
        Component::new("a1", ComponentKind::Auditor, "Audit").with_schema(json!({
            "events": [{ "name": "sent", "component": "Nowhere" }]
        })),
    ]));
    assert_eq!(
        kinds(&issues),
        ["unresolved_step_component", "unresolved_step_component"]
    );
    assert_eq!(issues[0].location, "component:Digest/step:send");
    assert_eq!(issues[1].location, "component:Audit/event:sent");
}

#[test]
fn test_issue_serializes_for_tooling() {
    let issue = LintIssue::new("component:X", LintSeverity::Warning, "k", "m");
    let value = serde_json::to_value(&issue).unwrap();
    assert_eq!(value["severity"], "warning");
    assert!(value.get("suggestion").is_none());
}

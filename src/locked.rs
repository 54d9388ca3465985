//! # Locked Tests
//!
//! Test cases a component commits to once it is locked. They are read off the
//! typed schema the same way emitters read it, so a locked element's
//! validation rules, a manipulator's routes or a worker's steps each yield one
//! case. Order follows the schema and is stable across calls.

use serde::Serialize;
use std::fmt;

use crate::generator::{ElementView, NameView, OperationsView};
use crate::model::{Component, ComponentSchema, Project, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestCategory {
    Validation,
    Relation,
    Api,
    Job,
    Rule,
    Workflow,
    Audit,
    Security,
    Helper,
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TestCategory::Validation => "validation",
            TestCategory::Relation => "relation",
            TestCategory::Api => "api",
            TestCategory::Job => "job",
            TestCategory::Rule => "rule",
            TestCategory::Workflow => "workflow",
            TestCategory::Audit => "audit",
            TestCategory::Security => "security",
            TestCategory::Helper => "helper",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockedTest {
    pub name: String,
    pub category: TestCategory,
}

impl LockedTest {
    fn new(category: TestCategory, name: impl Into<String>) -> Self {
        LockedTest {
            name: name.into(),
            category,
        }
    }
}

/// Test cases implied by `component`'s schema.
pub fn derive_locked_tests(component: &Component) -> Vec<LockedTest> {
    let mut tests = Vec::new();
    match component.typed_schema() {
        ComponentSchema::Element(schema) => {
            let view = ElementView::new(component, &schema);
            for p in &view.properties {
                if p.required {
                    tests.push(LockedTest::new(
                        TestCategory::Validation,
                        format!("rejects {} without {}", view.names.pascal, p.field),
                    ));
                }
                if let Some(min) = &p.min {
                    tests.push(LockedTest::new(
                        TestCategory::Validation,
                        format!("rejects {} below {min}", p.field),
                    ));
                }
                if let Some(max) = &p.max {
                    tests.push(LockedTest::new(
                        TestCategory::Validation,
                        format!("rejects {} above {max}", p.field),
                    ));
                }
                if p.unique {
                    tests.push(LockedTest::new(
                        TestCategory::Validation,
                        format!("rejects duplicate {}", p.field),
                    ));
                }
                if let Some(union) = &p.enum_union {
                    tests.push(LockedTest::new(
                        TestCategory::Validation,
                        format!("accepts only {union} for {}", p.field),
                    ));
                }
            }
            for r in &view.relations {
                tests.push(LockedTest::new(
                    TestCategory::Relation,
                    format!("loads {} ({} {})", r.field, r.kind, r.target.pascal),
                ));
            }
            if view.soft_delete {
                tests.push(LockedTest::new(
                    TestCategory::Validation,
                    format!("hides deleted {}", view.names.plural_pascal),
                ));
            }
        }
        ComponentSchema::Manipulator(schema) => {
            let ops = OperationsView::from_tags(&schema.operations);
            let resource = NameView::new(
                schema
                    .linked_element
                    .as_deref()
                    .unwrap_or(component.name.as_str()),
            );
            let crud = [
                (ops.list, format!("lists {}", resource.plural_pascal)),
                (ops.read, format!("reads a {} by id", resource.pascal)),
                (ops.read, format!("returns 404 for an unknown {}", resource.pascal)),
                (ops.create, format!("creates a {}", resource.pascal)),
                (ops.create, format!("rejects an invalid {}", resource.pascal)),
                (ops.update, format!("updates a {}", resource.pascal)),
                (ops.delete, format!("deletes a {}", resource.pascal)),
            ];
            tests.extend(
                crud.into_iter()
                    .filter(|(enabled, _)| *enabled)
                    .map(|(_, name)| LockedTest::new(TestCategory::Api, name)),
            );
            for endpoint in &schema.endpoints {
                let method = endpoint.method.trim().to_ascii_uppercase();
                tests.push(LockedTest::new(
                    TestCategory::Api,
                    format!("{method} {} responds", endpoint.path.trim()),
                ));
                if endpoint.auth.unwrap_or(false) {
                    tests.push(LockedTest::new(
                        TestCategory::Security,
                        format!("{method} {} requires authentication", endpoint.path.trim()),
                    ));
                }
            }
        }
        ComponentSchema::Worker(schema) => {
            steps(&mut tests, TestCategory::Job, &schema.steps);
            if let Some(retry) = &schema.retry {
                tests.push(LockedTest::new(
                    TestCategory::Job,
                    format!("retries up to {} times", retry.max_attempts.unwrap_or(3)),
                ));
            }
        }
        ComponentSchema::Helper(schema) => {
            for method in &schema.methods {
                tests.push(LockedTest::new(
                    TestCategory::Helper,
                    format!("{} returns the expected result", method.name),
                ));
            }
        }
        ComponentSchema::Auth(schema) => {
            if let Some(strategy) = &schema.strategy {
                tests.push(LockedTest::new(
                    TestCategory::Security,
                    format!("authenticates with {strategy}"),
                ));
                tests.push(LockedTest::new(
                    TestCategory::Security,
                    "rejects invalid credentials",
                ));
            }
            for provider in &schema.providers {
                tests.push(LockedTest::new(
                    TestCategory::Security,
                    format!("signs in through {provider}"),
                ));
            }
            for role in &schema.roles {
                tests.push(LockedTest::new(
                    TestCategory::Security,
                    format!("restricts access to role {role}"),
                ));
            }
        }
        ComponentSchema::Auditor(schema) => {
            for event in &schema.events {
                tests.push(LockedTest::new(
                    TestCategory::Audit,
                    format!("records {}", event.name),
                ));
            }
            if let Some(days) = schema.retention_days {
                tests.push(LockedTest::new(
                    TestCategory::Audit,
                    format!("purges entries older than {days} days"),
                ));
            }
        }
        ComponentSchema::Enforcer(schema) => {
            for rule in &schema.rules {
                let name = match &rule.condition {
                    Some(condition) => format!("enforces {} ({condition})", rule.name),
                    None => format!("enforces {}", rule.name),
                };
                tests.push(LockedTest::new(TestCategory::Rule, name));
            }
        }
        ComponentSchema::Workflow(schema) => {
            steps(&mut tests, TestCategory::Workflow, &schema.steps);
            if let Some(strategy) = schema.error_handling.as_ref().and_then(|e| e.strategy.as_ref()) {
                tests.push(LockedTest::new(
                    TestCategory::Workflow,
                    format!("handles a failing step with {strategy}"),
                ));
            }
        }
    }
    tests
}

fn steps(tests: &mut Vec<LockedTest>, category: TestCategory, steps: &[Step]) {
    for (i, step) in steps.iter().enumerate() {
        tests.push(LockedTest::new(
            category,
            format!("runs step {} ({})", i + 1, step.name),
        ));
    }
}

/// Locked components of `project` with their tests, in stored order.
pub fn locked_tests_for_project(project: &Project) -> Vec<(&Component, Vec<LockedTest>)> {
    project
        .components
        .iter()
        .filter(|c| c.locked)
        .map(|c| (c, derive_locked_tests(c)))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::model::ComponentKind;
    use serde_json::json;

    fn names(tests: &[LockedTest]) -> Vec<&str> {
        tests.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_element_constraints() {
        let post = Component::new("e1", ComponentKind::Element, "Post").with_schema(json!({
            "properties": [
                { "name": "title", "type": "string", "required": true, "max": 120 },
                { "name": "slug", "unique": true }
            ],
            "relationships": [{ "type": "belongsTo", "target": "Author" }]
        }));
        let tests = derive_locked_tests(&post);
        assert_eq!(
            names(&tests),
            [
                "rejects Post without title",
                "rejects title above 120",
                "rejects duplicate slug",
                "loads author (belongsTo Author)",
            ]
        );
        assert_eq!(tests[3].category, TestCategory::Relation);
    }

    #[test]
    fn test_manipulator_operations_and_endpoints() {
        let api = Component::new("m1", ComponentKind::Manipulator, "Posts API").with_schema(json!({
            "linkedElement": "Post",
            "operations": ["list", "delete"],
            "endpoints": [{ "method": "post", "path": "/:id/publish", "auth": true }]
        }));
        assert_eq!(
            names(&derive_locked_tests(&api)),
            [
                "lists Posts",
                "deletes a Post",
                "POST /:id/publish responds",
                "POST /:id/publish requires authentication",
            ]
        );
    }

    #[test]
    fn test_worker_and_workflow_steps() {
        let worker = Component::new("w1", ComponentKind::Worker, "Mailer").with_schema(json!({
            "steps": [{ "name": "render" }, { "name": "send" }],
            "retry": { "maxAttempts": 5 }
        }));
        assert_eq!(
            names(&derive_locked_tests(&worker)),
            ["runs step 1 (render)", "runs step 2 (send)", "retries up to 5 times"]
        );

        let flow = Component::new("f1", ComponentKind::Workflow, "Checkout").with_schema(json!({
            "steps": [{ "name": "charge" }],
            "errorHandling": { "strategy": "rollback" }
        }));
        let tests = derive_locked_tests(&flow);
        assert_eq!(
            names(&tests),
            ["runs step 1 (charge)", "handles a failing step with rollback"]
        );
        assert!(tests.iter().all(|t| t.category == TestCategory::Workflow));
    }

    #[test]
    fn test_rules_events_and_auth() {
        let enforcer = Component::new("x1", ComponentKind::Enforcer, "Limits").with_schema(json!({
            "rules": [{ "name": "positive amount", "condition": "amount > 0" }]
        }));
        assert_eq!(
            names(&derive_locked_tests(&enforcer)),
            ["enforces positive amount (amount > 0)"]
        );

        let auditor = Component::new("a1", ComponentKind::Auditor, "Audit").with_schema(json!({
            "events": [{ "name": "login" }],
            "retentionDays": 30
        }));
        assert_eq!(
            names(&derive_locked_tests(&auditor)),
            ["records login", "purges entries older than 30 days"]
        );

        let auth = Component::new("s1", ComponentKind::Auth, "Login").with_schema(json!({
            "strategy": "jwt",
            "roles": ["admin"]
        }));
        assert_eq!(
            names(&derive_locked_tests(&auth)),
            [
                "authenticates with jwt",
                "rejects invalid credentials",
                "restricts access to role admin",
            ]
        );
    }

    #[test]
    fn test_only_locked_components_are_listed() {
        let mut locked = Component::new("w1", ComponentKind::Worker, "Mailer");
        locked.locked = true;
        let project = Project::new("p1", "P")
            .with_component(locked)
            .with_component(Component::new("w2", ComponentKind::Worker, "Other"));
        let listed = locked_tests_for_project(&project);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0.id, "w1");
        assert_eq!(derive_locked_tests(&project.components[0]), listed[0].1);
    }
}

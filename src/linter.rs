//! # Project Linter
//!
//! Checks a project's component graph for problems that generation would
//! otherwise paper over: degraded output, silently dropped files, or dangling
//! references between components.
//!
//! ## Checks Performed
//!
//! 1. **Empty names** - a name with no letters or digits has no file name
//! 2. **Duplicate paths** - two components writing the same file (last one wins)
//! 3. **Unreadable schemas** - schema JSON that cannot be read as its kind
//! 4. **Unlinked manipulators** - no `linkedElement` / `linkedElementId`
//! 5. **Unresolved links** - relationship targets, manipulator links, step and
//!    event components that name nothing in the project
//! 6. **Element completeness** - no properties, unknown property types
//!
//! ## Usage
//!
//! ```rust
//! use canvasgen::linter::{lint_project, LintSeverity};
//! use canvasgen::model::{Component, ComponentKind, Project};
//!
//! let project = Project::new("p1", "Blog")
//!     .with_component(Component::new("m1", ComponentKind::Manipulator, "Posts API"));
//!
//! let issues = lint_project(&project);
//! assert!(issues.iter().any(|i| i.kind == "unlinked_manipulator"));
//! assert!(issues.iter().all(|i| i.severity != LintSeverity::Error));
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::generator::emitter_for;
use crate::model::{
    Component, ComponentIndex, ComponentSchema, ElementSchema, ManipulatorSchema, Project, Step,
};
use crate::render::helpers::{is_known_type, kebab_case};

#[cfg(test)]
mod tests;

/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// Error - generation output will be broken
    Error,
    /// Warning - output is degraded or a file is lost
    Warning,
    /// Info - likely unfinished design
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LintSeverity::Error => "error",
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        })
    }
}

/// A lint issue found in a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintIssue {
    /// Where the issue occurred (e.g., "component:Blog Post/property:title")
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g., "unresolved_link")
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl LintIssue {
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

fn location(component: &Component) -> String {
    format!("component:{}", component.name)
}

/// Lint every component of `project`, in stored order.
pub fn lint_project(project: &Project) -> Vec<LintIssue> {
    let index = ComponentIndex::new(&project.components);
    let mut issues = Vec::new();
    let mut claimed: HashMap<String, &Component> = HashMap::new();

    for component in &project.components {
        if kebab_case(&component.name).is_empty() {
            issues.push(
                LintIssue::new(
                    location(component),
                    LintSeverity::Error,
                    "empty_name",
                    format!(
                        "Component '{}' has no letters or digits in its name",
                        component.id
                    ),
                )
                .with_suggestion("Give the component a descriptive name"),
            );
        }

        for path in emitter_for(component.kind).paths(component, &index) {
            if let Some(first) = claimed.get(&path) {
                issues.push(
                    LintIssue::new(
                        location(component),
                        LintSeverity::Warning,
                        "duplicate_path",
                        format!(
                            "'{}' and '{}' both generate {path}; only the last is kept",
                            first.name, component.name
                        ),
                    )
                    .with_suggestion("Rename one of the components"),
                );
            }
            claimed.insert(path, component);
        }

        let schema = match component.try_typed_schema() {
            Ok(schema) => schema,
            Err(err) => {
                issues.push(LintIssue::new(
                    location(component),
                    LintSeverity::Warning,
                    "invalid_schema",
                    format!("Schema cannot be read as a {}: {err}", component.kind),
                ));
                continue;
            }
        };

        match &schema {
            ComponentSchema::Element(element) => {
                lint_element(&mut issues, component, element, &index)
            }
            ComponentSchema::Manipulator(manipulator) => {
                lint_manipulator(&mut issues, component, manipulator, &index)
            }
            ComponentSchema::Worker(worker) => {
                lint_steps(&mut issues, component, &worker.steps, &index)
            }
            ComponentSchema::Workflow(workflow) => {
                lint_steps(&mut issues, component, &workflow.steps, &index)
            }
            ComponentSchema::Auditor(auditor) => {
                for event in &auditor.events {
                    if let Some(target) = &event.component {
                        lint_reference(
                            &mut issues,
                            component,
                            &format!("event:{}", event.name),
                            target,
                            &index,
                        );
                    }
                }
            }
            ComponentSchema::Helper(_) | ComponentSchema::Auth(_) | ComponentSchema::Enforcer(_) => {}
        }
    }

    tracing::debug!(project = %project.id, issues = issues.len(), "linted project");
    issues
}

fn lint_element(
    issues: &mut Vec<LintIssue>,
    component: &Component,
    element: &ElementSchema,
    index: &ComponentIndex<'_>,
) {
    if element.properties.is_empty() {
        issues.push(
            LintIssue::new(
                location(component),
                LintSeverity::Info,
                "no_properties",
                "Element has no properties; its model only has an id",
            )
            .with_suggestion("Add at least one property"),
        );
    }
    for property in &element.properties {
        if !is_known_type(&property.ty) {
            issues.push(
                LintIssue::new(
                    format!("{}/property:{}", location(component), property.name),
                    LintSeverity::Info,
                    "unknown_property_type",
                    format!("Unknown type '{}' is generated as a string", property.ty),
                )
                .with_suggestion("Use string, integer, decimal, boolean, date, json, enum, ..."),
            );
        }
    }
    for relationship in &element.relationships {
        if index.element_named(&relationship.target).is_none() {
            issues.push(LintIssue::new(
                format!("{}/relationship:{}", location(component), relationship.target),
                LintSeverity::Warning,
                "unresolved_link",
                format!(
                    "Relationship target '{}' is not an element of this project",
                    relationship.target
                ),
            ));
        }
    }
}

fn lint_manipulator(
    issues: &mut Vec<LintIssue>,
    component: &Component,
    manipulator: &ManipulatorSchema,
    index: &ComponentIndex<'_>,
) {
    if manipulator.linked_element.is_none() && manipulator.linked_element_id.is_none() {
        issues.push(
            LintIssue::new(
                location(component),
                LintSeverity::Warning,
                "unlinked_manipulator",
                "No linked element; only custom endpoints are generated",
            )
            .with_suggestion("Link the manipulator to an element"),
        );
    } else if index.linked_element(manipulator).is_none() {
        let link = manipulator
            .linked_element
            .as_deref()
            .or(manipulator.linked_element_id.as_deref())
            .unwrap_or_default();
        issues.push(LintIssue::new(
            location(component),
            LintSeverity::Warning,
            "unresolved_link",
            format!("Linked element '{link}' is not an element of this project"),
        ));
    }
}

fn lint_steps(
    issues: &mut Vec<LintIssue>,
    component: &Component,
    steps: &[Step],
    index: &ComponentIndex<'_>,
) {
    for step in steps {
        if let Some(target) = &step.component {
            lint_reference(issues, component, &format!("step:{}", step.name), target, index);
        }
    }
}

fn lint_reference(
    issues: &mut Vec<LintIssue>,
    component: &Component,
    what: &str,
    target: &str,
    index: &ComponentIndex<'_>,
) {
    if index.named(target).is_none() && index.by_id(target).is_none() {
        issues.push(LintIssue::new(
            format!("{}/{what}", location(component)),
            LintSeverity::Warning,
            "unresolved_step_component",
            format!("'{target}' does not name a component of this project"),
        ));
    }
}

pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

/// Print lint issues grouped by severity
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("No lint issues found");
        return;
    }

    let count = |severity| issues.iter().filter(|i| i.severity == severity).count();
    println!(
        "{} error(s), {} warning(s), {} info(s)\n",
        count(LintSeverity::Error),
        count(LintSeverity::Warning),
        count(LintSeverity::Info)
    );

    for severity in [LintSeverity::Error, LintSeverity::Warning, LintSeverity::Info] {
        let group: Vec<_> = issues.iter().filter(|i| i.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        println!("{severity}:");
        for issue in group {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      suggestion: {suggestion}");
            }
        }
        println!();
    }
}

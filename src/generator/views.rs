//! Render contexts.
//!
//! Templates never see raw schema JSON. Each emitter first turns the typed
//! schema into one of these views, where every identifier, type name and
//! literal is already derived, so a template only has to place values.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::model::{
    Component, ComponentIndex, ElementSchema, Endpoint, HelperSchema, ManipulatorSchema, Property,
    RelationKind, Relationship, RetryPolicy, Step, WorkerSchema,
};
use crate::render::helpers::{
    camel_case, host_type, is_known_type, is_upload_type, kebab_case, pascal_case, pluralize,
    schema_type,
};

/// Every spelling of one name that templates need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameView {
    pub name: String,
    pub pascal: String,
    pub camel: String,
    pub kebab: String,
    pub plural_pascal: String,
    pub plural_camel: String,
    pub plural_kebab: String,
}

impl NameView {
    pub fn new(name: &str) -> Self {
        let plural = pluralize(name.trim());
        NameView {
            name: name.to_string(),
            pascal: pascal_case(name),
            camel: camel_case(name),
            kebab: kebab_case(name),
            plural_pascal: pascal_case(&plural),
            plural_camel: camel_case(&plural),
            plural_kebab: kebab_case(&plural),
        }
    }
}

/// Return `base`, or `base2`, `base3`, ... if already taken.
pub(crate) fn unique_ident(seen: &mut HashSet<String>, base: &str) -> String {
    if seen.insert(base.to_string()) {
        return base.to_string();
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{base}{counter}");
        if seen.insert(candidate.clone()) {
            tracing::debug!(base, candidate = %candidate, "renamed duplicate identifier");
            return candidate;
        }
        counter += 1;
    }
}

// ---------------------------------------------------------------------------
// element
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PropertyView {
    /// Name as authored
    pub name: String,
    /// Identifier used in generated code
    pub field: String,
    pub pascal: String,
    /// Abstract type tag
    pub ty: String,
    pub schema_type: String,
    pub ts_type: String,
    pub required: bool,
    pub unique: bool,
    pub is_upload: bool,
    pub known_type: bool,
    /// Type alias name for enums with declared values
    pub enum_type: Option<String>,
    /// `"a" | "b"` union for enums with declared values
    pub enum_union: Option<String>,
    /// Numeric lower bound
    pub min: Option<String>,
    /// Numeric upper bound
    pub max: Option<String>,
    /// Expression compared against `min`/`max` (`input.title.length`, `input.age`)
    pub measure: Option<String>,
    /// Trailing Prisma attributes, each with a leading space
    pub prisma_attrs: String,
    pub default_ts: Option<String>,
    pub description: Option<String>,
}

impl PropertyView {
    pub fn new(owner: &NameView, prop: &Property) -> Self {
        let field = camel_case(&prop.name);
        let pascal = pascal_case(&prop.name);
        let tag = prop.ty.trim().to_ascii_lowercase();
        let host = host_type(&tag);

        let (enum_type, enum_union) = if tag == "enum" && !prop.values.is_empty() {
            let union = prop
                .values
                .iter()
                .map(|v| Value::String(v.clone()).to_string())
                .collect::<Vec<_>>()
                .join(" | ");
            (Some(format!("{}{}", owner.pascal, pascal)), Some(union))
        } else {
            (None, None)
        };
        let ts_type = enum_type.clone().unwrap_or_else(|| host.to_string());

        let measure = match host {
            "string" => Some(format!("input.{field}.length")),
            "number" => Some(format!("input.{field}")),
            _ => None,
        };
        let bound = |v: &Option<Value>| {
            v.as_ref()
                .and_then(Value::as_f64)
                .filter(|_| measure.is_some())
                .map(format_number)
        };
        let min = bound(&prop.min);
        let max = bound(&prop.max);

        let mut prisma_attrs = String::new();
        if prop.unique.unwrap_or(false) {
            prisma_attrs.push_str(" @unique");
        }
        if let Some(default) = prop.default.as_ref().and_then(|d| prisma_default(&tag, d)) {
            prisma_attrs.push_str(&format!(" @default({default})"));
        }

        PropertyView {
            name: prop.name.clone(),
            field,
            pascal,
            ty: prop.ty.clone(),
            schema_type: schema_type(&tag).to_string(),
            ts_type,
            required: prop.is_required(),
            unique: prop.unique.unwrap_or(false),
            is_upload: is_upload_type(&tag),
            known_type: is_known_type(&tag),
            enum_type,
            enum_union,
            measure: measure.filter(|_| prop.min.is_some() || prop.max.is_some()),
            min,
            max,
            prisma_attrs,
            default_ts: prop.default.as_ref().and_then(|d| ts_default(&tag, d)),
            description: prop.description.clone(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn is_now(v: &Value) -> bool {
    v.as_str()
        .is_some_and(|s| s.eq_ignore_ascii_case("now") || s.eq_ignore_ascii_case("now()"))
}

fn prisma_default(tag: &str, value: &Value) -> Option<String> {
    match (schema_type(tag), value) {
        ("DateTime", v) if is_now(v) => Some("now()".to_string()),
        ("Boolean", Value::Bool(b)) => Some(b.to_string()),
        ("Int" | "Float" | "Decimal", Value::Number(n)) => Some(n.to_string()),
        ("String", Value::String(s)) if tag == "uuid" && s.eq_ignore_ascii_case("uuid") => {
            Some("uuid()".to_string())
        }
        ("String", Value::String(s)) => Some(Value::String(s.clone()).to_string()),
        _ => None,
    }
}

fn ts_default(tag: &str, value: &Value) -> Option<String> {
    match (host_type(tag), value) {
        ("Date", v) if is_now(v) => Some("new Date()".to_string()),
        ("boolean", Value::Bool(b)) => Some(b.to_string()),
        ("number", Value::Number(n)) => Some(n.to_string()),
        ("string", Value::String(s)) => Some(Value::String(s.clone()).to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationView {
    pub kind: &'static str,
    pub target: NameView,
    pub field: String,
    pub foreign_key: Option<String>,
    pub ts_type: String,
    pub prisma_lines: Vec<String>,
}

impl RelationView {
    pub fn new(rel: &Relationship) -> Self {
        let target = NameView::new(&rel.target);
        let relation = rel.relation();
        let field = rel
            .field
            .as_deref()
            .map(camel_case)
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| match relation {
                RelationKind::HasMany | RelationKind::ManyToMany => target.plural_camel.clone(),
                RelationKind::BelongsTo | RelationKind::HasOne => target.camel.clone(),
            });
        let (kind, foreign_key, ts_type, prisma_lines) = match relation {
            RelationKind::BelongsTo => {
                let fk = format!("{field}Id");
                let lines = vec![
                    format!(
                        "{field} {} @relation(fields: [{fk}], references: [id])",
                        target.pascal
                    ),
                    format!("{fk} String"),
                ];
                ("belongsTo", Some(fk), target.pascal.clone(), lines)
            }
            RelationKind::HasOne => (
                "hasOne",
                None,
                target.pascal.clone(),
                vec![format!("{field} {}?", target.pascal)],
            ),
            RelationKind::HasMany => (
                "hasMany",
                None,
                format!("{}[]", target.pascal),
                vec![format!("{field} {}[]", target.pascal)],
            ),
            RelationKind::ManyToMany => (
                "manyToMany",
                None,
                format!("{}[]", target.pascal),
                vec![format!("{field} {}[]", target.pascal)],
            ),
        };
        RelationView {
            kind,
            target,
            field,
            foreign_key,
            ts_type,
            prisma_lines,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ElementView {
    #[serde(flatten)]
    pub names: NameView,
    pub description: String,
    pub table_name: Option<String>,
    pub properties: Vec<PropertyView>,
    pub relations: Vec<RelationView>,
    /// Other entities referenced by relations, one per target
    pub imports: Vec<NameView>,
    pub timestamps: bool,
    pub soft_delete: bool,
    pub has_constraints: bool,
    /// Keys left out of the create input type
    pub generated_keys: String,
}

impl ElementView {
    pub fn new(component: &Component, schema: &ElementSchema) -> Self {
        let names = NameView::new(&component.name);
        let mut seen = HashSet::from(["id".to_string()]);
        let properties: Vec<PropertyView> = schema
            .properties
            .iter()
            .filter(|p| {
                let field = camel_case(&p.name);
                !field.is_empty() && seen.insert(field)
            })
            .map(|p| PropertyView::new(&names, p))
            .collect();
        let relations: Vec<RelationView> = schema
            .relationships
            .iter()
            .map(RelationView::new)
            .filter(|r| !r.target.kebab.is_empty() && seen.insert(r.field.clone()))
            .collect();
        let imports: BTreeMap<String, NameView> = relations
            .iter()
            .filter(|r| r.target.kebab != names.kebab)
            .map(|r| (r.target.kebab.clone(), r.target.clone()))
            .collect();

        let timestamps = schema.has_behavior("timestamps");
        let soft_delete = schema.has_behavior("softDelete");
        let mut generated = vec!["'id'"];
        if timestamps {
            generated.extend(["'createdAt'", "'updatedAt'"]);
        }
        if soft_delete {
            generated.push("'deletedAt'");
        }

        ElementView {
            description: component.description().to_string(),
            table_name: schema.table_name.clone().filter(|t| !t.trim().is_empty()),
            has_constraints: properties
                .iter()
                .any(|p| p.required || p.min.is_some() || p.max.is_some()),
            properties,
            relations,
            imports: imports.into_values().collect(),
            timestamps,
            soft_delete,
            generated_keys: generated.join(" | "),
            names,
        }
    }
}

// ---------------------------------------------------------------------------
// manipulator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct OperationsView {
    pub list: bool,
    pub read: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl OperationsView {
    /// No declared operations means full CRUD.
    pub fn from_tags(tags: &[String]) -> Self {
        if tags.is_empty() {
            return OperationsView {
                list: true,
                read: true,
                create: true,
                update: true,
                delete: true,
            };
        }
        let mut ops = OperationsView::default();
        for tag in tags {
            match tag.trim().to_ascii_lowercase().as_str() {
                "list" | "findall" | "index" | "getall" => ops.list = true,
                "read" | "get" | "findone" | "show" | "getone" => ops.read = true,
                "create" | "post" | "insert" => ops.create = true,
                "update" | "put" | "patch" | "edit" => ops.update = true,
                "delete" | "remove" | "destroy" => ops.delete = true,
                other => tracing::debug!(operation = other, "ignoring unknown operation"),
            }
        }
        ops
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointView {
    pub method: String,
    pub path: String,
    pub handler: String,
    pub description: Option<String>,
    pub auth: bool,
}

const METHODS: &[&str] = &["get", "post", "put", "patch", "delete"];

impl EndpointView {
    pub fn new(endpoint: &Endpoint, seen: &mut HashSet<String>) -> Self {
        let method = endpoint.method.trim().to_ascii_lowercase();
        let method = if METHODS.contains(&method.as_str()) {
            method
        } else {
            "get".to_string()
        };
        let mut path = endpoint.path.trim().replace('\'', "\\'");
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        let base = endpoint
            .handler
            .as_deref()
            .map(camel_case)
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| camel_case(&format!("{method} {path}")));
        EndpointView {
            handler: unique_ident(seen, &base),
            method,
            path,
            description: endpoint.description.clone(),
            auth: endpoint.auth.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ControllerView {
    /// Names of the resource the controller serves
    #[serde(flatten)]
    pub names: NameView,
    /// Names of the manipulator component itself
    pub component: NameView,
    pub description: String,
    /// True when the linked element resolved to an element of the project
    pub has_service: bool,
    pub router_name: String,
    pub mount_path: String,
    pub operations: OperationsView,
    pub endpoints: Vec<EndpointView>,
}

impl ControllerView {
    pub fn new(
        component: &Component,
        schema: &ManipulatorSchema,
        index: &ComponentIndex<'_>,
    ) -> Self {
        let linked = index.linked_element(schema);
        let target_name = controller_target(component, schema, index);
        let names = NameView::new(&target_name);
        let mount_path = schema
            .base_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                if p.starts_with('/') {
                    p.to_string()
                } else {
                    format!("/{p}")
                }
            })
            .unwrap_or_else(|| format!("/api/{}", names.plural_kebab));
        let mut seen: HashSet<String> = ["findAll", "findById", "create", "update", "remove"]
            .into_iter()
            .map(String::from)
            .collect();
        ControllerView {
            router_name: format!("{}Router", names.camel),
            component: NameView::new(&component.name),
            description: component.description().to_string(),
            has_service: linked.is_some(),
            mount_path,
            operations: OperationsView::from_tags(&schema.operations),
            endpoints: schema
                .endpoints
                .iter()
                .map(|e| EndpointView::new(e, &mut seen))
                .collect(),
            names,
        }
    }
}

/// Name a manipulator's files are derived from: the linked element's name
/// when it resolves, else the authored `linkedElement`, else the
/// manipulator's own name.
pub fn controller_target(
    component: &Component,
    schema: &ManipulatorSchema,
    index: &ComponentIndex<'_>,
) -> String {
    if let Some(element) = index.linked_element(schema) {
        return element.name.clone();
    }
    schema
        .linked_element
        .as_deref()
        .filter(|name| !kebab_case(name).is_empty())
        .unwrap_or(&component.name)
        .to_string()
}

// ---------------------------------------------------------------------------
// worker / helper
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    pub name: String,
    pub fn_name: String,
    pub summary: String,
    pub component: Option<String>,
}

impl StepView {
    fn new(step: &Step, seen: &mut HashSet<String>) -> Self {
        let base = camel_case(&step.name);
        let base = if base.is_empty() { "step".to_string() } else { base };
        let summary = match (&step.action, &step.description) {
            (Some(action), _) => action.clone(),
            (None, Some(description)) => description.clone(),
            (None, None) => step.name.clone(),
        };
        StepView {
            name: step.name.clone(),
            fn_name: unique_ident(seen, &base),
            summary: summary.replace('\n', " "),
            component: step.component.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RetryView {
    pub max_attempts: u32,
    pub backoff: String,
    pub delay_ms: u64,
}

impl From<&RetryPolicy> for RetryView {
    fn from(retry: &RetryPolicy) -> Self {
        RetryView {
            max_attempts: retry.max_attempts.unwrap_or(3),
            backoff: retry
                .backoff
                .clone()
                .unwrap_or_else(|| "exponential".to_string())
                .replace('\'', ""),
            delay_ms: retry.delay_ms.unwrap_or(1000),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerView {
    #[serde(flatten)]
    pub names: NameView,
    pub description: String,
    pub queue: String,
    pub trigger: Option<String>,
    pub schedule: Option<String>,
    pub retry: Option<RetryView>,
    pub steps: Vec<StepView>,
}

impl WorkerView {
    pub fn new(component: &Component, schema: &WorkerSchema) -> Self {
        let names = NameView::new(&component.name);
        let mut seen = HashSet::from([format!("run{}", names.pascal)]);
        WorkerView {
            description: component.description().to_string(),
            queue: schema
                .queue
                .clone()
                .filter(|q| !q.trim().is_empty())
                .unwrap_or_else(|| names.kebab.clone())
                .replace('\'', ""),
            trigger: schema.trigger.clone(),
            schedule: schema.schedule.as_ref().map(|s| s.replace('\'', "")),
            retry: schema.retry.as_ref().map(RetryView::from),
            steps: schema
                .steps
                .iter()
                .map(|s| StepView::new(s, &mut seen))
                .collect(),
            names,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodView {
    pub name: String,
    pub signature: String,
    pub returns: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HelperView {
    #[serde(flatten)]
    pub names: NameView,
    pub description: String,
    pub methods: Vec<MethodView>,
}

impl HelperView {
    pub fn new(component: &Component, schema: &HelperSchema) -> Self {
        let mut seen = HashSet::new();
        let methods = schema
            .methods
            .iter()
            .map(|m| {
                let base = camel_case(&m.name);
                let base = if base.is_empty() { "helper".to_string() } else { base };
                let signature = m
                    .params
                    .iter()
                    .map(|p| format!("{}: {}", camel_case(&p.name), host_type(&p.ty)))
                    .collect::<Vec<_>>()
                    .join(", ");
                let returns = match m.returns.as_deref().map(str::trim) {
                    None | Some("") | Some("void") => "void".to_string(),
                    Some(tag) if is_known_type(tag) => host_type(tag).to_string(),
                    Some(_) => "unknown".to_string(),
                };
                MethodView {
                    name: unique_ident(&mut seen, &base),
                    signature,
                    returns,
                    description: m.description.clone(),
                }
            })
            .collect();
        HelperView {
            names: NameView::new(&component.name),
            description: component.description().to_string(),
            methods,
        }
    }
}

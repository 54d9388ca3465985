//! Typed views of a component's `schema` blob.
//!
//! Every kind gets its own record shape. All fields are optional and every
//! list is read leniently: an entry that does not fit the expected shape is
//! dropped with a warning instead of failing the whole schema, so that one bad
//! property never blanks out a model.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::project::ComponentKind;

/// Typed component schema, keyed by component kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ComponentSchema {
    Element(ElementSchema),
    Manipulator(ManipulatorSchema),
    Worker(WorkerSchema),
    Helper(HelperSchema),
    Auth(AuthSchema),
    Auditor(AuditorSchema),
    Enforcer(EnforcerSchema),
    Workflow(WorkflowSchema),
}

impl ComponentSchema {
    /// Read `value` as the schema shape for `kind`. `null` reads as an empty schema.
    pub fn from_value(kind: ComponentKind, value: &Value) -> Result<Self, serde_json::Error> {
        let value = match value {
            Value::Null => Value::Object(Default::default()),
            other => other.clone(),
        };
        Ok(match kind {
            ComponentKind::Element => ComponentSchema::Element(serde_json::from_value(value)?),
            ComponentKind::Manipulator => {
                ComponentSchema::Manipulator(serde_json::from_value(value)?)
            }
            ComponentKind::Worker => ComponentSchema::Worker(serde_json::from_value(value)?),
            ComponentKind::Helper => ComponentSchema::Helper(serde_json::from_value(value)?),
            ComponentKind::Auth => ComponentSchema::Auth(serde_json::from_value(value)?),
            ComponentKind::Auditor => ComponentSchema::Auditor(serde_json::from_value(value)?),
            ComponentKind::Enforcer => ComponentSchema::Enforcer(serde_json::from_value(value)?),
            ComponentKind::Workflow => ComponentSchema::Workflow(serde_json::from_value(value)?),
        })
    }

    pub fn empty(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Element => ComponentSchema::Element(Default::default()),
            ComponentKind::Manipulator => ComponentSchema::Manipulator(Default::default()),
            ComponentKind::Worker => ComponentSchema::Worker(Default::default()),
            ComponentKind::Helper => ComponentSchema::Helper(Default::default()),
            ComponentKind::Auth => ComponentSchema::Auth(Default::default()),
            ComponentKind::Auditor => ComponentSchema::Auditor(Default::default()),
            ComponentKind::Enforcer => ComponentSchema::Enforcer(Default::default()),
            ComponentKind::Workflow => ComponentSchema::Workflow(Default::default()),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentSchema::Element(_) => ComponentKind::Element,
            ComponentSchema::Manipulator(_) => ComponentKind::Manipulator,
            ComponentSchema::Worker(_) => ComponentKind::Worker,
            ComponentSchema::Helper(_) => ComponentKind::Helper,
            ComponentSchema::Auth(_) => ComponentKind::Auth,
            ComponentSchema::Auditor(_) => ComponentKind::Auditor,
            ComponentSchema::Enforcer(_) => ComponentKind::Enforcer,
            ComponentSchema::Workflow(_) => ComponentKind::Workflow,
        }
    }
}

// ---------------------------------------------------------------------------
// element
// ---------------------------------------------------------------------------

/// A data entity: ordered properties, relationships to other elements, and
/// opt-in behaviors such as `timestamps` or `softDelete`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementSchema {
    #[serde(deserialize_with = "lenient_vec")]
    pub properties: Vec<Property>,
    #[serde(deserialize_with = "lenient_vec")]
    pub relationships: Vec<Relationship>,
    #[serde(deserialize_with = "flag_list")]
    pub behaviors: Vec<String>,
    #[serde(deserialize_with = "lenient_opt")]
    pub table_name: Option<String>,
}

impl ElementSchema {
    pub fn has_behavior(&self, name: &str) -> bool {
        self.behaviors.iter().any(|b| b.eq_ignore_ascii_case(name))
    }
}

/// One field of an element. `ty` is the abstract type tag (`string`,
/// `integer`, `decimal`, ...); unknown tags are carried as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(rename = "type", default = "default_property_type", deserialize_with = "lenient_tag")]
    pub ty: String,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub required: Option<bool>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub unique: Option<bool>,
    #[serde(default)]
    pub min: Option<Value>,
    #[serde(default)]
    pub max: Option<Value>,
    #[serde(default)]
    pub default: Option<Value>,
    /// Allowed values for `enum` properties
    #[serde(default, alias = "enumValues", alias = "options", deserialize_with = "lenient_vec")]
    pub values: Vec<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub description: Option<String>,
}

fn default_property_type() -> String {
    "string".to_string()
}

impl Property {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// A link from one element to another, by target element name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(rename = "type", alias = "kind", default = "default_relationship_kind")]
    pub kind: String,
    #[serde(alias = "element")]
    pub target: String,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub field: Option<String>,
}

fn default_relationship_kind() -> String {
    "belongsTo".to_string()
}

/// Relationship cardinality, normalized from the free-form tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
    ManyToMany,
}

impl Relationship {
    pub fn relation(&self) -> RelationKind {
        let tag: String = self
            .kind
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match tag.as_str() {
            "hasone" | "onetoone" => RelationKind::HasOne,
            "hasmany" | "onetomany" => RelationKind::HasMany,
            "manytomany" | "belongstomany" => RelationKind::ManyToMany,
            _ => RelationKind::BelongsTo,
        }
    }
}

// ---------------------------------------------------------------------------
// manipulator
// ---------------------------------------------------------------------------

/// A REST surface over one element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManipulatorSchema {
    #[serde(deserialize_with = "lenient_opt")]
    pub linked_element: Option<String>,
    #[serde(deserialize_with = "lenient_opt")]
    pub linked_element_id: Option<String>,
    #[serde(deserialize_with = "lenient_opt")]
    pub base_path: Option<String>,
    /// CRUD operations to expose (`create`, `read`, `update`, `delete`, `list`)
    #[serde(deserialize_with = "lenient_vec")]
    pub operations: Vec<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(default = "default_method")]
    pub method: String,
    pub path: String,
    #[serde(default, alias = "name", deserialize_with = "lenient_opt")]
    pub handler: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub auth: Option<bool>,
}

fn default_method() -> String {
    "GET".to_string()
}

// ---------------------------------------------------------------------------
// worker / helper
// ---------------------------------------------------------------------------

/// A background job bound to a queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkerSchema {
    #[serde(deserialize_with = "lenient_opt")]
    pub queue: Option<String>,
    #[serde(deserialize_with = "lenient_opt")]
    pub trigger: Option<String>,
    #[serde(deserialize_with = "lenient_opt")]
    pub schedule: Option<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub steps: Vec<Step>,
    #[serde(deserialize_with = "lenient_opt")]
    pub retry: Option<RetryPolicy>,
}

/// One step of a worker or workflow. `component` names another component of
/// the same project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub component: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub on_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryPolicy {
    #[serde(alias = "attempts", deserialize_with = "lenient_opt")]
    pub max_attempts: Option<u32>,
    #[serde(deserialize_with = "lenient_opt")]
    pub backoff: Option<String>,
    #[serde(alias = "delay", deserialize_with = "lenient_opt")]
    pub delay_ms: Option<u64>,
}

/// Shared utility functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HelperSchema {
    #[serde(deserialize_with = "lenient_vec")]
    pub methods: Vec<HelperMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelperMethod {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub params: Vec<Param>,
    #[serde(default, alias = "returnType", deserialize_with = "lenient_opt")]
    pub returns: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type", default = "default_property_type", deserialize_with = "lenient_tag")]
    pub ty: String,
}

// ---------------------------------------------------------------------------
// auth / auditor / enforcer / workflow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthSchema {
    #[serde(deserialize_with = "lenient_opt")]
    pub strategy: Option<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub providers: Vec<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub roles: Vec<String>,
    pub session_ttl: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditorSchema {
    #[serde(deserialize_with = "lenient_vec")]
    pub events: Vec<AuditEvent>,
    #[serde(deserialize_with = "lenient_opt")]
    pub retention_days: Option<u32>,
    #[serde(deserialize_with = "lenient_opt")]
    pub sink: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub name: String,
    #[serde(default, alias = "target", deserialize_with = "lenient_opt")]
    pub component: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnforcerSchema {
    #[serde(deserialize_with = "lenient_opt")]
    pub target: Option<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowSchema {
    #[serde(deserialize_with = "lenient_opt")]
    pub trigger: Option<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub steps: Vec<Step>,
    #[serde(deserialize_with = "lenient_opt")]
    pub error_handling: Option<ErrorHandling>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorHandling {
    #[serde(deserialize_with = "lenient_opt")]
    pub strategy: Option<String>,
    #[serde(deserialize_with = "lenient_opt")]
    pub retries: Option<u32>,
    #[serde(deserialize_with = "lenient_opt")]
    pub notify: Option<String>,
}

// ---------------------------------------------------------------------------
// lenient readers
// ---------------------------------------------------------------------------

/// Read a list, dropping entries that do not fit `T`. A non-list reads as empty.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = raw else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(error = %err, "dropping schema entry with unexpected shape");
                None
            }
        })
        .collect())
}

/// Read an optional value; a value of the wrong shape reads as absent.
fn lenient_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| serde_json::from_value(v).ok()))
}

/// Read a type tag; anything but a string reads as `string`.
fn lenient_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        _ => default_property_type(),
    })
}

/// Read behaviors given either as `["timestamps"]` or `{"timestamps": true}`.
fn flag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::Object(map)) => map
            .into_iter()
            .filter(|(_, v)| v.as_bool().unwrap_or(false))
            .map(|(k, _)| k)
            .collect(),
        _ => Vec::new(),
    })
}

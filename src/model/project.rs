use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::schema::ComponentSchema;

/// A user's project: a named canvas holding an ordered list of components.
///
/// The generator reads projects but never writes them. `canvas_data` is the
/// editor's layout blob and is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Owning user; ownership is checked before a request reaches the generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub canvas_data: Value,
    /// Components in stored order
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Project {
            id: id.into(),
            name: name.into(),
            description: None,
            user_id: None,
            canvas_data: Value::Null,
            components: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Components of one kind, in stored order.
    pub fn components_of(&self, kind: ComponentKind) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(move |c| c.kind == kind)
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }
}

/// The closed set of component types a canvas can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Element,
    Manipulator,
    Worker,
    Helper,
    Auth,
    Auditor,
    Enforcer,
    Workflow,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 8] = [
        ComponentKind::Element,
        ComponentKind::Manipulator,
        ComponentKind::Worker,
        ComponentKind::Helper,
        ComponentKind::Auth,
        ComponentKind::Auditor,
        ComponentKind::Enforcer,
        ComponentKind::Workflow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Element => "element",
            ComponentKind::Manipulator => "manipulator",
            ComponentKind::Worker => "worker",
            ComponentKind::Helper => "helper",
            ComponentKind::Auth => "auth",
            ComponentKind::Auditor => "auditor",
            ComponentKind::Enforcer => "enforcer",
            ComponentKind::Workflow => "workflow",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown component type '{s}'"))
    }
}

/// Editor-side status. Informational only; generation ignores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    #[default]
    Draft,
    Ready,
    Error,
}

/// Canvas coordinates. Ignored by generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One typed, named unit of a project's design.
///
/// `schema` is kept exactly as stored; [`Component::typed_schema`] gives the
/// per-kind typed view used by emitters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: Value,
    #[serde(default)]
    pub status: ComponentStatus,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentKind, name: impl Into<String>) -> Self {
        Component {
            id: id.into(),
            kind,
            name: name.into(),
            description: None,
            schema: Value::Null,
            status: ComponentStatus::Draft,
            locked: false,
            position: None,
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Typed view of `schema`, failing on a shape that cannot be read.
    pub fn try_typed_schema(&self) -> Result<ComponentSchema, serde_json::Error> {
        ComponentSchema::from_value(self.kind, &self.schema)
    }

    /// Typed view of `schema`. A shape that cannot be read degrades to the
    /// empty schema for this kind so that generation still produces output.
    pub fn typed_schema(&self) -> ComponentSchema {
        match self.try_typed_schema() {
            Ok(schema) => schema,
            Err(err) => {
                tracing::warn!(
                    component = %self.name,
                    kind = %self.kind,
                    error = %err,
                    "schema unreadable, using empty schema"
                );
                ComponentSchema::empty(self.kind)
            }
        }
    }
}

use std::collections::HashMap;

use super::project::{Component, ComponentKind};
use super::schema::ManipulatorSchema;
use crate::render::helpers::kebab_case;

/// Lookup table over one project's components, built once per generation run.
///
/// Names are matched on their kebab-case form so that `Blog Post`,
/// `blog-post` and `BlogPost` all resolve to the same component.
pub struct ComponentIndex<'a> {
    by_id: HashMap<&'a str, &'a Component>,
    by_key: HashMap<String, Vec<&'a Component>>,
}

impl<'a> ComponentIndex<'a> {
    pub fn new(components: &'a [Component]) -> Self {
        let mut by_id = HashMap::new();
        let mut by_key: HashMap<String, Vec<&'a Component>> = HashMap::new();
        for component in components {
            by_id.insert(component.id.as_str(), component);
            by_key
                .entry(kebab_case(&component.name))
                .or_default()
                .push(component);
        }
        ComponentIndex { by_id, by_key }
    }

    pub fn by_id(&self, id: &str) -> Option<&'a Component> {
        self.by_id.get(id).copied()
    }

    /// First component (in stored order) whose name matches `name`.
    pub fn named(&self, name: &str) -> Option<&'a Component> {
        self.by_key
            .get(&kebab_case(name))
            .and_then(|found| found.first().copied())
    }

    /// First element whose name matches `name`.
    pub fn element_named(&self, name: &str) -> Option<&'a Component> {
        self.by_key.get(&kebab_case(name)).and_then(|found| {
            found
                .iter()
                .copied()
                .find(|c| c.kind == ComponentKind::Element)
        })
    }

    /// Element a manipulator points at: `linkedElement` by name first, then
    /// `linkedElementId` by id.
    pub fn linked_element(&self, schema: &ManipulatorSchema) -> Option<&'a Component> {
        let by_name = schema
            .linked_element
            .as_deref()
            .and_then(|name| self.element_named(name));
        by_name.or_else(|| {
            schema
                .linked_element_id
                .as_deref()
                .and_then(|id| self.by_id(id))
                .filter(|c| c.kind == ComponentKind::Element)
        })
    }
}

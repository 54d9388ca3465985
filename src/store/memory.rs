use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::anyhow;

use super::ProjectStore;
use crate::model::{Component, Project};

/// Projects held in memory. Every read returns a snapshot copy.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: RwLock<HashMap<String, Project>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with `projects` already inserted.
    pub fn with_projects(projects: impl IntoIterator<Item = Project>) -> Self {
        let store = Self::new();
        for project in projects {
            store.insert_project(project);
        }
        store
    }

    /// Insert or replace a project. Returns the previous version, if any.
    pub fn insert_project(&self, project: Project) -> Option<Project> {
        let mut projects = self.projects.write().unwrap_or_else(|e| e.into_inner());
        projects.insert(project.id.clone(), project)
    }

    /// Remove a project together with its components.
    pub fn remove_project(&self, id: &str) -> Option<Project> {
        let mut projects = self.projects.write().unwrap_or_else(|e| e.into_inner());
        projects.remove(id)
    }

    /// Replace the component with the same id, or append it.
    pub fn upsert_component(&self, project_id: &str, component: Component) -> anyhow::Result<()> {
        let mut projects = self.projects.write().unwrap_or_else(|e| e.into_inner());
        let project = projects
            .get_mut(project_id)
            .ok_or_else(|| anyhow!("no project with id '{project_id}'"))?;
        match project.components.iter_mut().find(|c| c.id == component.id) {
            Some(existing) => *existing = component,
            None => project.components.push(component),
        }
        Ok(())
    }

    pub fn remove_component(&self, project_id: &str, component_id: &str) -> Option<Component> {
        let mut projects = self.projects.write().unwrap_or_else(|e| e.into_inner());
        let project = projects.get_mut(project_id)?;
        let position = project
            .components
            .iter()
            .position(|c| c.id == component_id)?;
        Some(project.components.remove(position))
    }

    pub fn len(&self) -> usize {
        self.projects.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProjectStore for MemoryStore {
    fn find_project(&self, id: &str) -> anyhow::Result<Option<Project>> {
        let projects = self.projects.read().unwrap_or_else(|e| e.into_inner());
        Ok(projects.get(id).cloned())
    }
}

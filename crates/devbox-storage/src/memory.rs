//! In-memory storage backend.

use async_trait::async_trait;
use dashmap::DashMap;
use devbox_core::{App, Component, Env};

use crate::component_key;
use crate::error::StorageError;
use crate::traits::{AppStore, ComponentRegistry, EnvStore, ModelStore};

/// In-memory model store backed by `DashMap`.
///
/// Records live for the lifetime of the store; nothing touches disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    components: DashMap<String, Component>,
    apps: DashMap<String, App>,
    envs: DashMap<String, Env>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ComponentRegistry for MemoryStore {
    async fn all_components_by_app(&self, app_id: &str) -> Result<Vec<Component>, StorageError> {
        let mut components: Vec<Component> = self
            .components
            .iter()
            .filter(|entry| entry.value().app_id == app_id)
            .map(|entry| entry.value().clone())
            .collect();
        components.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(components)
    }

    async fn find_component(
        &self,
        app_id: &str,
        name: &str,
    ) -> Result<Option<Component>, StorageError> {
        Ok(self
            .components
            .get(&component_key(app_id, name))
            .map(|entry| entry.value().clone()))
    }

    async fn save_component(&self, component: &Component) -> Result<(), StorageError> {
        if component.name.is_empty() {
            return Err(StorageError::invalid_record("component name must not be empty"));
        }
        self.components.insert(
            component_key(&component.app_id, &component.name),
            component.clone(),
        );
        Ok(())
    }

    async fn delete_component(&self, app_id: &str, name: &str) -> Result<(), StorageError> {
        self.components.remove(&component_key(app_id, name));
        Ok(())
    }
}

#[async_trait]
impl AppStore for MemoryStore {
    async fn load_app(&self, id: &str) -> Result<Option<App>, StorageError> {
        Ok(self.apps.get(id).map(|entry| entry.value().clone()))
    }

    async fn save_app(&self, app: &App) -> Result<(), StorageError> {
        self.apps.insert(app.id.clone(), app.clone());
        Ok(())
    }
}

#[async_trait]
impl EnvStore for MemoryStore {
    async fn load_env(&self, id: &str) -> Result<Option<Env>, StorageError> {
        Ok(self.envs.get(id).map(|entry| entry.value().clone()))
    }

    async fn save_env(&self, env: &Env) -> Result<(), StorageError> {
        self.envs.insert(env.id.clone(), env.clone());
        Ok(())
    }
}

impl ModelStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

//! Storage traits for devbox model records.

use async_trait::async_trait;
use devbox_core::{App, Component, Env};

use crate::error::StorageError;

/// The set of known components for each app.
///
/// At most one record exists per `(app_id, name)`: saving a component with an
/// existing key replaces the stored record.
#[async_trait]
pub trait ComponentRegistry: Send + Sync {
    /// Returns every component registered under `app_id`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues; an unknown app yields
    /// an empty list.
    async fn all_components_by_app(&self, app_id: &str) -> Result<Vec<Component>, StorageError>;

    /// Looks up a single component.
    ///
    /// Returns `None` when no record exists, keeping "not found" distinct from
    /// a failed lookup.
    async fn find_component(
        &self,
        app_id: &str,
        name: &str,
    ) -> Result<Option<Component>, StorageError>;

    /// Inserts or replaces a component record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidRecord` if the key cannot be stored.
    async fn save_component(&self, component: &Component) -> Result<(), StorageError>;

    /// Removes a component record. Removing a missing record is a no-op.
    async fn delete_component(&self, app_id: &str, name: &str) -> Result<(), StorageError>;
}

/// Persistence for [`App`] records.
#[async_trait]
pub trait AppStore: Send + Sync {
    /// Loads an app by id, returning `None` if absent.
    async fn load_app(&self, id: &str) -> Result<Option<App>, StorageError>;

    /// Inserts or replaces an app record.
    async fn save_app(&self, app: &App) -> Result<(), StorageError>;
}

/// Persistence for [`Env`] records.
#[async_trait]
pub trait EnvStore: Send + Sync {
    /// Loads an env by id, returning `None` if absent.
    async fn load_env(&self, id: &str) -> Result<Option<Env>, StorageError>;

    /// Inserts or replaces an env record.
    async fn save_env(&self, env: &Env) -> Result<(), StorageError>;
}

/// A backend able to persist every model record.
pub trait ModelStore: ComponentRegistry + AppStore + EnvStore {
    /// Returns the name of this backend for logging.
    fn backend_name(&self) -> &'static str;
}

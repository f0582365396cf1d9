//! JSON file storage backend.
//!
//! Layout under the data directory:
//!
//! ```text
//! <root>/envs/<env_id>.json
//! <root>/apps/<app_id>.json
//! <root>/components/<app_id>/<name>.json
//! <root>/locks/<app_id>.lock
//! ```
//!
//! Every write goes to a sibling `.tmp` file first and is renamed into place,
//! so a crash never leaves a half-written record behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use devbox_core::{App, Component, Env};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::StorageError;
use crate::lock::{self, AppLock};
use crate::traits::{AppStore, ComponentRegistry, EnvStore, ModelStore};

const RECORD_EXTENSION: &str = "json";

/// Model store persisting each record as a JSON document.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`. Directories are created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Takes the exclusive cross-process lock for `app_id`, waiting while
    /// another process holds it.
    pub async fn lock_app(&self, app_id: &str) -> Result<AppLock, StorageError> {
        let path = self
            .root
            .join("locks")
            .join(format!("{}.lock", segment(app_id)?));
        lock::acquire(path).await
    }

    fn env_path(&self, id: &str) -> Result<PathBuf, StorageError> {
        Ok(self
            .root
            .join("envs")
            .join(format!("{}.{RECORD_EXTENSION}", segment(id)?)))
    }

    fn app_path(&self, id: &str) -> Result<PathBuf, StorageError> {
        Ok(self
            .root
            .join("apps")
            .join(format!("{}.{RECORD_EXTENSION}", segment(id)?)))
    }

    fn components_dir(&self, app_id: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root.join("components").join(segment(app_id)?))
    }

    fn component_path(&self, app_id: &str, name: &str) -> Result<PathBuf, StorageError> {
        Ok(self
            .components_dir(app_id)?
            .join(format!("{}.{RECORD_EXTENSION}", segment(name)?)))
    }
}

/// Rejects keys that would escape their directory.
fn segment(key: &str) -> Result<&str, StorageError> {
    if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
        return Err(StorageError::invalid_record(format!(
            "'{key}' cannot be used as a storage key"
        )));
    }
    Ok(key)
}

async fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StorageError::serialization(path.display().to_string(), e))
}

async fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec_pretty(record)
        .map_err(|e| StorageError::serialization(path.display().to_string(), e))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StorageError::io(parent, e))?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| StorageError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StorageError::io(path, e))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote record");
    Ok(())
}

#[async_trait]
impl ComponentRegistry for FileStore {
    async fn all_components_by_app(&self, app_id: &str) -> Result<Vec<Component>, StorageError> {
        let dir = self.components_dir(app_id)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&dir, e)),
        };

        let mut components = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(component) = read_record::<Component>(&path).await? {
                components.push(component);
            }
        }

        components.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(components)
    }

    async fn find_component(
        &self,
        app_id: &str,
        name: &str,
    ) -> Result<Option<Component>, StorageError> {
        read_record(&self.component_path(app_id, name)?).await
    }

    async fn save_component(&self, component: &Component) -> Result<(), StorageError> {
        let path = self.component_path(&component.app_id, &component.name)?;
        write_record(&path, component).await
    }

    async fn delete_component(&self, app_id: &str, name: &str) -> Result<(), StorageError> {
        let path = self.component_path(app_id, name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&path, e)),
        }
    }
}

#[async_trait]
impl AppStore for FileStore {
    async fn load_app(&self, id: &str) -> Result<Option<App>, StorageError> {
        read_record(&self.app_path(id)?).await
    }

    async fn save_app(&self, app: &App) -> Result<(), StorageError> {
        write_record(&self.app_path(&app.id)?, app).await
    }
}

#[async_trait]
impl EnvStore for FileStore {
    async fn load_env(&self, id: &str) -> Result<Option<Env>, StorageError> {
        read_record(&self.env_path(id)?).await
    }

    async fn save_env(&self, env: &Env) -> Result<(), StorageError> {
        write_record(&self.env_path(&env.id)?, env).await
    }
}

impl ModelStore for FileStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }
}

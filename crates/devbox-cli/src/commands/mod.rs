pub mod auth;
pub mod build;
pub mod config;
pub mod remote;
pub mod sync;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use devbox_core::{App, Env, validate_name};
use devbox_engine::Reconciler;
use devbox_storage::{AppLock, AppStore, EnvStore, FileStore};
use tracing::debug;

use crate::config::ProfileConfig;
use crate::hooks::HookLifecycle;

/// The environment and app a local command operates on.
pub struct LocalEnv {
    store: Arc<FileStore>,
    env_id: String,
    directory: PathBuf,
    app_name: String,
}

impl LocalEnv {
    pub fn open(
        home: &Path,
        cfg: &ProfileConfig,
        env_id: Option<&str>,
        app_name: &str,
    ) -> Result<Self> {
        let directory = std::env::current_dir().context("Cannot determine project directory")?;
        let env_id = match env_id {
            Some(id) => id.to_string(),
            None => env_id_for(&directory),
        };
        validate_name(&env_id).context("Invalid environment id")?;
        validate_name(app_name).context("Invalid app name")?;

        let data_dir = cfg.data_dir(home);
        debug!(data_dir = %data_dir.display(), env_id = %env_id, "Opening local store");
        Ok(Self {
            store: Arc::new(FileStore::new(data_dir)),
            env_id,
            directory,
            app_name: app_name.to_string(),
        })
    }

    pub fn store(&self) -> &Arc<FileStore> {
        &self.store
    }

    pub fn env_id(&self) -> &str {
        &self.env_id
    }

    pub fn app_id(&self) -> String {
        App::new(&self.env_id, &self.app_name).id
    }

    /// Waits for exclusive use of this app's records across processes.
    ///
    /// Take it before loading anything the command will write back.
    pub async fn lock_app(&self) -> Result<AppLock> {
        let app_id = self.app_id();
        debug!(app_id = %app_id, "Locking app");
        self.store
            .lock_app(&app_id)
            .await
            .with_context(|| format!("Failed to lock app {app_id}"))
    }

    /// Loads the env record, or a fresh unsaved one for this directory.
    pub async fn load_or_new_env(&self) -> Result<Env> {
        let existing = self
            .store
            .load_env(&self.env_id)
            .await
            .context("Failed to load environment")?;
        Ok(existing.unwrap_or_else(|| {
            Env::new(self.directory.display().to_string()).with_id(&self.env_id)
        }))
    }

    /// Loads the env record, failing if nothing was ever built.
    pub async fn load_built_env(&self) -> Result<Env> {
        let env = self
            .store
            .load_env(&self.env_id)
            .await
            .context("Failed to load environment")?;
        match env {
            Some(env) if !env.built_boxfile.is_empty() => Ok(env),
            _ => anyhow::bail!(
                "Nothing built for environment {}. Run: devbox build",
                self.env_id
            ),
        }
    }

    pub async fn load_app(&self) -> Result<Option<App>> {
        self.store
            .load_app(&self.app_id())
            .await
            .context("Failed to load app")
    }

    /// Loads the app record, creating and saving it on first use.
    pub async fn load_or_create_app(&self) -> Result<App> {
        if let Some(app) = self.load_app().await? {
            return Ok(app);
        }
        let app = App::new(&self.env_id, &self.app_name);
        self.store
            .save_app(&app)
            .await
            .context("Failed to create app")?;
        Ok(app)
    }

    pub fn reconciler(&self, cfg: &ProfileConfig) -> Reconciler {
        let lifecycle = HookLifecycle::new(cfg.setup_hook.clone(), cfg.destroy_hook.clone())
            .with_workdir(&self.directory);
        Reconciler::new(self.store.clone(), Arc::new(lifecycle))
    }
}

/// Derives an environment id from the project directory's name.
pub fn env_id_for(directory: &Path) -> String {
    let slug: String = directory
        .file_name()
        .map(|name| name.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .take(64)
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "default".to_string()
    } else {
        slug.to_string()
    }
}

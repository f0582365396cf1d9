//! Component lifecycle backed by user-configured shell hooks.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use devbox_core::{App, Component};
use devbox_engine::{ComponentLifecycle, LifecycleError};
use tokio::process::Command;
use tracing::{debug, info};

/// Runs `setup_hook` / `destroy_hook` through `sh -c` for each component.
///
/// The component is described to the hook through `DEVBOX_APP_ID`,
/// `DEVBOX_COMPONENT`, `DEVBOX_LABEL` and `DEVBOX_IMAGE`. A missing hook makes
/// the operation a logged no-op.
#[derive(Debug, Clone, Default)]
pub struct HookLifecycle {
    setup_hook: Option<String>,
    destroy_hook: Option<String>,
    workdir: Option<PathBuf>,
}

impl HookLifecycle {
    pub fn new(setup_hook: Option<String>, destroy_hook: Option<String>) -> Self {
        Self {
            setup_hook,
            destroy_hook,
            workdir: None,
        }
    }

    /// Runs hooks from `dir` instead of the current directory.
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    async fn run(
        &self,
        action: &str,
        hook: Option<&str>,
        app: &App,
        component: &Component,
    ) -> Result<(), LifecycleError> {
        let Some(hook) = hook else {
            info!(
                component = %component.name,
                image = %component.image,
                "No {action} hook configured"
            );
            return Ok(());
        };

        debug!(component = %component.name, hook, "Running {action} hook");
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(hook)
            .env("DEVBOX_APP_ID", &app.id)
            .env("DEVBOX_COMPONENT", &component.name)
            .env("DEVBOX_LABEL", &component.label)
            .env("DEVBOX_IMAGE", &component.image)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| {
            LifecycleError::with_source(format!("failed to run {action} hook `{hook}`"), e)
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LifecycleError::new(format!(
                "{action} hook exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ComponentLifecycle for HookLifecycle {
    async fn setup(&self, app: &App, component: &Component) -> Result<(), LifecycleError> {
        self.run("setup", self.setup_hook.as_deref(), app, component)
            .await
    }

    async fn destroy(&self, app: &App, component: &Component) -> Result<(), LifecycleError> {
        self.run("destroy", self.destroy_hook.as_deref(), app, component)
            .await
    }
}

use devbox_core::{App, AppState};
use devbox_storage::DynStore;
use tracing::{error, info};

use crate::error::RecordError;

/// Persists the boxfile an app has just converged to.
#[derive(Clone)]
pub struct DeploymentRecorder {
    store: DynStore,
}

impl DeploymentRecorder {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// Saves a copy of `app` whose deployed boxfile is `built`, byte for byte.
    ///
    /// The caller's value is left untouched; it should be replaced with the
    /// returned copy only once this succeeds. Recording the same content twice
    /// leaves the stored deployed boxfile unchanged.
    pub async fn record(&self, app: &App, built: &str) -> Result<App, RecordError> {
        let mut next = app.clone();
        next.deployed_boxfile = built.to_string();
        next.state = AppState::Active;
        next.touch();
        self.persist(next).await
    }

    /// Saves a copy of `app` with no deployed boxfile, as after a full teardown.
    pub async fn clear(&self, app: &App) -> Result<App, RecordError> {
        let mut next = app.clone();
        next.deployed_boxfile.clear();
        next.state = AppState::Initialized;
        next.touch();
        self.persist(next).await
    }

    async fn persist(&self, app: App) -> Result<App, RecordError> {
        if let Err(e) = self.store.save_app(&app).await {
            error!(app_id = %app.id, error = %e, "Failed to save app record");
            return Err(RecordError::new(&app.id, e));
        }
        info!(
            app_id = %app.id,
            bytes = app.deployed_boxfile.len(),
            "Recorded deployed boxfile"
        );
        Ok(app)
    }
}

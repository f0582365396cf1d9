//! Convergence of an app's components with its built boxfile.

mod provision;
mod purge;

use devbox_boxfile::Boxfile;
use devbox_core::{App, Env};
use devbox_storage::DynStore;
use tracing::{error, info};

use crate::error::SyncError;
use crate::lifecycle::DynLifecycle;
use crate::recorder::DeploymentRecorder;

pub use provision::provision_components;
pub use purge::{purge_all_components, purge_delta_components};

/// What a single phase of a pass changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Nothing needed to change.
    UpToDate,
    /// Names of the components acted on, in the order they were processed.
    Changed(Vec<String>),
}

impl PhaseOutcome {
    pub(crate) fn from_changes(changed: Vec<String>) -> Self {
        if changed.is_empty() {
            Self::UpToDate
        } else {
            Self::Changed(changed)
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Self::UpToDate)
    }

    pub fn changed(&self) -> &[String] {
        match self {
            Self::UpToDate => &[],
            Self::Changed(names) => names,
        }
    }
}

/// Outcome of a successful convergence pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Components destroyed because their configuration changed or disappeared.
    pub purged: PhaseOutcome,
    /// Data components set up because they had no active record.
    pub provisioned: PhaseOutcome,
}

impl SyncReport {
    pub fn is_up_to_date(&self) -> bool {
        self.purged.is_up_to_date() && self.provisioned.is_up_to_date()
    }
}

/// Drives convergence passes for apps stored in a [`ModelStore`](devbox_storage::ModelStore).
///
/// The reconciler holds no per-app state. Callers must not run two passes
/// for the same app at once; `FileStore::lock_app` serializes processes.
#[derive(Clone)]
pub struct Reconciler {
    store: DynStore,
    lifecycle: DynLifecycle,
    recorder: DeploymentRecorder,
}

impl Reconciler {
    pub fn new(store: DynStore, lifecycle: DynLifecycle) -> Self {
        let recorder = DeploymentRecorder::new(store.clone());
        Self {
            store,
            lifecycle,
            recorder,
        }
    }

    /// Converges `app`'s components with `env`'s built boxfile.
    ///
    /// Purges delta components, provisions missing data components, then
    /// records the built boxfile as deployed. `app` is replaced with the
    /// recorded copy only when every step succeeded; on error it is left
    /// exactly as it was passed in.
    pub async fn sync(&self, env: &Env, app: &mut App) -> Result<SyncReport, SyncError> {
        info!(app_id = %app.id, env_id = %env.id, "Deploying application");

        let built = Boxfile::new(&env.built_boxfile);
        let deployed = Boxfile::new(&app.deployed_boxfile);

        let purged = purge_delta_components(
            self.store.as_ref(),
            self.lifecycle.as_ref(),
            app,
            &built,
            &deployed,
        )
        .await
        .map_err(|e| {
            error!(app_id = %app.id, error = %e, "Purge phase failed");
            SyncError::Purge(e)
        })?;

        let provisioned =
            provision_components(self.store.as_ref(), self.lifecycle.as_ref(), app, &built)
                .await
                .map_err(|e| {
                    error!(app_id = %app.id, error = %e, "Provision phase failed");
                    SyncError::Provision(e)
                })?;

        *app = self.recorder.record(app, &env.built_boxfile).await?;

        info!(
            app_id = %app.id,
            purged = purged.changed().len(),
            provisioned = provisioned.changed().len(),
            "Application deployed"
        );
        Ok(SyncReport {
            purged,
            provisioned,
        })
    }

    /// Destroys every component of `app` except platform services and clears
    /// its deployed boxfile.
    ///
    /// Fails fast like [`sync`](Self::sync); the deployed boxfile is only
    /// cleared after every destroy succeeded.
    pub async fn teardown(&self, app: &mut App) -> Result<PhaseOutcome, SyncError> {
        info!(app_id = %app.id, "Tearing down application");

        let removed = purge_all_components(self.store.as_ref(), self.lifecycle.as_ref(), app)
            .await
            .map_err(SyncError::Purge)?;

        *app = self.recorder.clear(app).await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_changes_are_up_to_date() {
        let outcome = PhaseOutcome::from_changes(Vec::new());
        assert!(outcome.is_up_to_date());
        assert!(outcome.changed().is_empty());

        let outcome = PhaseOutcome::from_changes(vec!["data.db".into()]);
        assert_eq!(outcome.changed(), ["data.db".to_string()]);
    }

    #[test]
    fn test_report_needs_both_phases_idle() {
        let report = SyncReport {
            purged: PhaseOutcome::UpToDate,
            provisioned: PhaseOutcome::Changed(vec!["data.db".into()]),
        };
        assert!(!report.is_up_to_date());
    }
}

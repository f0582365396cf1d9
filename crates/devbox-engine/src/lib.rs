//! # devbox-engine
//!
//! Converges an app's components with its most recently built boxfile.
//!
//! A convergence pass ([`Reconciler::sync`]) runs in three strictly sequential steps:
//!
//! 1. **Purge**: every registered component whose boxfile node changed or
//!    disappeared since the last deploy is destroyed and unregistered.
//!    Platform services (`portal`, `hoarder`, `mist`, `logvac`) are never touched.
//! 2. **Provision**: every `data.*` node without an active component is set up.
//! 3. **Record**: the built boxfile becomes the app's deployed boxfile.
//!
//! The first failure aborts the pass. The deployed boxfile is only replaced
//! once both phases succeed, so a failed pass is retried from the same diff
//! next time.
//!
//! Provisioning mechanics are supplied by the caller through
//! [`ComponentLifecycle`].

mod error;
mod lifecycle;
pub mod reconcile;
mod recorder;

pub use error::{ComponentError, LifecycleError, Phase, RecordError, SyncError};
pub use lifecycle::{ComponentLifecycle, DynLifecycle};
pub use reconcile::{PhaseOutcome, Reconciler, SyncReport};
pub use recorder::DeploymentRecorder;

use std::sync::Arc;

use async_trait::async_trait;
use devbox_core::{App, Component};

use crate::error::LifecycleError;

/// Provisioning mechanics for a single component.
///
/// Both calls may block for as long as the underlying work takes; the engine
/// awaits them one at a time and never retries. Implementations are not
/// required to be idempotent: the engine only calls `setup` for components
/// without an active record and `destroy` for components whose boxfile node
/// changed, so a converged component is never set up or destroyed again.
#[async_trait]
pub trait ComponentLifecycle: Send + Sync {
    /// Brings `component` up. On success the engine marks it active.
    async fn setup(&self, app: &App, component: &Component) -> Result<(), LifecycleError>;

    /// Tears `component` down. On success the engine drops its record.
    async fn destroy(&self, app: &App, component: &Component) -> Result<(), LifecycleError>;
}

/// Type alias for a shareable lifecycle collaborator.
pub type DynLifecycle = Arc<dyn ComponentLifecycle>;

//! Error types for convergence passes.
//!
//! Messages carry only their own context; the underlying cause is exposed via
//! `source()` so callers can print the full chain.

use std::fmt;

use devbox_storage::StorageError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by a [`ComponentLifecycle`](crate::ComponentLifecycle) collaborator.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct LifecycleError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl LifecycleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// The deployed boxfile could not be persisted.
///
/// Raised after live component state has already changed; the stored app
/// keeps its previous deployed boxfile.
#[derive(Debug, thiserror::Error)]
#[error("failed to persist deployed boxfile for app {app_id}")]
pub struct RecordError {
    app_id: String,
    #[source]
    source: StorageError,
}

impl RecordError {
    pub fn new(app_id: impl Into<String>, source: StorageError) -> Self {
        Self {
            app_id: app_id.into(),
            source,
        }
    }
}

/// A failure touching a single component (or the component listing).
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    #[error("failed to load app components")]
    Load(#[source] StorageError),

    #[error("failed to look up component ({component})")]
    Lookup {
        component: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to destroy component ({component})")]
    Destroy {
        component: String,
        #[source]
        source: LifecycleError,
    },

    #[error("failed to setup component ({component})")]
    Setup {
        component: String,
        #[source]
        source: LifecycleError,
    },

    #[error("failed to update component record ({component})")]
    Registry {
        component: String,
        #[source]
        source: StorageError,
    },
}

impl ComponentError {
    /// Name of the component involved, if the failure concerned one.
    pub fn component(&self) -> Option<&str> {
        match self {
            Self::Load(_) => None,
            Self::Lookup { component, .. }
            | Self::Destroy { component, .. }
            | Self::Setup { component, .. }
            | Self::Registry { component, .. } => Some(component),
        }
    }
}

/// The step of a convergence pass that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Purge,
    Provision,
    Record,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Purge => write!(f, "purge"),
            Self::Provision => write!(f, "provision"),
            Self::Record => write!(f, "record"),
        }
    }
}

/// Errors returned by [`Reconciler::sync`](crate::Reconciler::sync).
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("failed to purge delta components")]
    Purge(#[source] ComponentError),

    #[error("failed to provision components")]
    Provision(#[source] ComponentError),

    #[error("failed to update deployed boxfile on app")]
    Persist(#[from] RecordError),
}

impl SyncError {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Purge(_) => Phase::Purge,
            Self::Provision(_) => Phase::Provision,
            Self::Persist(_) => Phase::Record,
        }
    }

    /// `true` when convergence succeeded but recording it did not.
    pub fn is_persist_failure(&self) -> bool {
        matches!(self, Self::Persist(_))
    }

    /// Name of the component whose operation failed, if any.
    pub fn component(&self) -> Option<&str> {
        match self {
            Self::Purge(e) | Self::Provision(e) => e.component(),
            Self::Persist(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_lifecycle_error_chain() {
        let io = std::io::Error::other("exit status 1");
        let err = LifecycleError::with_source("setup hook failed", io);
        assert_eq!(err.to_string(), "setup hook failed");
        assert_eq!(err.source().unwrap().to_string(), "exit status 1");
        assert!(LifecycleError::new("plain").source().is_none());
    }

    #[test]
    fn test_sync_error_accessors() {
        let err = SyncError::Purge(ComponentError::Destroy {
            component: "web.site".into(),
            source: LifecycleError::new("boom"),
        });
        assert_eq!(err.phase(), Phase::Purge);
        assert_eq!(err.component(), Some("web.site"));
        assert!(!err.is_persist_failure());
        assert_eq!(err.to_string(), "failed to purge delta components");
        assert_eq!(
            err.source().unwrap().to_string(),
            "failed to destroy component (web.site)"
        );
    }

    #[test]
    fn test_persist_error_is_distinct() {
        let err: SyncError = RecordError::new("env_dev", StorageError::internal("disk full")).into();
        assert!(err.is_persist_failure());
        assert_eq!(err.phase(), Phase::Record);
        assert!(err.component().is_none());
    }

    #[test]
    fn test_load_error_has_no_component() {
        let err = SyncError::Purge(ComponentError::Load(StorageError::internal("down")));
        assert!(err.component().is_none());
        assert_eq!(Phase::Provision.to_string(), "provision");
    }
}

//! # devbox-storage
//!
//! Persistence layer for devbox model records.
//!
//! This crate defines the traits the reconciliation engine and the CLI program
//! against, plus two backends:
//!
//! - [`MemoryStore`]: lock-free in-process maps, used by tests and short-lived tools
//! - [`FileStore`]: one JSON document per record under a data directory
//!
//! [`FileStore::lock_app`] serializes processes that mutate the same app.
//!
//! ## Example
//!
//! ```ignore
//! use devbox_storage::{ComponentRegistry, MemoryStore};
//!
//! async fn active_names(store: &MemoryStore, app_id: &str) -> Result<Vec<String>, StorageError> {
//!     let components = store.all_components_by_app(app_id).await?;
//!     Ok(components
//!         .into_iter()
//!         .filter(|c| c.is_active())
//!         .map(|c| c.name)
//!         .collect())
//! }
//! ```

mod error;
pub mod file;
mod lock;
pub mod memory;
mod traits;

pub use error::StorageError;
pub use file::FileStore;
pub use lock::AppLock;
pub use memory::MemoryStore;
pub use traits::{AppStore, ComponentRegistry, EnvStore, ModelStore};

/// Type alias for a shareable store trait object.
pub type DynStore = std::sync::Arc<dyn ModelStore>;

/// Storage key for a component: `app_id/name`.
pub(crate) fn component_key(app_id: &str, name: &str) -> String {
    format!("{app_id}/{name}")
}

//! # devbox-boxfile
//!
//! Read-only views over a boxfile, the declarative YAML document describing an
//! app's components.
//!
//! A boxfile addresses components by top-level key. Keys of the form
//! `<category>.<name>` (for example `data.db` or `web.site`) belong to a
//! category, which is how data services are told apart from code services:
//!
//! ```yaml
//! run.config:
//!   engine: ruby
//! web.site:
//!   start: bundle exec puma
//! data.db:
//!   image: postgres:13
//! ```
//!
//! The [`ConfigSnapshot`] trait is the contract consumers program against;
//! [`Boxfile`] is the YAML-backed implementation.

mod boxfile;
mod error;
mod node;

pub use boxfile::Boxfile;
pub use error::BoxfileError;
pub use node::Node;

/// Category holding declarative data services.
pub const DATA_CATEGORY: &str = "data";

/// A parsed, immutable view over a versioned configuration blob.
///
/// Lookups never fail: a missing entry comes back as an invalid [`Node`].
pub trait ConfigSnapshot: Send + Sync {
    /// Returns the node stored under `name`, or an invalid node when absent.
    fn node(&self, name: &str) -> Node;

    /// Returns the names of all nodes tagged with `category`, in document order.
    fn nodes(&self, category: &str) -> Vec<String>;
}

//! # devbox-odin
//!
//! Client for the remote control plane ("odin") that hosts production apps.
//!
//! Every call is a single JSON request; there is no retry and no caching.
//! Credentials are handed to [`OdinClient::new`] explicitly and attached to
//! every request as the `auth_token` query parameter.

mod client;
mod error;
mod types;

pub use client::OdinClient;
pub use error::OdinError;
pub use types::{AccessChannel, AppDescriptor, Credentials, DeployRequest, Warehouse};

/// Result alias for control-plane calls.
pub type OdinResult<T> = Result<T, OdinError>;

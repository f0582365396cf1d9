pub mod error;
pub mod id;
pub mod model;
pub mod timestamp;

pub use error::{CoreError, Result};
pub use id::{generate_id, validate_name};
pub use model::{
    App, AppState, Component, ComponentState, Env, PLATFORM_COMPONENTS, is_platform_component,
};
pub use timestamp::{format_rfc3339, now_utc};

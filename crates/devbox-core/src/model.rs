//! Model records persisted by devbox.
//!
//! An [`Env`] holds the most recently built boxfile, an [`App`] holds the boxfile
//! it was last converged to, and each [`Component`] is one service instance
//! owned by an app.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::id::generate_id;
use crate::timestamp::now_utc;

/// Services managed by the platform itself rather than by the user's boxfile.
pub const PLATFORM_COMPONENTS: [&str; 4] = ["portal", "hoarder", "mist", "logvac"];

/// Returns `true` if `name` belongs to a platform-managed service.
pub fn is_platform_component(name: &str) -> bool {
    PLATFORM_COMPONENTS.contains(&name)
}

/// The local build environment for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Env {
    pub id: String,
    /// Project root the boxfile was read from.
    pub directory: String,
    /// Raw text of the most recently built boxfile.
    #[serde(default)]
    pub built_boxfile: String,
    /// Identifier of the build that produced `built_boxfile`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Env {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            directory: directory.into(),
            built_boxfile: String::new(),
            built_id: None,
            updated_at: now_utc(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Records a freshly built boxfile.
    pub fn set_built(&mut self, boxfile: impl Into<String>, build_id: Option<String>) {
        self.built_boxfile = boxfile.into();
        self.built_id = build_id;
        self.updated_at = now_utc();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    #[default]
    Initialized,
    Active,
}

/// A deployable application inside an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    pub env_id: String,
    pub name: String,
    #[serde(default)]
    pub state: AppState,
    /// Raw text of the boxfile the app was last successfully converged to.
    #[serde(default)]
    pub deployed_boxfile: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl App {
    pub fn new(env_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = now_utc();
        let env_id = env_id.into();
        let name = name.into();
        Self {
            id: format!("{env_id}_{name}"),
            env_id,
            name,
            state: AppState::default(),
            deployed_boxfile: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_deployed(&self) -> bool {
        !self.deployed_boxfile.is_empty()
    }

    pub fn touch(&mut self) {
        self.updated_at = now_utc();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    #[default]
    Inactive,
    Active,
}

impl std::fmt::Display for ComponentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Active => write!(f, "active"),
        }
    }
}

/// One named service instance belonging to an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub app_id: String,
    /// Stable identifier matching a boxfile node name, e.g. `data.db`.
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub state: ComponentState,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Component {
    /// Creates an inactive component whose label defaults to its name.
    pub fn new(app_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = now_utc();
        let name = name.into();
        Self {
            app_id: app_id.into(),
            label: name.clone(),
            name,
            image: String::new(),
            state: ComponentState::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_state(mut self, state: ComponentState) -> Self {
        self.state = state;
        self
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ComponentState::Active)
    }

    pub fn is_platform(&self) -> bool {
        is_platform_component(&self.name)
    }

    pub fn mark_active(&mut self) {
        self.state = ComponentState::Active;
        self.updated_at = now_utc();
    }
}

use serde::{Deserialize, Serialize};

/// Token identifying the signed-in user to the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub auth_token: String,
}

impl Credentials {
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
        }
    }
}

/// A production app as known to the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// Connection details for a tunnel or console session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccessChannel {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub container: String,
}

/// Upload endpoint for build artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Warehouse {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub url: String,
}

/// Body of `POST apps/{id}/deploys`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployRequest {
    pub boxfile_content: String,
    pub build_id: String,
    pub commit_message: String,
}

#[derive(Serialize)]
pub(crate) struct DeployEnvelope<'a> {
    pub deploy: &'a DeployRequest,
}

#[derive(Deserialize)]
pub(crate) struct AuthTokenResponse {
    pub authentication_token: String,
}

#[derive(Deserialize)]
pub(crate) struct DeploySummary {
    #[serde(default)]
    pub build_id: String,
}

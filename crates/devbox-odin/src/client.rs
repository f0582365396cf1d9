use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::OdinResult;
use crate::error::OdinError;
use crate::types::{
    AccessChannel, AppDescriptor, AuthTokenResponse, Credentials, DeployEnvelope, DeployRequest,
    DeploySummary, Warehouse,
};

/// HTTP client for the control plane.
#[derive(Debug, Clone)]
pub struct OdinClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl OdinClient {
    /// Creates a client rooted at `base_url` (for example `https://api.example.dev/v1/`).
    ///
    /// Requests made without credentials carry no `auth_token`.
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> OdinResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(OdinError::InvalidBaseUrl {
                url: base_url.to_string(),
            });
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            credentials,
        })
    }

    /// Exchanges a username and password for an auth token.
    pub async fn auth(&self, username: &str, password: &str) -> OdinResult<String> {
        let url = self.endpoint(&["users", username, "auth_token"], &[("password", password)])?;
        let body: AuthTokenResponse = self.send(Method::GET, url, None::<&()>).await?;
        Ok(body.authentication_token)
    }

    /// Fetches the app registered under `slug`.
    pub async fn app(&self, slug: &str) -> OdinResult<AppDescriptor> {
        let url = self.endpoint(&["apps", slug], &[])?;
        self.send(Method::GET, url, None::<&()>).await
    }

    /// Submits a deploy. The response body is not inspected.
    pub async fn deploy(&self, app_id: &str, request: &DeployRequest) -> OdinResult<()> {
        let url = self.endpoint(&["apps", app_id, "deploys"], &[])?;
        let envelope = DeployEnvelope { deploy: request };
        self.execute(Method::POST, url, Some(&envelope)).await?;
        Ok(())
    }

    pub async fn establish_tunnel(
        &self,
        app_id: &str,
        component: &str,
    ) -> OdinResult<AccessChannel> {
        let url = self.endpoint(&["apps", app_id, "tunnels", component], &[])?;
        self.send(Method::GET, url, None::<&()>).await
    }

    pub async fn establish_console(
        &self,
        app_id: &str,
        component: &str,
    ) -> OdinResult<AccessChannel> {
        let url = self.endpoint(&["apps", app_id, "consoles", component], &[])?;
        self.send(Method::GET, url, None::<&()>).await
    }

    pub async fn warehouse(&self, app_id: &str) -> OdinResult<Warehouse> {
        let url = self.endpoint(&["apps", app_id, "services", "warehouse"], &[])?;
        self.send(Method::GET, url, None::<&()>).await
    }

    /// Build id of the most recent deploy, or `None` if the app was never deployed.
    pub async fn previous_build(&self, app_id: &str) -> OdinResult<Option<String>> {
        let url = self.endpoint(&["apps", app_id, "deploys"], &[])?;
        let deploys: Vec<DeploySummary> = self.send(Method::GET, url, None::<&()>).await?;
        Ok(deploys
            .into_iter()
            .next()
            .map(|d| d.build_id)
            .filter(|id| !id.is_empty()))
    }

    fn endpoint(&self, segments: &[&str], params: &[(&str, &str)]) -> OdinResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| OdinError::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(credentials) = &self.credentials {
                query.append_pair("auth_token", &credentials.auth_token);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    async fn send<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> OdinResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.execute(method, url, body).await?;
        serde_json::from_str(&text).map_err(OdinError::Decode)
    }

    async fn execute<B>(&self, method: Method, url: Url, body: Option<&B>) -> OdinResult<String>
    where
        B: Serialize + ?Sized,
    {
        // The query holds the auth token; only the path is logged.
        debug!(method = %method, path = %url.path(), "Sending control plane request");

        let mut request = self
            .http
            .request(method, url)
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "Control plane responded");

        if !status.is_success() {
            return Err(OdinError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments_and_token() {
        let client =
            OdinClient::new("https://api.example.dev/v1/", Some(Credentials::new("tok"))).unwrap();
        let url = client.endpoint(&["apps", "my app", "deploys"], &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.dev/v1/apps/my%20app/deploys?auth_token=tok"
        );
    }

    #[test]
    fn test_endpoint_without_credentials_has_no_query() {
        let client = OdinClient::new("https://api.example.dev/v1", None).unwrap();
        let url = client.endpoint(&["apps", "blog"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.dev/v1/apps/blog");
    }

    #[test]
    fn test_rejects_non_hierarchical_base() {
        let err = OdinClient::new("mailto:ops@example.dev", None).unwrap_err();
        assert!(matches!(err, OdinError::InvalidBaseUrl { .. }));
        assert!(matches!(
            OdinClient::new("not a url", None).unwrap_err(),
            OdinError::Url(_)
        ));
    }
}

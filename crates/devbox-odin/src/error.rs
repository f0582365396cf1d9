/// Errors raised while talking to the control plane.
#[derive(Debug, thiserror::Error)]
pub enum OdinError {
    #[error("failed to reach control plane")]
    Transport(#[from] reqwest::Error),

    #[error("control plane returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse control plane response")]
    Decode(#[source] serde_json::Error),

    #[error("invalid control plane URL")]
    Url(#[from] url::ParseError),

    #[error("control plane URL cannot have path segments: {url}")]
    InvalidBaseUrl { url: String },
}

impl OdinError {
    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessors() {
        let err = OdinError::Status {
            status: 401,
            body: "bad token".into(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "control plane returned HTTP 401: bad token");

        let err = OdinError::InvalidBaseUrl {
            url: "mailto:ops@example.dev".into(),
        };
        assert!(err.status().is_none());
        assert!(!err.is_unauthorized());
    }
}

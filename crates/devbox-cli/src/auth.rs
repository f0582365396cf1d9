use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use devbox_odin::Credentials;
use serde::{Deserialize, Serialize};

/// Credentials saved by `devbox login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub server: String,
    pub username: String,
    pub auth_token: String,
}

impl StoredCredentials {
    pub fn to_credentials(&self) -> Credentials {
        Credentials::new(&self.auth_token)
    }

    /// First and last few characters of the token, for display.
    pub fn token_preview(&self) -> String {
        let token = &self.auth_token;
        if token.len() > 20 && token.is_ascii() {
            format!("{}...{}", &token[..8], &token[token.len() - 8..])
        } else {
            "*".repeat(token.len().min(8))
        }
    }
}

fn creds_path(home: &Path, profile: &str) -> PathBuf {
    home.join(format!("credentials.{profile}.json"))
}

pub fn load_credentials(home: &Path, profile: &str) -> Result<Option<StoredCredentials>> {
    let path = creds_path(home, profile);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let creds: StoredCredentials = serde_json::from_str(&content)
        .with_context(|| format!("Corrupt credentials file {}", path.display()))?;
    Ok(Some(creds))
}

pub fn save_credentials(home: &Path, profile: &str, creds: &StoredCredentials) -> Result<()> {
    fs::create_dir_all(home)?;
    let content = serde_json::to_string_pretty(creds)?;
    fs::write(creds_path(home, profile), content)?;
    Ok(())
}

pub fn remove_credentials(home: &Path, profile: &str) -> Result<bool> {
    let path = creds_path(home, profile);
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredCredentials {
        StoredCredentials {
            server: "https://api.example.dev/v1/".into(),
            username: "alice".into(),
            auth_token: "0123456789abcdefghijklmnop".into(),
        }
    }

    #[test]
    fn test_credentials_lifecycle() {
        let home = tempfile::tempdir().unwrap();
        assert!(load_credentials(home.path(), "default").unwrap().is_none());

        save_credentials(home.path(), "default", &sample()).unwrap();
        assert_eq!(
            load_credentials(home.path(), "default").unwrap(),
            Some(sample())
        );
        assert!(load_credentials(home.path(), "other").unwrap().is_none());

        assert!(remove_credentials(home.path(), "default").unwrap());
        assert!(!remove_credentials(home.path(), "default").unwrap());
    }

    #[test]
    fn test_token_preview_hides_middle() {
        assert_eq!(sample().token_preview(), "01234567...ijklmnop");
        let short = StoredCredentials {
            auth_token: "abc".into(),
            ..sample()
        };
        assert_eq!(short.token_preview(), "***");
        assert_eq!(short.to_credentials().auth_token, "abc");
    }
}

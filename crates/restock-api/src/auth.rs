//! Bearer credentials and token refresh.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, Result};

/// OAuth token-exchange endpoint configuration.
#[derive(Debug, Clone)]
pub struct TokenEndpoint {
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Refreshable bearer credential.
///
/// Execution is single-threaded, so the holder is passed by `&mut` into
/// the client and refreshed in place under a single-writer discipline;
/// there is no process-global token state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

impl Credentials {
    /// Load persisted credentials from a JSON token file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ApiError::Token(format!("{}: {e}", path.display())))
    }

    /// Persist credentials so the next run reuses the refreshed token.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ApiError::Token(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Exchange the refresh token for a fresh access token, in place.
    pub async fn refresh(&mut self, http: &reqwest::Client, endpoint: &TokenEndpoint) -> Result<()> {
        if self.refresh_token.is_empty() {
            return Err(ApiError::Token("no refresh token on file".to_string()));
        }

        let params = [
            ("client_id", endpoint.client_id.as_str()),
            ("client_secret", endpoint.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", self.refresh_token.as_str()),
        ];
        let response = http.post(endpoint.url.as_str()).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Token(format!("{status}: {body}")));
        }

        let fresh: Credentials = response
            .json()
            .await
            .map_err(|e| ApiError::Token(e.to_string()))?;
        self.access_token = fresh.access_token;
        // The endpoint may rotate the refresh token; keep ours otherwise.
        if !fresh.refresh_token.is_empty() {
            self.refresh_token = fresh.refresh_token;
        }
        self.expires_in = fresh.expires_in;
        info!("access token refreshed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_token_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let credentials = Credentials {
            access_token: "abc123".to_string(),
            refresh_token: "def456".to_string(),
            expires_in: Some(3600),
        };
        credentials.save(&path).unwrap();

        let reloaded = Credentials::load(&path).unwrap();
        assert_eq!(reloaded.access_token, "abc123");
        assert_eq!(reloaded.refresh_token, "def456");
        assert_eq!(reloaded.expires_in, Some(3600));
    }

    #[test]
    fn test_load_tolerates_minimal_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, r#"{"access_token": "only"}"#).unwrap();

        let credentials = Credentials::load(&path).unwrap();
        assert_eq!(credentials.access_token, "only");
        assert!(credentials.refresh_token.is_empty());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Credentials::load(&dir.path().join("absent.json")).is_err());
    }
}

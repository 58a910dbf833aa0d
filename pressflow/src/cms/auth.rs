//! CMS login.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::client::CmsApi;
use crate::config::CmsCredentials;
use crate::core::AuthToken;
use crate::errors::AuthError;

#[derive(Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

/// Exchanges administrator credentials for a bearer token.
#[derive(Clone)]
pub struct AuthClient {
    api: Arc<dyn CmsApi>,
}

impl AuthClient {
    /// Creates a client over a CMS transport.
    #[must_use]
    pub fn new(api: Arc<dyn CmsApi>) -> Self {
        Self { api }
    }

    /// Logs in and returns the token.
    ///
    /// Only HTTP 200 with a non-empty `token` field counts as success.
    pub async fn login(&self, credentials: &CmsCredentials) -> Result<AuthToken, AuthError> {
        let response = self
            .api
            .request_token(credentials.username(), credentials.password())
            .await?;

        if response.status != 200 {
            warn!(status = response.status, "Token request rejected");
            return Err(AuthError::Rejected {
                status: response.status,
                body: response.body,
            });
        }

        let parsed: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        match parsed.token {
            Some(token) if !token.trim().is_empty() => {
                info!(username = credentials.username(), "Authenticated with CMS");
                Ok(AuthToken::new(token))
            }
            _ => Err(AuthError::MalformedResponse(
                "response has no token".to_string(),
            )),
        }
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient").finish_non_exhaustive()
    }
}

//! Client for the session service mounted next to the API.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::api::{ApiClient, decode, read_body};
use crate::domain::{OperadorId, Role};
use crate::schema::{Credenciais, NovoOperador};

/// Operator identity carried by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: OperadorId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Body of `GET get-session` when a session exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub session: SessionInfo,
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    user: SessionUser,
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
    base_path: String,
}

impl AuthClient {
    /// Shares `api`'s HTTP client and cookie jar.
    #[must_use]
    pub fn new(api: ApiClient, base_path: &str) -> Self {
        Self {
            api,
            base_path: base_path.trim_matches('/').to_string(),
        }
    }

    fn path(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_path)
    }

    /// Signs in with e-mail and password. The jar keeps the session cookie.
    pub async fn sign_in_email(&self, credenciais: &Credenciais) -> Result<()> {
        let _: serde_json::Value = self
            .api
            .post_json(&self.path("sign-in/email"), credenciais)
            .await
            .context("Sign-in failed")?;

        info!(email = %credenciais.email, "Signed in");
        Ok(())
    }

    /// Registers a new operator account.
    pub async fn sign_up_email(&self, operador: &NovoOperador) -> Result<SessionUser> {
        let response: SignUpResponse = self
            .api
            .post_json(&self.path("sign-up/email"), operador)
            .await
            .context("Sign-up failed")?;

        info!(email = %operador.email, id = %response.user.id, "Operator account created");
        Ok(response.user)
    }

    pub async fn sign_out(&self) -> Result<()> {
        let _: serde_json::Value = self
            .api
            .post_json(&self.path("sign-out"), &serde_json::json!({}))
            .await
            .context("Sign-out failed")?;

        debug!("Signed out");
        Ok(())
    }

    /// Current session, or `None` when the cookie is missing or expired.
    pub async fn get_session(&self) -> Result<Option<SessionPayload>> {
        let path = self.path("get-session");
        let response = self
            .api
            .http()
            .get(self.api.url(&path))
            .send()
            .await
            .with_context(|| format!("Failed to reach session service at {path}"))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            let _ = read_body(response).await;
            return Ok(None);
        }

        decode(&path, response).await
    }
}

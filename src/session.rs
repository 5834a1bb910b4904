//! Operator session lifecycle.
//!
//! A [`Session`] is acquired once at start-up by restoring the saved cookies
//! and asking the session service who they belong to. It is refreshed on
//! demand and torn down on sign-out, which also removes the saved cookies.
//! Route guards and screens receive it explicitly; nothing reads it from a
//! global.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::clients::{ApiClient, AuthClient, SessionPayload, SessionUser};
use crate::schema::Credenciais;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: SessionUser,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl From<SessionPayload> for Session {
    fn from(payload: SessionPayload) -> Self {
        Self {
            user: payload.user,
            expires_at: payload.session.expires_at,
        }
    }
}

/// Session cookies saved between runs, as a single `Cookie` header line.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        let content = content.trim();
        Ok((!content.is_empty()).then(|| content.to_string()))
    }

    pub fn save(&self, cookies: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, cookies)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove session file: {}", self.path.display())
            })?;
        }
        Ok(())
    }
}

/// Owns the current [`Session`] and the calls that change it.
#[derive(Debug)]
pub struct SessionManager {
    api: ApiClient,
    auth: AuthClient,
    store: SessionStore,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    #[must_use]
    pub fn new(api: ApiClient, auth: AuthClient, store: SessionStore) -> Self {
        Self {
            api,
            auth,
            store,
            current: RwLock::new(None),
        }
    }

    /// Restores saved cookies and resolves them into a session.
    ///
    /// A missing or unreadable session file, or cookies the service no longer
    /// accepts, all end in `None` rather than an error.
    pub async fn acquire(&self) -> Option<Session> {
        self.restore_cookies();
        self.refresh().await
    }

    /// Puts the saved cookies back into the jar.
    ///
    /// Sign-up answers with cookies for the account it just created; calling
    /// this afterwards keeps the admin who created it signed in.
    pub fn restore_cookies(&self) {
        match self.store.load() {
            Ok(Some(cookies)) => {
                if let Err(e) = self.api.restore_cookies(&cookies) {
                    warn!(error = %e, "Ignoring saved session");
                }
            }
            Ok(None) => debug!("No saved session"),
            Err(e) => warn!(error = %e, "Ignoring saved session"),
        }
    }

    /// Asks the session service for the current session and caches the answer.
    pub async fn refresh(&self) -> Option<Session> {
        let session = match self.auth.get_session().await {
            Ok(payload) => payload.map(Session::from),
            Err(e) => {
                warn!(error = %e, "Failed to fetch session");
                None
            }
        };

        let session = session.filter(|s| !s.is_expired(Utc::now()));
        *self.current.write().await = session.clone();
        session
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// Signs in, persists the new cookies and loads the session.
    pub async fn sign_in(&self, credenciais: &Credenciais) -> Result<Session> {
        self.auth.sign_in_email(credenciais).await?;

        if let Some(cookies) = self.api.cookie_header() {
            self.store.save(&cookies)?;
        }

        let session = self
            .refresh()
            .await
            .context("Signed in, but the session service returned no session")?;
        info!(user = %session.user.email, role = %session.user.role, "Session acquired");
        Ok(session)
    }

    /// Ends the session on the server and forgets it locally.
    ///
    /// Local state is cleared even when the server call fails.
    pub async fn sign_out(&self) -> Result<()> {
        let remote = self.auth.sign_out().await;
        *self.current.write().await = None;
        self.store.clear()?;
        remote
    }
}

//! Per-screen controllers.
//!
//! A screen owns its [`Location`](crate::filters::Location), turns control
//! changes into commits, and fetches through the shared cache. Writes go
//! through [`acoes`] and [`operadores`], which report back with a
//! [`Notification`] instead of an error the operator has to read a backtrace
//! for.

pub mod acoes;
pub mod chaves;
pub mod dashboard;
pub mod emprestimos;
pub mod operadores;

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::error::ApiError;
use crate::query::{QueryKey, QueryState};
use crate::schema::FormErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Toast shown after a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    #[must_use]
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            description: None,
        }
    }

    /// Error toast built from the API envelope: a fixed title, the envelope's
    /// description underneath.
    #[must_use]
    pub fn error(err: &ApiError) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Ocorreu um erro".to_string(),
            description: Some(err.description().to_string()),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.kind, NotificationKind::Success)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self.kind {
            NotificationKind::Success => "✓",
            NotificationKind::Error => "✗",
        };
        write!(f, "{mark} {}", self.title)?;
        if let Some(description) = &self.description {
            write!(f, ": {description}")?;
        }
        Ok(())
    }
}

/// A write that went through, with the toast to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Done<T> {
    pub value: T,
    pub notification: Notification,
}

/// A write that did not happen.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Local validation failed; nothing was sent.
    #[error("{0}")]
    Invalid(#[from] FormErrors),

    /// The API refused or could not be reached. Cached data is unchanged.
    #[error("{0}")]
    Rejected(Notification),

    #[error("Operação cancelada.")]
    Cancelled,
}

impl ActionError {
    #[must_use]
    pub const fn notification(&self) -> Option<&Notification> {
        match self {
            Self::Rejected(notification) => Some(notification),
            _ => None,
        }
    }
}

/// Query state tagged with the key it was requested for.
///
/// Only the response for the last committed key is ever applied, so a slow
/// answer to an older filter cannot overwrite a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<T> {
    key: QueryKey,
    state: QueryState<T>,
}

impl<T> Committed<T> {
    #[must_use]
    pub fn new(key: QueryKey) -> Self {
        Self {
            key,
            state: QueryState::Loading,
        }
    }

    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }

    #[must_use]
    pub const fn state(&self) -> &QueryState<T> {
        &self.state
    }

    /// Moves to `key`. Returns `false`, and keeps the current state, when the
    /// key did not change.
    pub fn commit(&mut self, key: QueryKey) -> bool {
        if key == self.key {
            return false;
        }
        self.key = key;
        self.state = QueryState::Loading;
        true
    }

    /// Applies a response if it answers the current key.
    pub fn receive(&mut self, key: &QueryKey, state: QueryState<T>) -> bool {
        if *key != self.key {
            debug!(response = %key, current = %self.key, "Discarding stale response");
            return false;
        }
        self.state = state;
        true
    }
}

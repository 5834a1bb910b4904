//! Keyed response cache shared by every screen.
//!
//! Reads are stored under a [`QueryKey`] (resource family plus canonical
//! parameters). Writes never touch cached values directly: a successful
//! mutation marks the families it affects as stale, and the next read of a
//! stale key goes back to the API.

pub mod cache;
pub mod invalidation;
pub mod state;

use std::fmt;

use url::form_urlencoded;

pub use cache::QueryCache;
pub use invalidation::Mutation;
pub use state::QueryState;

/// Cache key: a resource family and its canonical parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    family: &'static str,
    params: String,
}

impl QueryKey {
    /// Parameters are kept in the given order; callers pass them canonically.
    #[must_use]
    pub fn new<K, V>(family: &'static str, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let params = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        Self { family, params }
    }

    /// Key of a single resource fetched by id.
    #[must_use]
    pub fn detail(family: &'static str, id: &str) -> Self {
        Self {
            family,
            params: id.to_string(),
        }
    }

    #[must_use]
    pub fn list(family: &'static str) -> Self {
        Self {
            family,
            params: String::new(),
        }
    }

    #[must_use]
    pub const fn family(&self) -> &'static str {
        self.family
    }

    #[must_use]
    pub fn params(&self) -> &str {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "[{}]", self.family)
        } else {
            write!(f, "[{}, {}]", self.family, self.params)
        }
    }
}

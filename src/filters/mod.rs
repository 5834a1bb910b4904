//! Filter state of the listing screens and its mapping to the query string.
//!
//! The [`Location`] is the source of truth: a filter is always rebuilt from it
//! with every key defaulted, and a control commit changes exactly one query key.
//! Reading back the location a filter produced yields the same filter.

pub mod chaves;
pub mod emprestimos;
pub mod location;

use std::str::FromStr;

use thiserror::Error;

pub use chaves::{ChavesControl, ChavesFilter};
pub use emprestimos::{DateRange, EmprestimosControl, EmprestimosFilter};
pub use location::Location;

use crate::constants::filters::ALL_SENTINELS;
use crate::models::enums::UnknownVariant;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter: {0}")]
    UnknownField(String),

    #[error(transparent)]
    Value(#[from] UnknownVariant),

    #[error("invalid date: {0}")]
    Date(String),

    #[error("a date range needs both a start and an end")]
    IncompleteRange,
}

/// Value chosen in an enum selector: one variant, or the "all" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T: FromStr<Err = UnknownVariant>> Selection<T> {
    /// Parses a selector value.
    ///
    /// The sentinels are matched case-insensitively. Variants are tried as
    /// typed, then upper- and lowercased, since the wire spelling differs per
    /// enum (`ARMARIO` vs `disponivel`).
    pub fn parse(raw: &str) -> Result<Self, UnknownVariant> {
        let raw = raw.trim();
        if is_all_sentinel(raw) {
            return Ok(Self::All);
        }
        raw.parse()
            .or_else(|_| raw.to_uppercase().parse())
            .or_else(|_| raw.to_lowercase().parse())
            .map(Self::Only)
    }
}

impl<T> Selection<T> {
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

#[must_use]
pub fn is_all_sentinel(raw: &str) -> bool {
    ALL_SENTINELS
        .iter()
        .any(|sentinel| sentinel.eq_ignore_ascii_case(raw.trim()))
}

/// Reads an enum-valued query key. Unknown values read as absent.
fn enum_param<T: FromStr>(location: &Location, key: &str) -> Option<T> {
    let raw = location.get(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!(key, value = raw, "Ignoring unknown filter value");
            None
        }
    }
}

/// Reads a free-text query key. Blank values read as absent.
fn text_param(location: &Location, key: &str) -> Option<String> {
    location
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Normalizes a committed text value: blank clears the key.
fn committed_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

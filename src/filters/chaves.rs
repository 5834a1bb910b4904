use super::{FilterError, Location, Selection, committed_text, enum_param, text_param};
use crate::constants::query_keys;
use crate::models::{Localizacao, StatusChave, TipoChave};
use crate::query::QueryKey;

/// Filters of the key listing (`/emprestimos`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChavesFilter {
    pub codigo: Option<String>,
    pub status: StatusChave,
    pub tipo: Option<TipoChave>,
    pub localizacao: Option<Localizacao>,
}

impl ChavesFilter {
    pub const PATH: &'static str = "/emprestimos";

    /// Listing the guards send non-admin operators to.
    #[must_use]
    pub fn disponiveis() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_location(location: &Location) -> Self {
        Self {
            codigo: text_param(location, "codigo"),
            status: enum_param(location, "status").unwrap_or_default(),
            tipo: enum_param(location, "tipo"),
            localizacao: enum_param(location, "localizacao"),
        }
    }

    /// Query parameters in canonical order. `status` is always present.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(4);
        if let Some(codigo) = &self.codigo {
            query.push(("codigo", codigo.clone()));
        }
        query.push(("status", self.status.to_string()));
        if let Some(tipo) = self.tipo {
            query.push(("tipo", tipo.to_string()));
        }
        if let Some(localizacao) = self.localizacao {
            query.push(("localizacao", localizacao.to_string()));
        }
        query
    }

    #[must_use]
    pub fn to_location(&self) -> Location {
        Location::with_query(Self::PATH, self.to_query())
    }

    #[must_use]
    pub fn query_key(&self) -> QueryKey {
        QueryKey::new(query_keys::CHAVES, self.to_query())
    }
}

/// A single control change on the key listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChavesControl {
    Codigo(String),
    Status(Selection<StatusChave>),
    Tipo(Selection<TipoChave>),
    Localizacao(Selection<Localizacao>),
}

impl ChavesControl {
    /// Builds a control change from a `field=value` pair.
    pub fn parse(field: &str, raw: &str) -> Result<Self, FilterError> {
        Ok(match field {
            "codigo" => Self::Codigo(raw.to_string()),
            "status" => Self::Status(Selection::parse(raw)?),
            "tipo" => Self::Tipo(Selection::parse(raw)?),
            "localizacao" => Self::Localizacao(Selection::parse(raw)?),
            other => return Err(FilterError::UnknownField(other.to_string())),
        })
    }

    /// Free-text controls settle through the debouncer before committing.
    #[must_use]
    pub const fn is_debounced(&self) -> bool {
        matches!(self, Self::Codigo(_))
    }

    /// The one query key this change writes, and its new value (`None` clears it).
    #[must_use]
    pub fn query_entry(&self) -> (&'static str, Option<String>) {
        match self {
            Self::Codigo(text) => ("codigo", committed_text(text)),
            Self::Status(sel) => ("status", sel.into_option().map(|v| v.to_string())),
            Self::Tipo(sel) => ("tipo", sel.into_option().map(|v| v.to_string())),
            Self::Localizacao(sel) => ("localizacao", sel.into_option().map(|v| v.to_string())),
        }
    }

    /// Merges this change into `location`.
    pub fn apply(&self, location: &mut Location) {
        let (key, value) = self.query_entry();
        location.merge(key, value);
    }
}

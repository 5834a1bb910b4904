use chrono::{Days, NaiveDate};

use super::{FilterError, Location, Selection, committed_text, enum_param, text_param};
use crate::constants::query_keys;
use crate::models::{StatusEmprestimo, TipoEmprestimo};
use crate::query::QueryKey;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive withdrawal-date window of the loan listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Orders the bounds, so a range picked backwards still reads forwards.
    #[must_use]
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            from: a.min(b),
            to: a.max(b),
        }
    }

    /// `today ..= today + days`.
    #[must_use]
    pub fn window(today: NaiveDate, days: u64) -> Self {
        Self {
            from: today,
            to: today.checked_add_days(Days::new(days)).unwrap_or(today),
        }
    }
}

/// Filters of the loan listing (`/listar-emprestimos`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmprestimosFilter {
    pub status: Option<StatusEmprestimo>,
    pub tipo: Option<TipoEmprestimo>,
    pub data_retirada: NaiveDate,
    pub data_retorno: NaiveDate,
    pub nome_solicitante: Option<String>,
    pub matricula_solicitante: Option<String>,
    pub codigo: Option<String>,
}

impl EmprestimosFilter {
    pub const PATH: &'static str = "/listar-emprestimos";

    #[must_use]
    pub const fn with_defaults(defaults: DateRange) -> Self {
        Self {
            status: None,
            tipo: None,
            data_retirada: defaults.from,
            data_retorno: defaults.to,
            nome_solicitante: None,
            matricula_solicitante: None,
            codigo: None,
        }
    }

    /// Reads the filter back from a location.
    ///
    /// Missing or malformed dates fall back to the matching bound of
    /// `defaults`; each bound is read independently.
    #[must_use]
    pub fn from_location(location: &Location, defaults: DateRange) -> Self {
        Self {
            status: enum_param(location, "status"),
            tipo: enum_param(location, "tipo"),
            data_retirada: date_param(location, "dataRetirada").unwrap_or(defaults.from),
            data_retorno: date_param(location, "dataRetorno").unwrap_or(defaults.to),
            nome_solicitante: text_param(location, "nomeSolicitante"),
            matricula_solicitante: text_param(location, "matriculaSolicitante"),
            codigo: text_param(location, "codigo"),
        }
    }

    #[must_use]
    pub const fn periodo(&self) -> DateRange {
        DateRange {
            from: self.data_retirada,
            to: self.data_retorno,
        }
    }

    /// Query parameters in canonical order. Both dates are always present.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(7);
        if let Some(status) = self.status {
            query.push(("status", status.to_string()));
        }
        if let Some(tipo) = self.tipo {
            query.push(("tipo", tipo.to_string()));
        }
        query.push(("dataRetirada", format_date(self.data_retirada)));
        query.push(("dataRetorno", format_date(self.data_retorno)));
        if let Some(nome) = &self.nome_solicitante {
            query.push(("nomeSolicitante", nome.clone()));
        }
        if let Some(matricula) = &self.matricula_solicitante {
            query.push(("matriculaSolicitante", matricula.clone()));
        }
        if let Some(codigo) = &self.codigo {
            query.push(("codigo", codigo.clone()));
        }
        query
    }

    #[must_use]
    pub fn to_location(&self) -> Location {
        Location::with_query(Self::PATH, self.to_query())
    }

    #[must_use]
    pub fn query_key(&self) -> QueryKey {
        QueryKey::new(query_keys::EMPRESTIMOS, self.to_query())
    }
}

/// A single control change on the loan listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmprestimosControl {
    Codigo(String),
    NomeSolicitante(String),
    MatriculaSolicitante(String),
    Status(Selection<StatusEmprestimo>),
    Tipo(Selection<TipoEmprestimo>),
    /// Calendar selection; either bound may still be missing mid-pick.
    Periodo {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl EmprestimosControl {
    /// Builds a control change from a `field=value` pair.
    ///
    /// The period is written `2025-01-01..2025-01-08`; a missing side parses
    /// but cannot be committed.
    pub fn parse(field: &str, raw: &str) -> Result<Self, FilterError> {
        Ok(match field {
            "codigo" => Self::Codigo(raw.to_string()),
            "nomeSolicitante" | "nome" => Self::NomeSolicitante(raw.to_string()),
            "matriculaSolicitante" | "matricula" => Self::MatriculaSolicitante(raw.to_string()),
            "status" => Self::Status(Selection::parse(raw)?),
            "tipo" => Self::Tipo(Selection::parse(raw)?),
            "periodo" => {
                let (from, to) = raw.split_once("..").unwrap_or((raw, ""));
                Self::Periodo {
                    from: parse_optional_date(from)?,
                    to: parse_optional_date(to)?,
                }
            }
            other => return Err(FilterError::UnknownField(other.to_string())),
        })
    }

    #[must_use]
    pub const fn is_debounced(&self) -> bool {
        matches!(
            self,
            Self::Codigo(_) | Self::NomeSolicitante(_) | Self::MatriculaSolicitante(_)
        )
    }

    /// Query keys written by this change. A period writes both bounds at once.
    pub fn query_entries(&self) -> Result<Vec<(&'static str, Option<String>)>, FilterError> {
        Ok(match self {
            Self::Codigo(text) => vec![("codigo", committed_text(text))],
            Self::NomeSolicitante(text) => vec![("nomeSolicitante", committed_text(text))],
            Self::MatriculaSolicitante(text) => {
                vec![("matriculaSolicitante", committed_text(text))]
            }
            Self::Status(sel) => vec![("status", sel.into_option().map(|v| v.to_string()))],
            Self::Tipo(sel) => vec![("tipo", sel.into_option().map(|v| v.to_string()))],
            Self::Periodo {
                from: Some(from),
                to: Some(to),
            } => {
                let range = DateRange::new(*from, *to);
                vec![
                    ("dataRetirada", Some(format_date(range.from))),
                    ("dataRetorno", Some(format_date(range.to))),
                ]
            }
            Self::Periodo { .. } => return Err(FilterError::IncompleteRange),
        })
    }

    /// Merges this change into `location`. Nothing is written on error.
    pub fn apply(&self, location: &mut Location) -> Result<(), FilterError> {
        for (key, value) in self.query_entries()? {
            location.merge(key, value);
        }
        Ok(())
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn date_param(location: &Location, key: &str) -> Option<NaiveDate> {
    let raw = location.get(key)?;
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::debug!(key, value = raw, "Malformed date in location, using default");
            None
        }
    }
}

fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, FilterError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FilterError::Date(raw.to_string()))
}

//! Route table and navigation guards.
//!
//! Every screen has one [`Route`]. A route is read from a [`Location`] and can
//! be turned back into one, so anything a listing prints can be pasted into
//! `chaveiro abrir` to land on the same screen. Guards run before any screen
//! renders and either let the route through or redirect.

use std::fmt;

use thiserror::Error;

use crate::domain::EmprestimoId;
use crate::filters::{ChavesFilter, DateRange, EmprestimosFilter, Location};
use crate::session::Session;

const INDEX: &str = "/";
const SIGN_IN: &str = "/signIn";
const DASHBOARD: &str = "/dashboard";
const EMPRESTIMO_ADMINISTRATIVO: &str = "/emprestimos/emprestimo-administrativo";
const OPERADORES: &str = "/operadores";
const CADASTRO_OPERADOR: &str = "/operadores/cadastro";
/// Older name of the key listing, still accepted on input.
const CHAVES_ALIAS: &str = "/chaves";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    SignIn,
    Dashboard,
    Chaves(ChavesFilter),
    EmprestimoAdministrativo,
    Emprestimos(EmprestimosFilter),
    Emprestimo(EmprestimoId),
    Operadores,
    CadastroOperador,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no screen at {0}")]
pub struct UnknownRoute(pub String);

/// Why a guard refused a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    Unauthenticated,
    Forbidden,
    AlreadySignedIn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    pub reason: RedirectReason,
}

impl Route {
    /// Resolves a location. Loan listing dates missing from the query come
    /// from `defaults`.
    pub fn parse(location: &Location, defaults: DateRange) -> Result<Self, UnknownRoute> {
        let path = location.path();
        let route = match path {
            INDEX => Self::Index,
            SIGN_IN => Self::SignIn,
            DASHBOARD => Self::Dashboard,
            ChavesFilter::PATH | CHAVES_ALIAS => {
                Self::Chaves(ChavesFilter::from_location(location))
            }
            EMPRESTIMO_ADMINISTRATIVO => Self::EmprestimoAdministrativo,
            EmprestimosFilter::PATH => {
                Self::Emprestimos(EmprestimosFilter::from_location(location, defaults))
            }
            OPERADORES => Self::Operadores,
            CADASTRO_OPERADOR => Self::CadastroOperador,
            _ => {
                let id = path
                    .strip_prefix(EmprestimosFilter::PATH)
                    .and_then(|rest| rest.strip_prefix('/'))
                    .filter(|id| !id.is_empty() && !id.contains('/'))
                    .ok_or_else(|| UnknownRoute(path.to_string()))?;
                let id = urlencoding::decode(id)
                    .map_err(|_| UnknownRoute(path.to_string()))?
                    .into_owned();
                Self::Emprestimo(EmprestimoId::new(id))
            }
        };
        Ok(route)
    }

    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Index => Location::new(INDEX),
            Self::SignIn => Location::new(SIGN_IN),
            Self::Dashboard => Location::new(DASHBOARD),
            Self::Chaves(filter) => filter.to_location(),
            Self::EmprestimoAdministrativo => Location::new(EMPRESTIMO_ADMINISTRATIVO),
            Self::Emprestimos(filter) => filter.to_location(),
            Self::Emprestimo(id) => Location::new(format!(
                "{}/{}",
                EmprestimosFilter::PATH,
                urlencoding::encode(id.as_str())
            )),
            Self::Operadores => Location::new(OPERADORES),
            Self::CadastroOperador => Location::new(CADASTRO_OPERADOR),
        }
    }

    #[must_use]
    pub const fn requires_session(&self) -> bool {
        !matches!(self, Self::Index | Self::SignIn)
    }

    #[must_use]
    pub const fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::Operadores | Self::CadastroOperador | Self::EmprestimoAdministrativo
        )
    }

    /// Lets the route through or says where to go instead.
    pub fn guard(self, session: Option<&Session>) -> Result<Self, Redirect> {
        match session {
            None if self.requires_session() => Err(Redirect {
                to: Self::SignIn,
                reason: RedirectReason::Unauthenticated,
            }),
            Some(_) if matches!(self, Self::Index | Self::SignIn) => Err(Redirect {
                to: Self::Dashboard,
                reason: RedirectReason::AlreadySignedIn,
            }),
            Some(s) if self.requires_admin() && !s.is_admin() => Err(Redirect {
                to: Self::Chaves(ChavesFilter::disponiveis()),
                reason: RedirectReason::Forbidden,
            }),
            _ => Ok(self),
        }
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Index => "Início",
            Self::SignIn => "Entrar",
            Self::Dashboard => "Painel",
            Self::Chaves(_) => "Chaves",
            Self::EmprestimoAdministrativo => "Empréstimo administrativo",
            Self::Emprestimos(_) => "Empréstimos",
            Self::Emprestimo(_) => "Empréstimo",
            Self::Operadores => "Operadores",
            Self::CadastroOperador => "Cadastro de operador",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location())
    }
}

//! Form validation.
//!
//! Each schema is a `validator` derive over the raw form input plus a
//! `validate()` function that returns the normalized value the API expects or a
//! [`FormErrors`] with one or more messages per field. Nothing here performs
//! I/O and nothing panics on bad input.

pub mod auth;
pub mod chave;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use validator::ValidationErrors;

pub use auth::{Credenciais, NovoOperador, SignInForm, SignUpForm};
pub use chave::{
    EmprestimoAdministrativoForm, Matricula, MatriculaForm, NovoEmprestimoAdministrativo,
};

/// Field-scoped validation messages, keyed by the wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    /// Message shown at the top of the form, if any.
    pub form: Option<String>,
    pub fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    #[must_use]
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        !self.field(name).is_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.form.is_none() && self.fields.is_empty()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(form) = &self.form {
            parts.push(form.clone());
        }
        for (field, messages) in &self.fields {
            parts.push(format!("{field}: {}", messages.join(", ")));
        }
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Self::default();
        for (field, field_errors) in errors.field_errors() {
            let name = camel_case(&field.to_string());
            for e in field_errors {
                let message = e
                    .message
                    .as_ref()
                    .map_or_else(|| e.code.to_string(), ToString::to_string);
                if name == "__all__" {
                    out.form = Some(message);
                } else {
                    out.push(&name, message);
                }
            }
        }
        out
    }
}

fn camel_case(name: &str) -> String {
    if name.starts_with("__") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Parses an ISO-8601 timestamp as entered in a form.
///
/// Accepts RFC 3339 with an offset, or a local date-time without offset
/// (`2025-01-01T10:00`, `2025-01-01T10:00:00.000`) which is read in the
/// machine's local time zone.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|dt| dt.fixed_offset())
}

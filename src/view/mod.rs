//! What each screen shows, derived from fetched data.
//!
//! `chave` and `emprestimo` decide which sections appear; `render` turns them
//! into terminal text. Nothing here performs I/O.

pub mod chave;
pub mod emprestimo;
pub mod render;

use chrono::{DateTime, Local, Utc};

pub use chave::{CartaoChave, ChaveSection, Portador, chave_sections, holder_lookup_needed};
pub use emprestimo::{EmprestimoSection, LinhaEmprestimo, emprestimo_sections};

use crate::constants::display::DATE_TIME_FORMAT;

/// An instant in the operator's local time.
#[must_use]
pub fn format_instant(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(DATE_TIME_FORMAT).to_string()
}

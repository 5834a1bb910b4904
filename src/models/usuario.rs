use serde::Deserialize;

use crate::domain::UsuarioId;

/// Borrower registered in the university system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Usuario {
    pub id: UsuarioId,
    pub nome: String,
    #[serde(default)]
    pub matricula: String,
}

/// Requester projection joined into key detail loans.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UsuarioNome {
    pub nome: String,
}

use serde::Deserialize;

use crate::domain::{OperadorId, Role};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Operador {
    pub id: OperadorId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Operator as joined into a loan detail.
pub type OperadorResumo = Operador;

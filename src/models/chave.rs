//! Lendable keys.
//!
//! The backend sends both association slots (`Armario` and `Ambiente`) on every
//! key and relies on `tipo` to say which one is filled. Decoding goes through
//! [`ChaveWire`] and refuses payloads where the slots disagree with `tipo`, so a
//! [`Chave`] always holds exactly one locker or one room.

use serde::Deserialize;

use super::ModelError;
use super::emprestimo::{EmprestimoComSolicitante, EmprestimoComSolicitanteWire};
use super::enums::{Localizacao, TipoAmbiente, TipoChave};
use crate::domain::ChaveId;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Armario {
    #[serde(default)]
    pub id: String,
    pub codigo: String,
    pub bloco: String,
    pub localizacao: Localizacao,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ambiente {
    #[serde(default)]
    pub id: String,
    pub codigo: String,
    pub nome: String,
    pub capacidade: u32,
    pub localizacao: Localizacao,
    pub tipo: TipoAmbiente,
    pub precisa_reserva: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChaveLocal {
    Armario { armario_id: String, armario: Armario },
    Ambiente { ambiente_id: String, ambiente: Ambiente },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ChaveWire")]
pub struct Chave {
    pub id: ChaveId,
    pub local: ChaveLocal,
}

impl Chave {
    #[must_use]
    pub const fn tipo(&self) -> TipoChave {
        match self.local {
            ChaveLocal::Armario { .. } => TipoChave::Armario,
            ChaveLocal::Ambiente { .. } => TipoChave::Ambiente,
        }
    }

    #[must_use]
    pub fn codigo(&self) -> &str {
        match &self.local {
            ChaveLocal::Armario { armario, .. } => &armario.codigo,
            ChaveLocal::Ambiente { ambiente, .. } => &ambiente.codigo,
        }
    }

    #[must_use]
    pub const fn localizacao(&self) -> Localizacao {
        match &self.local {
            ChaveLocal::Armario { armario, .. } => armario.localizacao,
            ChaveLocal::Ambiente { ambiente, .. } => ambiente.localizacao,
        }
    }

    /// Card title: rooms show `codigo - nome`, lockers only their code.
    #[must_use]
    pub fn titulo(&self) -> String {
        match &self.local {
            ChaveLocal::Armario { armario, .. } => armario.codigo.clone(),
            ChaveLocal::Ambiente { ambiente, .. } => {
                format!("{} - {}", ambiente.codigo, ambiente.nome)
            }
        }
    }
}

/// Key as returned by `GET /chaves/{id}`, with the loans that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ChaveComEmprestimosWire")]
pub struct ChaveComEmprestimos {
    pub chave: Chave,
    pub emprestimos: Vec<EmprestimoComSolicitante>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChaveWire {
    id: ChaveId,
    tipo: TipoChave,
    #[serde(default)]
    armario_id: Option<String>,
    #[serde(default)]
    ambiente_id: Option<String>,
    #[serde(rename = "Armario", default)]
    armario: Option<Armario>,
    #[serde(rename = "Ambiente", default)]
    ambiente: Option<Ambiente>,
}

impl TryFrom<ChaveWire> for Chave {
    type Error = ModelError;

    fn try_from(wire: ChaveWire) -> Result<Self, Self::Error> {
        let inconsistent = |reason| ModelError::InconsistentKey {
            id: wire.id.to_string(),
            reason,
        };

        let local = match wire.tipo {
            TipoChave::Armario => {
                if wire.ambiente.is_some() || wire.ambiente_id.is_some() {
                    return Err(inconsistent("locker key carries a room"));
                }
                let armario = wire
                    .armario
                    .ok_or_else(|| inconsistent("locker key without locker"))?;
                let armario_id = wire
                    .armario_id
                    .unwrap_or_else(|| armario.id.clone());
                ChaveLocal::Armario {
                    armario_id,
                    armario,
                }
            }
            TipoChave::Ambiente => {
                if wire.armario.is_some() || wire.armario_id.is_some() {
                    return Err(inconsistent("room key carries a locker"));
                }
                let ambiente = wire
                    .ambiente
                    .ok_or_else(|| inconsistent("room key without room"))?;
                let ambiente_id = wire
                    .ambiente_id
                    .unwrap_or_else(|| ambiente.id.clone());
                ChaveLocal::Ambiente {
                    ambiente_id,
                    ambiente,
                }
            }
        };

        Ok(Self { id: wire.id, local })
    }
}

#[derive(Debug, Deserialize)]
struct ChaveComEmprestimosWire {
    #[serde(flatten)]
    chave: ChaveWire,
    #[serde(rename = "Emprestimo", default)]
    emprestimos: Vec<EmprestimoComSolicitanteWire>,
}

impl TryFrom<ChaveComEmprestimosWire> for ChaveComEmprestimos {
    type Error = ModelError;

    fn try_from(wire: ChaveComEmprestimosWire) -> Result<Self, Self::Error> {
        let emprestimos = wire
            .emprestimos
            .into_iter()
            .map(EmprestimoComSolicitante::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            chave: Chave::try_from(wire.chave)?,
            emprestimos,
        })
    }
}

impl ChaveComEmprestimos {
    /// The loan currently holding the key, if any.
    #[must_use]
    pub fn emprestimo_atual(&self) -> Option<&EmprestimoComSolicitante> {
        self.emprestimos
            .iter()
            .find(|e| e.emprestimo.situacao.is_pendente())
            .or_else(|| self.emprestimos.first())
    }
}

//! Loans (`Empréstimos`).
//!
//! The wire format keeps `status`, `dataRetorno` and `justificativa` as
//! independent nullable fields. Here they collapse into [`Situacao`] and
//! [`Modalidade`], and decoding fails when the fields contradict each other.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::ModelError;
use super::chave::{Chave, ChaveWire};
use super::enums::{StatusEmprestimo, TipoEmprestimo};
use super::operador::OperadorResumo;
use super::usuario::{Usuario, UsuarioNome};
use crate::domain::{ChaveId, EmprestimoId, OperadorId, UsuarioId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Situacao {
    Pendente,
    Devolvido {
        data_retorno: DateTime<Utc>,
        usuario_devolucao_id: Option<UsuarioId>,
    },
}

impl Situacao {
    #[must_use]
    pub const fn status(&self) -> StatusEmprestimo {
        match self {
            Self::Pendente => StatusEmprestimo::Pendente,
            Self::Devolvido { .. } => StatusEmprestimo::Devolvido,
        }
    }

    #[must_use]
    pub const fn is_pendente(&self) -> bool {
        matches!(self, Self::Pendente)
    }

    #[must_use]
    pub const fn data_retorno(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Pendente => None,
            Self::Devolvido { data_retorno, .. } => Some(*data_retorno),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modalidade {
    Normal,
    Administrativo { justificativa: String },
}

impl Modalidade {
    #[must_use]
    pub const fn tipo(&self) -> TipoEmprestimo {
        match self {
            Self::Normal => TipoEmprestimo::Normal,
            Self::Administrativo { .. } => TipoEmprestimo::Administrativo,
        }
    }

    #[must_use]
    pub fn justificativa(&self) -> Option<&str> {
        match self {
            Self::Normal => None,
            Self::Administrativo { justificativa } => Some(justificativa),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "EmprestimoWire")]
pub struct Emprestimo {
    pub id: EmprestimoId,
    pub chave_id: ChaveId,
    pub usuario_solicitante_id: UsuarioId,
    pub operador_id: Option<OperadorId>,
    pub data_retirada: DateTime<Utc>,
    pub situacao: Situacao,
    pub modalidade: Modalidade,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Emprestimo {
    #[must_use]
    pub const fn status(&self) -> StatusEmprestimo {
        self.situacao.status()
    }

    #[must_use]
    pub const fn tipo(&self) -> TipoEmprestimo {
        self.modalidade.tipo()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EmprestimoWire {
    id: EmprestimoId,
    chave_id: ChaveId,
    usuario_solicitante_id: UsuarioId,
    #[serde(default)]
    usuario_devolucao_id: Option<UsuarioId>,
    #[serde(default)]
    operador_id: Option<OperadorId>,
    data_retirada: DateTime<Utc>,
    #[serde(default)]
    data_retorno: Option<DateTime<Utc>>,
    status: StatusEmprestimo,
    tipo: TipoEmprestimo,
    #[serde(default)]
    justificativa: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<EmprestimoWire> for Emprestimo {
    type Error = ModelError;

    fn try_from(wire: EmprestimoWire) -> Result<Self, Self::Error> {
        let inconsistent = |reason| ModelError::InconsistentLoan {
            id: wire.id.to_string(),
            reason,
        };

        let situacao = match (wire.status, wire.data_retorno) {
            (StatusEmprestimo::Pendente, None) => Situacao::Pendente,
            (StatusEmprestimo::Pendente, Some(_)) => {
                return Err(inconsistent("pending loan has a return date"));
            }
            (StatusEmprestimo::Devolvido, None) => {
                return Err(inconsistent("returned loan without return date"));
            }
            (StatusEmprestimo::Devolvido, Some(data_retorno)) => {
                if data_retorno < wire.data_retirada {
                    return Err(inconsistent("return date precedes withdrawal"));
                }
                Situacao::Devolvido {
                    data_retorno,
                    usuario_devolucao_id: wire.usuario_devolucao_id,
                }
            }
        };

        let modalidade = match wire.tipo {
            TipoEmprestimo::Normal => Modalidade::Normal,
            TipoEmprestimo::Administrativo => match wire.justificativa {
                Some(justificativa) if !justificativa.trim().is_empty() => {
                    Modalidade::Administrativo { justificativa }
                }
                _ => return Err(inconsistent("administrative loan without justification")),
            },
        };

        Ok(Self {
            id: wire.id,
            chave_id: wire.chave_id,
            usuario_solicitante_id: wire.usuario_solicitante_id,
            operador_id: wire.operador_id,
            data_retirada: wire.data_retirada,
            situacao,
            modalidade,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }
}

/// Loan summary embedded in a key detail, with the requester's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmprestimoComSolicitante {
    pub emprestimo: Emprestimo,
    pub solicitante: UsuarioNome,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmprestimoComSolicitanteWire {
    #[serde(flatten)]
    emprestimo: EmprestimoWire,
    #[serde(rename = "UsuarioSolicitante")]
    solicitante: UsuarioNome,
}

impl TryFrom<EmprestimoComSolicitanteWire> for EmprestimoComSolicitante {
    type Error = ModelError;

    fn try_from(wire: EmprestimoComSolicitanteWire) -> Result<Self, Self::Error> {
        Ok(Self {
            emprestimo: Emprestimo::try_from(wire.emprestimo)?,
            solicitante: wire.solicitante,
        })
    }
}

/// Return-side joins, present only once the loan is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Devolucao {
    pub usuario: Option<Usuario>,
    pub operador: Option<OperadorResumo>,
}

/// Loan as returned by `GET /emprestimos/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "EmprestimoDetalhadoWire")]
pub struct EmprestimoDetalhado {
    pub emprestimo: Emprestimo,
    pub usuario_solicitante: Usuario,
    pub operador_solicitacao: Option<OperadorResumo>,
    pub chave: Chave,
    pub devolucao: Option<Devolucao>,
}

#[derive(Debug, Deserialize)]
struct EmprestimoDetalhadoWire {
    #[serde(flatten)]
    emprestimo: EmprestimoWire,
    #[serde(rename = "UsuarioSolicitante")]
    usuario_solicitante: Usuario,
    #[serde(rename = "UsuarioDevolucao", default)]
    usuario_devolucao: Option<Usuario>,
    #[serde(rename = "OperadorSolicitacao", default)]
    operador_solicitacao: Option<OperadorResumo>,
    #[serde(rename = "OperadorDevolucao", default)]
    operador_devolucao: Option<OperadorResumo>,
    #[serde(rename = "Chave")]
    chave: ChaveWire,
}

impl TryFrom<EmprestimoDetalhadoWire> for EmprestimoDetalhado {
    type Error = ModelError;

    fn try_from(wire: EmprestimoDetalhadoWire) -> Result<Self, Self::Error> {
        let emprestimo = Emprestimo::try_from(wire.emprestimo)?;
        let devolucao = match emprestimo.situacao {
            Situacao::Pendente => None,
            Situacao::Devolvido { .. } => Some(Devolucao {
                usuario: wire.usuario_devolucao,
                operador: wire.operador_devolucao,
            }),
        };

        Ok(Self {
            emprestimo,
            usuario_solicitante: wire.usuario_solicitante,
            operador_solicitacao: wire.operador_solicitacao,
            chave: Chave::try_from(wire.chave)?,
            devolucao,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{Value, json};

    pub(crate) fn emprestimo_json(id: &str, status: &str, tipo: &str) -> Value {
        let devolvido = status == "DEVOLVIDO";
        json!({
            "id": id,
            "chaveId": "k1",
            "usuarioSolicitanteId": "u1",
            "usuarioDevolucaoId": if devolvido { json!("u1") } else { Value::Null },
            "operadorId": "op1",
            "dataRetirada": "2025-01-01T10:00:00.000Z",
            "dataRetorno": if devolvido { json!("2025-01-03T18:15:00.000Z") } else { Value::Null },
            "status": status,
            "tipo": tipo,
            "justificativa": if tipo == "ADMINISTRATIVO" {
                json!("Sistema fora do ar durante a manhã")
            } else {
                Value::Null
            },
            "createdAt": "2025-01-01T10:00:00.000Z",
            "updatedAt": "2025-01-01T10:00:00.000Z"
        })
    }

    #[test]
    fn test_decode_pending_normal_loan() {
        let e: Emprestimo = serde_json::from_value(emprestimo_json("e1", "PENDENTE", "NORMAL")).unwrap();
        assert_eq!(e.status(), StatusEmprestimo::Pendente);
        assert_eq!(e.tipo(), TipoEmprestimo::Normal);
        assert_eq!(e.situacao.data_retorno(), None);
        assert_eq!(e.modalidade.justificativa(), None);
    }

    #[test]
    fn test_decode_returned_administrative_loan() {
        let e: Emprestimo =
            serde_json::from_value(emprestimo_json("e2", "DEVOLVIDO", "ADMINISTRATIVO")).unwrap();
        assert_eq!(e.status(), StatusEmprestimo::Devolvido);
        assert!(e.situacao.data_retorno().is_some());
        assert_eq!(
            e.modalidade.justificativa(),
            Some("Sistema fora do ar durante a manhã")
        );
    }

    #[test]
    fn test_rejects_returned_without_date() {
        let mut payload = emprestimo_json("e3", "DEVOLVIDO", "NORMAL");
        payload["dataRetorno"] = Value::Null;
        let err = serde_json::from_value::<Emprestimo>(payload).unwrap_err();
        assert!(err.to_string().contains("returned loan without return date"));
    }

    #[test]
    fn test_rejects_return_before_withdrawal() {
        let mut payload = emprestimo_json("e4", "DEVOLVIDO", "NORMAL");
        payload["dataRetorno"] = json!("2024-12-31T10:00:00.000Z");
        assert!(serde_json::from_value::<Emprestimo>(payload).is_err());
    }

    #[test]
    fn test_rejects_administrative_without_justification() {
        let mut payload = emprestimo_json("e5", "PENDENTE", "ADMINISTRATIVO");
        payload["justificativa"] = json!("   ");
        assert!(serde_json::from_value::<Emprestimo>(payload).is_err());
    }

    #[test]
    fn test_detail_only_carries_return_side_when_returned() {
        let mut pendente = emprestimo_json("e6", "PENDENTE", "NORMAL");
        pendente["UsuarioSolicitante"] = json!({"id": "u1", "nome": "Ana", "matricula": "20210001"});
        pendente["UsuarioDevolucao"] = Value::Null;
        pendente["OperadorSolicitacao"] =
            json!({"id": "op1", "name": "Op", "email": "op@uni.br", "role": "OPERADOR"});
        pendente["OperadorDevolucao"] = Value::Null;
        pendente["Chave"] = crate::models::chave::tests::armario_json("k1", "A1");

        let detalhe: EmprestimoDetalhado = serde_json::from_value(pendente.clone()).unwrap();
        assert!(detalhe.devolucao.is_none());
        assert_eq!(detalhe.usuario_solicitante.nome, "Ana");

        let mut devolvido = pendente;
        devolvido["status"] = json!("DEVOLVIDO");
        devolvido["dataRetorno"] = json!("2025-01-02T10:00:00.000Z");
        devolvido["UsuarioDevolucao"] = json!({"id": "u2", "nome": "Caio", "matricula": "20210002"});
        let detalhe: EmprestimoDetalhado = serde_json::from_value(devolvido).unwrap();
        let devolucao = detalhe.devolucao.unwrap();
        assert_eq!(devolucao.usuario.unwrap().nome, "Caio");
        assert!(devolucao.operador.is_none());
    }
}

use crate::constants::messages::{NOT_APPLICABLE, NOT_RETURNED_SHORT};
use crate::domain::EmprestimoId;
use crate::models::{
    Chave, Emprestimo, EmprestimoDetalhado, Operador, StatusEmprestimo, TipoEmprestimo, Usuario,
};

use super::format_instant;

/// One card of the loan detail screen, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmprestimoSection<'a> {
    Chave(&'a Chave),
    Emprestimo(&'a Emprestimo),
    Justificativa(&'a str),
    Solicitante(&'a Usuario),
    /// Who brought the key back. The join may be missing on old records.
    UsuarioDevolucao(Option<&'a Usuario>),
    OperadorSolicitacao(Option<&'a Operador>),
    OperadorDevolucao(Option<&'a Operador>),
    /// Stands in for a return-side card while the loan is pending.
    NaoDevolvido,
}

#[must_use]
pub fn emprestimo_sections(detalhe: &EmprestimoDetalhado) -> Vec<EmprestimoSection<'_>> {
    let emprestimo = &detalhe.emprestimo;
    let mut sections = vec![
        EmprestimoSection::Chave(&detalhe.chave),
        EmprestimoSection::Emprestimo(emprestimo),
    ];

    if let Some(justificativa) = emprestimo.modalidade.justificativa() {
        sections.push(EmprestimoSection::Justificativa(justificativa));
    }

    sections.push(EmprestimoSection::Solicitante(&detalhe.usuario_solicitante));

    match &detalhe.devolucao {
        Some(devolucao) => {
            sections.push(EmprestimoSection::UsuarioDevolucao(devolucao.usuario.as_ref()));
            sections.push(EmprestimoSection::OperadorSolicitacao(
                detalhe.operador_solicitacao.as_ref(),
            ));
            sections.push(EmprestimoSection::OperadorDevolucao(devolucao.operador.as_ref()));
        }
        None => {
            sections.push(EmprestimoSection::NaoDevolvido);
            sections.push(EmprestimoSection::OperadorSolicitacao(
                detalhe.operador_solicitacao.as_ref(),
            ));
            sections.push(EmprestimoSection::NaoDevolvido);
        }
    }

    sections
}

/// A row of the loan history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinhaEmprestimo {
    pub id: EmprestimoId,
    pub tipo: TipoEmprestimo,
    pub justificativa: String,
    pub status: StatusEmprestimo,
    pub retirada: String,
    pub retorno: String,
}

impl From<&Emprestimo> for LinhaEmprestimo {
    fn from(emprestimo: &Emprestimo) -> Self {
        Self {
            id: emprestimo.id.clone(),
            tipo: emprestimo.tipo(),
            justificativa: emprestimo
                .modalidade
                .justificativa()
                .unwrap_or(NOT_APPLICABLE)
                .to_string(),
            status: emprestimo.status(),
            retirada: format_instant(emprestimo.data_retirada),
            retorno: emprestimo
                .situacao
                .data_retorno()
                .map_or_else(|| NOT_RETURNED_SHORT.to_string(), format_instant),
        }
    }
}

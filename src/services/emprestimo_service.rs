//! Loan reads and the three loan-creating writes.

use anyhow::Result;

use crate::domain::{ChaveId, EmprestimoId};
use crate::filters::EmprestimosFilter;
use crate::models::{Emprestimo, EmprestimoDetalhado};
use crate::schema::{Matricula, NovoEmprestimoAdministrativo};

/// Loan operations.
///
/// Reads log and return `None` on failure. Writes propagate the error so the
/// caller can report it; an API error envelope is kept in the error chain.
/// A write the API accepted is `Ok` even when the echoed loan is missing or
/// unreadable, which comes back as `None`.
#[async_trait::async_trait]
pub trait EmprestimoService: Send + Sync {
    async fn listar(&self, filter: &EmprestimosFilter) -> Option<Vec<Emprestimo>>;

    async fn buscar(&self, id: &EmprestimoId) -> Option<EmprestimoDetalhado>;

    /// `POST /emprestimos/retirada/{chaveId}`
    async fn gerar(&self, chave: &ChaveId, matricula: &Matricula) -> Result<Option<Emprestimo>>;

    /// `POST /emprestimos/devolucao/{chaveId}`
    async fn retornar(&self, chave: &ChaveId, matricula: &Matricula) -> Result<Option<Emprestimo>>;

    /// `POST /emprestimos/emprestimo-administrativo`
    async fn administrativo(&self, novo: &NovoEmprestimoAdministrativo) -> Result<Option<Emprestimo>>;
}

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::clients::ApiClient;
use crate::domain::{ChaveId, EmprestimoId};
use crate::filters::EmprestimosFilter;
use crate::models::{Emprestimo, EmprestimoDetalhado};
use crate::schema::{Matricula, NovoEmprestimoAdministrativo};
use crate::services::emprestimo_service::EmprestimoService;

/// [`EmprestimoService`] over the REST API.
#[derive(Debug, Clone)]
pub struct HttpEmprestimoService {
    api: ApiClient,
}

impl HttpEmprestimoService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

/// Reads the loan a write echoes back. The write already went through, so an
/// empty or unreadable body is logged and dropped.
fn echoed(body: Value, chave: &ChaveId) -> Option<Emprestimo> {
    if body.is_null() {
        return None;
    }
    match serde_json::from_value(body) {
        Ok(emprestimo) => Some(emprestimo),
        Err(e) => {
            warn!(chave_id = %chave, error = %e, "Unreadable loan in write response");
            None
        }
    }
}

fn chave_path(action: &str, chave: &ChaveId) -> String {
    format!(
        "/emprestimos/{action}/{}",
        urlencoding::encode(chave.as_str())
    )
}

#[async_trait::async_trait]
impl EmprestimoService for HttpEmprestimoService {
    async fn listar(&self, filter: &EmprestimosFilter) -> Option<Vec<Emprestimo>> {
        match self.api.get_json("/emprestimos", &filter.to_query()).await {
            Ok(emprestimos) => Some(emprestimos),
            Err(e) => {
                error!(error = %e, "Failed to list loans");
                None
            }
        }
    }

    async fn buscar(&self, id: &EmprestimoId) -> Option<EmprestimoDetalhado> {
        let path = format!("/emprestimos/{}", urlencoding::encode(id.as_str()));
        match self.api.get_json(&path, &[]).await {
            Ok(emprestimo) => Some(emprestimo),
            Err(e) => {
                error!(emprestimo_id = %id, error = %e, "Failed to fetch loan");
                None
            }
        }
    }

    async fn gerar(&self, chave: &ChaveId, matricula: &Matricula) -> Result<Option<Emprestimo>> {
        let body: Value = self
            .api
            .post_json(&chave_path("retirada", chave), matricula)
            .await
            .with_context(|| format!("Failed to open loan for key {chave}"))?;

        let emprestimo = echoed(body, chave);
        info!(
            chave_id = %chave,
            emprestimo_id = ?emprestimo.as_ref().map(|e| e.id.to_string()),
            "Loan opened"
        );
        Ok(emprestimo)
    }

    async fn retornar(&self, chave: &ChaveId, matricula: &Matricula) -> Result<Option<Emprestimo>> {
        let body: Value = self
            .api
            .post_json(&chave_path("devolucao", chave), matricula)
            .await
            .with_context(|| format!("Failed to return loan for key {chave}"))?;

        let emprestimo = echoed(body, chave);
        info!(
            chave_id = %chave,
            emprestimo_id = ?emprestimo.as_ref().map(|e| e.id.to_string()),
            "Loan returned"
        );
        Ok(emprestimo)
    }

    async fn administrativo(
        &self,
        novo: &NovoEmprestimoAdministrativo,
    ) -> Result<Option<Emprestimo>> {
        let body: Value = self
            .api
            .post_json("/emprestimos/emprestimo-administrativo", novo)
            .await
            .with_context(|| format!("Failed to register administrative loan for key {}", novo.chave_id))?;

        let emprestimo = echoed(body, &novo.chave_id);
        info!(
            chave_id = %novo.chave_id,
            emprestimo_id = ?emprestimo.as_ref().map(|e| e.id.to_string()),
            status = %novo.status,
            "Administrative loan registered"
        );
        Ok(emprestimo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::emprestimo::tests::emprestimo_json;

    #[test]
    fn test_echoed_loan_is_optional() {
        let chave = ChaveId::new("k1");
        assert!(echoed(Value::Null, &chave).is_none());
        assert!(echoed(serde_json::json!({ "ok": true }), &chave).is_none());

        let loan = echoed(emprestimo_json("e1", "PENDENTE", "NORMAL"), &chave).unwrap();
        assert_eq!(loan.id.as_str(), "e1");
    }
}

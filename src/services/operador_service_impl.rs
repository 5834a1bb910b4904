use anyhow::{Context, Result};
use tracing::{error, info};

use crate::clients::{ApiClient, AuthClient, SessionUser};
use crate::domain::OperadorId;
use crate::models::Operador;
use crate::schema::NovoOperador;
use crate::services::operador_service::OperadorService;

#[derive(Debug, Clone)]
pub struct HttpOperadorService {
    api: ApiClient,
    auth: AuthClient,
}

impl HttpOperadorService {
    #[must_use]
    pub const fn new(api: ApiClient, auth: AuthClient) -> Self {
        Self { api, auth }
    }
}

#[async_trait::async_trait]
impl OperadorService for HttpOperadorService {
    async fn listar(&self) -> Option<Vec<Operador>> {
        match self.api.get_json("/operadores", &[]).await {
            Ok(operadores) => Some(operadores),
            Err(e) => {
                error!(error = %e, "Failed to list operators");
                None
            }
        }
    }

    async fn cadastrar(&self, novo: &NovoOperador) -> Result<SessionUser> {
        self.auth.sign_up_email(novo).await
    }

    async fn remover(&self, id: &OperadorId) -> Result<()> {
        let path = format!("/operadores/{}", urlencoding::encode(id.as_str()));
        self.api
            .delete(&path)
            .await
            .with_context(|| format!("Failed to remove operator {id}"))?;

        info!(operador_id = %id, "Operator removed");
        Ok(())
    }
}

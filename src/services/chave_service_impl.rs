use tracing::error;

use crate::clients::ApiClient;
use crate::domain::ChaveId;
use crate::filters::ChavesFilter;
use crate::models::{Chave, ChaveComEmprestimos};
use crate::services::chave_service::ChaveService;

/// [`ChaveService`] over the REST API.
#[derive(Debug, Clone)]
pub struct HttpChaveService {
    api: ApiClient,
}

impl HttpChaveService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ChaveService for HttpChaveService {
    async fn listar(&self, filter: &ChavesFilter) -> Option<Vec<Chave>> {
        match self.api.get_json("/chaves", &filter.to_query()).await {
            Ok(chaves) => Some(chaves),
            Err(e) => {
                error!(error = %e, "Failed to list keys");
                None
            }
        }
    }

    async fn buscar(&self, id: &ChaveId) -> Option<ChaveComEmprestimos> {
        let path = format!("/chaves/{}", urlencoding::encode(id.as_str()));
        match self.api.get_json(&path, &[]).await {
            Ok(chave) => Some(chave),
            Err(e) => {
                error!(chave_id = %id, error = %e, "Failed to fetch key");
                None
            }
        }
    }
}

//! Read access to keys.

use crate::domain::ChaveId;
use crate::filters::ChavesFilter;
use crate::models::{Chave, ChaveComEmprestimos};

/// Key reads.
///
/// Failures are logged by the implementation and reported as `None`, which
/// screens render as an error state. An empty listing is `Some(vec![])`.
#[async_trait::async_trait]
pub trait ChaveService: Send + Sync {
    /// `GET /chaves` with the filter's query parameters.
    async fn listar(&self, filter: &ChavesFilter) -> Option<Vec<Chave>>;

    /// `GET /chaves/{id}`, with the loans that reference the key.
    async fn buscar(&self, id: &ChaveId) -> Option<ChaveComEmprestimos>;
}

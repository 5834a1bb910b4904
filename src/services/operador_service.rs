use anyhow::Result;

use crate::clients::SessionUser;
use crate::domain::OperadorId;
use crate::models::Operador;
use crate::schema::NovoOperador;

/// Operator account management. Admin only on the server side.
#[async_trait::async_trait]
pub trait OperadorService: Send + Sync {
    /// `GET /operadores`. `None` when the read failed.
    async fn listar(&self) -> Option<Vec<Operador>>;

    /// Creates an account through the session service's sign-up.
    async fn cadastrar(&self, novo: &NovoOperador) -> Result<SessionUser>;

    /// `DELETE /operadores/{id}`
    async fn remover(&self, id: &OperadorId) -> Result<()>;
}

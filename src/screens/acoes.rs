//! Withdrawal, return and administrative loan flows.
//!
//! Every flow validates locally, calls the API once, and only on success
//! marks the affected cache families stale. Nothing is updated optimistically.
//! Success is the API accepting the write; the echoed loan is optional.

use std::future::Future;

use tracing::{error, info};

use super::{ActionError, Done, Notification};
use crate::domain::ChaveId;
use crate::error::handle_api_error;
use crate::models::Emprestimo;
use crate::query::{Mutation, QueryCache};
use crate::schema::{EmprestimoAdministrativoForm, MatriculaForm};
use crate::state::AppState;

/// Awaits a write and settles the cache and the toast for it.
pub(crate) async fn run_mutation<T, Fut>(
    cache: &QueryCache,
    mutation: Mutation,
    write: Fut,
) -> Result<Done<T>, ActionError>
where
    Fut: Future<Output = anyhow::Result<T>>,
{
    match write.await {
        Ok(value) => {
            cache.invalidate(mutation).await;
            info!(%mutation, "Mutation succeeded");
            Ok(Done {
                value,
                notification: Notification::success(mutation.success_message()),
            })
        }
        Err(e) => {
            let api = handle_api_error(&e);
            error!(
                %mutation,
                identifier = api.identifier(),
                status = api.status_code(),
                error = %e,
                "Mutation failed"
            );
            Err(ActionError::Rejected(Notification::error(&api)))
        }
    }
}

/// Opens a loan of `chave` for the requester typed in `form`.
pub async fn gerar_emprestimo(
    state: &AppState,
    chave: &ChaveId,
    form: &MatriculaForm,
) -> Result<Done<Option<Emprestimo>>, ActionError> {
    let matricula = form.validate_form()?;
    run_mutation(
        &state.cache,
        Mutation::GerarEmprestimo,
        state.emprestimos.gerar(chave, &matricula),
    )
    .await
}

/// Closes the open loan of `chave`.
pub async fn retornar_emprestimo(
    state: &AppState,
    chave: &ChaveId,
    form: &MatriculaForm,
) -> Result<Done<Option<Emprestimo>>, ActionError> {
    let matricula = form.validate_form()?;
    run_mutation(
        &state.cache,
        Mutation::RetornarEmprestimo,
        state.emprestimos.retornar(chave, &matricula),
    )
    .await
}

/// Records a loan made outside the normal flow.
pub async fn emprestimo_administrativo(
    state: &AppState,
    form: &EmprestimoAdministrativoForm,
) -> Result<Done<Option<Emprestimo>>, ActionError> {
    let novo = form.validate_form()?;
    run_mutation(
        &state.cache,
        Mutation::EmprestimoAdministrativo,
        state.emprestimos.administrativo(&novo),
    )
    .await
}

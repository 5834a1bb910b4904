use tracing::warn;

use super::acoes::run_mutation;
use super::{ActionError, Done};
use crate::clients::SessionUser;
use crate::constants::query_keys::OPERADORES;
use crate::domain::OperadorId;
use crate::models::Operador;
use crate::query::{Mutation, QueryKey, QueryState};
use crate::schema::SignUpForm;
use crate::state::AppState;

pub async fn listar(state: &AppState) -> QueryState<Vec<Operador>> {
    let service = state.operadores.clone();
    let result = state
        .cache
        .fetch(QueryKey::list(OPERADORES), || async move { service.listar().await })
        .await;
    QueryState::from_list(result)
}

/// Creates an operator account.
///
/// Sign-up answers with the new account's session cookies, so the cookies
/// saved for the signed-in admin are put back afterwards, whatever the outcome.
pub async fn cadastrar(
    state: &AppState,
    form: &SignUpForm,
) -> Result<Done<SessionUser>, ActionError> {
    let novo = form.validate_form()?;
    let result = run_mutation(
        &state.cache,
        Mutation::CadastrarOperador,
        state.operadores.cadastrar(&novo),
    )
    .await;
    state.session.restore_cookies();
    result
}

/// Deletes an operator account. Nothing is sent unless `confirmed`.
pub async fn remover(
    state: &AppState,
    id: &OperadorId,
    confirmed: bool,
) -> Result<Done<()>, ActionError> {
    if !confirmed {
        warn!(operador_id = %id, "Operator removal not confirmed");
        return Err(ActionError::Cancelled);
    }
    run_mutation(
        &state.cache,
        Mutation::RemoverOperador,
        state.operadores.remover(id),
    )
    .await
}

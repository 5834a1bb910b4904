mod common;

use common::FakeApi;
use chaveiro::domain::{ChaveId, EmprestimoId};
use chaveiro::error::handle_api_error;
use chaveiro::filters::{ChavesFilter, DateRange, EmprestimosFilter, Location};
use chaveiro::models::{StatusChave, StatusEmprestimo, TipoChave};
use chaveiro::schema::{Credenciais, MatriculaForm};
use chaveiro::screens::{ActionError, acoes, emprestimos};
use chaveiro::query::QueryState;
use chrono::NaiveDate;

async fn signed_in(api: &FakeApi, email: &str) -> chaveiro::state::AppState {
    let state = api.app_state();
    state
        .session
        .sign_in(&Credenciais {
            email: email.to_string(),
            password: common::PASSWORD.to_string(),
        })
        .await
        .unwrap();
    state
}

#[tokio::test]
async fn test_key_listing_decodes_variants() {
    let api = FakeApi::spawn().await;
    let state = api.app_state();

    let chaves = state.chaves.listar(&ChavesFilter::default()).await.unwrap();
    assert_eq!(chaves.len(), 2);
    assert!(chaves.iter().all(|c| c.tipo() == TipoChave::Armario));
    assert_eq!(chaves[0].codigo(), "A12");
}

#[tokio::test]
async fn test_loan_listing_sends_every_filter_field() {
    let api = FakeApi::spawn().await;
    let state = api.app_state();

    let location = Location::parse(
        "/listar-emprestimos?status=PENDENTE&nomeSolicitante=Ana%20Souza&dataRetirada=2025-03-10&dataRetorno=2025-03-17",
    );
    let defaults = DateRange::window(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 7);
    let filter = EmprestimosFilter::from_location(&location, defaults);
    assert_eq!(filter.status, Some(StatusEmprestimo::Pendente));

    let rows = state.emprestimos.listar(&filter).await.unwrap();
    assert_eq!(rows.len(), 1);

    let query = api.backend.last_emprestimos_query.lock().unwrap().clone().unwrap();
    assert!(query.contains("status=PENDENTE"));
    assert!(query.contains("dataRetirada=2025-03-10"));
    assert!(query.contains("dataRetorno=2025-03-17"));
    assert!(query.contains("nomeSolicitante=Ana+Souza"));
}

#[tokio::test]
async fn test_error_envelope_reaches_notification() {
    let api = FakeApi::spawn().await;
    let state = signed_in(&api, common::OPERADOR_EMAIL).await;
    let form = MatriculaForm::new("20210001");

    acoes::gerar_emprestimo(&state, &ChaveId::new("k1"), &form)
        .await
        .unwrap();
    let err = acoes::gerar_emprestimo(&state, &ChaveId::new("k1"), &form)
        .await
        .unwrap_err();

    let ActionError::Rejected(notification) = err else {
        panic!("expected rejection");
    };
    assert_eq!(notification.title, "Ocorreu um erro");
    assert_eq!(
        notification.description.as_deref(),
        Some("A chave já está emprestada")
    );
}

#[tokio::test]
async fn test_envelope_survives_error_context() {
    let api = FakeApi::spawn().await;
    let state = api.app_state();

    let err = state
        .emprestimos
        .gerar(
            &ChaveId::new("k1"),
            &MatriculaForm::new("20210001").validate_form().unwrap(),
        )
        .await
        .unwrap_err();

    let api_error = handle_api_error(&err);
    assert_eq!(api_error.status_code(), 401);
    assert_eq!(api_error.identifier(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_return_sends_json_content_type() {
    let api = FakeApi::spawn().await;
    let state = signed_in(&api, common::OPERADOR_EMAIL).await;
    let form = MatriculaForm::new("20210001");

    acoes::gerar_emprestimo(&state, &ChaveId::new("k1"), &form)
        .await
        .unwrap();
    let done = acoes::retornar_emprestimo(&state, &ChaveId::new("k1"), &form)
        .await
        .unwrap();

    assert_eq!(done.value.unwrap().status(), StatusEmprestimo::Devolvido);
    assert_eq!(
        api.backend.devolucao_content_type.lock().unwrap().as_deref(),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_loan_detail_states() {
    let api = FakeApi::spawn().await;
    let state = api.app_state();

    let found = emprestimos::detalhe(&state, &EmprestimoId::new("e1")).await;
    let detalhe = found.ready().unwrap();
    assert_eq!(detalhe.usuario_solicitante.nome, "Ana Souza");
    assert!(detalhe.devolucao.is_none());

    let missing = emprestimos::detalhe(&state, &EmprestimoId::new("e404")).await;
    assert_eq!(missing, QueryState::Error);
}

#[tokio::test]
async fn test_unavailable_listing_after_withdrawal() {
    let api = FakeApi::spawn().await;
    let state = signed_in(&api, common::OPERADOR_EMAIL).await;

    acoes::gerar_emprestimo(&state, &ChaveId::new("k1"), &MatriculaForm::new("20210001"))
        .await
        .unwrap();

    let filter = ChavesFilter {
        status: StatusChave::Indisponivel,
        ..ChavesFilter::default()
    };
    let chaves = state.chaves.listar(&filter).await.unwrap();
    assert_eq!(chaves.len(), 1);
    assert_eq!(chaves[0].id.as_str(), "k1");
}

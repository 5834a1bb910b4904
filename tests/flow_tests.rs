mod common;

use common::FakeApi;
use chaveiro::config::Config;
use chaveiro::domain::{ChaveId, OperadorId};
use chaveiro::filters::{ChavesFilter, DateRange, Location};
use chaveiro::models::{StatusChave, TipoEmprestimo};
use chaveiro::routes::{RedirectReason, Route};
use chaveiro::schema::{Credenciais, EmprestimoAdministrativoForm, MatriculaForm, SignUpForm};
use chaveiro::screens::chaves::{ChavesScreen, KeyPanel, find};
use chaveiro::screens::emprestimos::EmprestimosScreen;
use chaveiro::screens::{ActionError, acoes, operadores};
use chrono::NaiveDate;
use std::sync::atomic::Ordering;
use chaveiro::session::SessionStore;
use chaveiro::state::AppState;
use chaveiro::view::ChaveSection;

fn credenciais(email: &str) -> Credenciais {
    Credenciais {
        email: email.to_string(),
        password: common::PASSWORD.to_string(),
    }
}

async fn signed_in(api: &FakeApi, email: &str) -> AppState {
    let state = api.app_state();
    state.session.sign_in(&credenciais(email)).await.unwrap();
    state
}

#[tokio::test]
async fn test_withdrawal_invalidates_key_listing() {
    let api = FakeApi::spawn().await;
    let state = signed_in(&api, common::OPERADOR_EMAIL).await;

    let mut screen = ChavesScreen::new(&state, Location::parse("/emprestimos"));
    assert_eq!(screen.load().await.ready().map(Vec::len), Some(2));
    screen.load().await;
    assert_eq!(FakeApi::count(&api.backend.chaves_listed), 1);

    acoes::gerar_emprestimo(&state, &ChaveId::new("k1"), &MatriculaForm::new("20210001"))
        .await
        .unwrap();

    let mut screen = ChavesScreen::new(&state, Location::parse("/emprestimos"));
    let chaves = screen.load().await.ready().cloned().unwrap();
    assert_eq!(FakeApi::count(&api.backend.chaves_listed), 2);
    assert_eq!(chaves.len(), 1);
    assert_eq!(chaves[0].id.as_str(), "k2");
}

#[tokio::test]
async fn test_failed_withdrawal_keeps_cached_listing() {
    let api = FakeApi::spawn().await;
    let state = api.app_state();

    let mut screen = ChavesScreen::new(&state, Location::parse("/emprestimos"));
    screen.load().await;

    // no session: the API refuses
    let result =
        acoes::gerar_emprestimo(&state, &ChaveId::new("k1"), &MatriculaForm::new("20210001"))
            .await;
    assert!(result.is_err());

    let mut screen = ChavesScreen::new(&state, Location::parse("/emprestimos"));
    screen.load().await;
    assert_eq!(FakeApi::count(&api.backend.chaves_listed), 1);
}

#[tokio::test]
async fn test_accepted_withdrawal_without_body_still_invalidates() {
    let api = FakeApi::spawn().await;
    api.backend.bare_writes.store(true, Ordering::SeqCst);
    let state = signed_in(&api, common::OPERADOR_EMAIL).await;

    let mut screen = ChavesScreen::new(&state, Location::parse("/emprestimos"));
    screen.load().await;
    assert_eq!(FakeApi::count(&api.backend.chaves_listed), 1);

    let done = acoes::gerar_emprestimo(&state, &ChaveId::new("k1"), &MatriculaForm::new("20210001"))
        .await
        .unwrap();
    assert!(done.value.is_none());
    assert!(done.notification.is_success());

    let mut screen = ChavesScreen::new(&state, Location::parse("/emprestimos"));
    let chaves = screen.load().await.ready().cloned().unwrap();
    assert_eq!(FakeApi::count(&api.backend.chaves_listed), 2);
    assert_eq!(chaves.len(), 1);
    assert_eq!(chaves[0].id.as_str(), "k2");
}

const CHAVE_UUID: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

fn administrativo_form() -> EmprestimoAdministrativoForm {
    EmprestimoAdministrativoForm {
        chave_id: CHAVE_UUID.to_string(),
        justificativa: "Sistema fora do ar durante a manhã".to_string(),
        data_retirada: "2025-03-10T09:30:00-03:00".to_string(),
        status: "PENDENTE".to_string(),
        data_retorno: Some("2025-03-10T17:00:00-03:00".to_string()),
    }
}

#[tokio::test]
async fn test_administrative_loan_end_to_end() {
    let api = FakeApi::spawn().await;
    let state = signed_in(&api, common::ADMIN_EMAIL).await;
    let defaults = DateRange::window(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(), 7);

    ChavesScreen::new(&state, Location::parse("/emprestimos")).load().await;
    EmprestimosScreen::new(&state, Location::parse("/listar-emprestimos"), defaults)
        .load()
        .await;
    assert_eq!(FakeApi::count(&api.backend.chaves_listed), 1);
    assert_eq!(FakeApi::count(&api.backend.emprestimos_listed), 1);

    let done = acoes::emprestimo_administrativo(&state, &administrativo_form())
        .await
        .unwrap();
    let emprestimo = done.value.unwrap();
    assert_eq!(emprestimo.tipo(), TipoEmprestimo::Administrativo);
    assert!(emprestimo.situacao.is_pendente());

    let body = api.backend.administrativo_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["chaveId"], CHAVE_UUID);
    assert_eq!(body["status"], "PENDENTE");
    assert_eq!(body["justificativa"], "Sistema fora do ar durante a manhã");
    assert_eq!(body["dataRetirada"], "2025-03-10T09:30:00-03:00");
    assert!(body.get("dataRetorno").is_none());

    // both listings were marked stale and refetch
    ChavesScreen::new(&state, Location::parse("/emprestimos")).load().await;
    EmprestimosScreen::new(&state, Location::parse("/listar-emprestimos"), defaults)
        .load()
        .await;
    assert_eq!(FakeApi::count(&api.backend.chaves_listed), 2);
    assert_eq!(FakeApi::count(&api.backend.emprestimos_listed), 2);
}

#[tokio::test]
async fn test_administrative_loan_refused_for_operator() {
    let api = FakeApi::spawn().await;
    let state = signed_in(&api, common::OPERADOR_EMAIL).await;

    ChavesScreen::new(&state, Location::parse("/emprestimos")).load().await;

    let err = acoes::emprestimo_administrativo(&state, &administrativo_form())
        .await
        .unwrap_err();
    let ActionError::Rejected(notification) = err else {
        panic!("expected rejection");
    };
    assert_eq!(notification.description.as_deref(), Some("Acesso negado"));

    ChavesScreen::new(&state, Location::parse("/emprestimos")).load().await;
    assert_eq!(FakeApi::count(&api.backend.chaves_listed), 1);
}

#[tokio::test]
async fn test_holder_lookup_only_for_unavailable_keys() {
    let api = FakeApi::spawn().await;
    let state = signed_in(&api, common::OPERADOR_EMAIL).await;

    let disponivel = find(&state, &ChavesFilter::default(), "k2").await.unwrap();
    let panel = KeyPanel::load(&state, disponivel, StatusChave::Disponivel).await;
    assert_eq!(FakeApi::count(&api.backend.chave_fetched), 0);
    assert!(panel.render().contains("Bloco: B"));

    acoes::gerar_emprestimo(&state, &ChaveId::new("k1"), &MatriculaForm::new("20210001"))
        .await
        .unwrap();

    let indisponiveis = ChavesFilter {
        status: StatusChave::Indisponivel,
        ..ChavesFilter::default()
    };
    let emprestada = find(&state, &indisponiveis, "k1").await.unwrap();
    let panel = KeyPanel::load(&state, emprestada, StatusChave::Indisponivel).await;
    assert_eq!(FakeApi::count(&api.backend.chave_fetched), 1);

    let Some(ChaveSection::Portador(portador)) = panel.sections().last().cloned() else {
        panic!("expected holder section");
    };
    assert_eq!(portador.nome, "Ana Souza");
}

#[tokio::test]
async fn test_session_lifecycle() {
    let api = FakeApi::spawn().await;
    let path = std::env::temp_dir()
        .join(format!("chaveiro-it-{}", uuid::Uuid::new_v4()))
        .join("session");
    let with_file = || {
        let mut config = Config::default();
        config.api.base_url = api.base_url.clone();
        AppState::with_store(config, SessionStore::new(&path)).unwrap()
    };

    let state = with_file();
    assert!(state.session.acquire().await.is_none());

    let session = state
        .session
        .sign_in(&credenciais(common::ADMIN_EMAIL))
        .await
        .unwrap();
    assert!(session.is_admin());
    assert_eq!(session.user.name, "Admin");
    assert!(path.exists());

    // the next invocation picks the saved cookies up
    let next = with_file();
    let restored = next.session.acquire().await.unwrap();
    assert_eq!(restored.user.email, common::ADMIN_EMAIL);

    next.session.sign_out().await.unwrap();
    assert!(next.session.current().await.is_none());
    assert!(!path.exists());
    assert!(with_file().session.acquire().await.is_none());
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let api = FakeApi::spawn().await;
    let state = api.app_state();

    let err = state
        .session
        .sign_in(&Credenciais {
            email: common::ADMIN_EMAIL.to_string(),
            password: "errada".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Sign-in failed"));
    assert!(state.session.current().await.is_none());
}

#[tokio::test]
async fn test_guards_follow_session_role() {
    let api = FakeApi::spawn().await;

    let anonymous = api.app_state();
    let session = anonymous.session.acquire().await;
    let redirect = Route::Operadores.guard(session.as_ref()).unwrap_err();
    assert_eq!(redirect.reason, RedirectReason::Unauthenticated);
    assert_eq!(redirect.to, Route::SignIn);

    let operador = signed_in(&api, common::OPERADOR_EMAIL).await;
    let session = operador.session.current().await;
    let redirect = Route::EmprestimoAdministrativo
        .guard(session.as_ref())
        .unwrap_err();
    assert_eq!(redirect.reason, RedirectReason::Forbidden);
    assert_eq!(redirect.to.location().to_string(), "/emprestimos?status=disponivel");

    let admin = signed_in(&api, common::ADMIN_EMAIL).await;
    let session = admin.session.current().await;
    assert_eq!(
        Route::Operadores.guard(session.as_ref()),
        Ok(Route::Operadores)
    );
    let redirect = Route::SignIn.guard(session.as_ref()).unwrap_err();
    assert_eq!(redirect.reason, RedirectReason::AlreadySignedIn);
    assert_eq!(redirect.to, Route::Dashboard);
}

#[tokio::test]
async fn test_sign_up_keeps_admin_signed_in() {
    let api = FakeApi::spawn().await;
    let state = signed_in(&api, common::ADMIN_EMAIL).await;

    assert_eq!(operadores::listar(&state).await.ready().map(Vec::len), Some(2));

    let form = SignUpForm {
        name: "Novo Operador".to_string(),
        email: "novo@uni.br".to_string(),
        password: "12345678".to_string(),
    };
    let done = operadores::cadastrar(&state, &form).await.unwrap();
    assert_eq!(done.value.email, "novo@uni.br");
    assert_eq!(FakeApi::count(&api.backend.signups), 1);

    let session = state.session.refresh().await.unwrap();
    assert_eq!(session.user.email, common::ADMIN_EMAIL);
}

#[tokio::test]
async fn test_operator_removal_needs_confirmation() {
    let api = FakeApi::spawn().await;
    let state = signed_in(&api, common::ADMIN_EMAIL).await;
    let id = OperadorId::new("op-2");

    assert!(operadores::remover(&state, &id, false).await.is_err());
    assert!(api.backend.removed.lock().unwrap().is_empty());

    operadores::remover(&state, &id, true).await.unwrap();
    assert_eq!(*api.backend.removed.lock().unwrap(), vec!["op-2".to_string()]);
}

//! In-process stand-in for the key-lending API and its session service.
//!
//! One key (`k1`) can be lent and returned. Every call is counted so tests can
//! tell cached reads from refetches.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chaveiro::config::Config;
use chaveiro::session::SessionStore;
use chaveiro::state::AppState;
use serde_json::{Value, json};

pub const COOKIE_NAME: &str = "better-auth.session_token";
pub const PASSWORD: &str = "senha-correta";
pub const ADMIN_EMAIL: &str = "admin@uni.br";
pub const OPERADOR_EMAIL: &str = "operador@uni.br";

#[derive(Default)]
pub struct Backend {
    pub chaves_listed: AtomicUsize,
    pub chave_fetched: AtomicUsize,
    pub emprestimos_listed: AtomicUsize,
    pub emprestada: AtomicBool,
    pub signups: AtomicUsize,
    pub last_emprestimos_query: Mutex<Option<String>>,
    pub devolucao_content_type: Mutex<Option<String>>,
    pub removed: Mutex<Vec<String>>,
    pub administrativo_body: Mutex<Option<Value>>,
    /// Accept withdrawals with a bare 201 and no loan in the body.
    pub bare_writes: AtomicBool,
}

pub struct FakeApi {
    pub base_url: String,
    pub backend: Arc<Backend>,
}

impl FakeApi {
    pub async fn spawn() -> Self {
        let backend = Arc::new(Backend::default());
        let app = router(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            backend,
        }
    }

    /// Client state pointed at this backend with its own session file.
    pub fn app_state(&self) -> AppState {
        let mut config = Config::default();
        config.api.base_url = self.base_url.clone();
        let store = SessionStore::new(
            std::env::temp_dir()
                .join(format!("chaveiro-it-{}", uuid::Uuid::new_v4()))
                .join("session"),
        );
        AppState::with_store(config, store).unwrap()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn router(backend: Arc<Backend>) -> Router {
    Router::new()
        .route("/chaves", get(listar_chaves))
        .route("/chaves/{id}", get(buscar_chave))
        .route("/emprestimos", get(listar_emprestimos))
        .route("/emprestimos/{id}", get(buscar_emprestimo))
        .route("/emprestimos/retirada/{id}", post(retirada))
        .route("/emprestimos/devolucao/{id}", post(devolucao))
        .route("/emprestimos/emprestimo-administrativo", post(administrativo))
        .route("/operadores", get(listar_operadores))
        .route("/operadores/{id}", delete(remover_operador))
        .route("/api/auth/sign-in/email", post(sign_in))
        .route("/api/auth/sign-up/email", post(sign_up))
        .route("/api/auth/sign-out", post(sign_out))
        .route("/api/auth/get-session", get(get_session))
        .with_state(backend)
}

pub fn armario(id: &str, codigo: &str) -> Value {
    json!({
        "id": id,
        "tipo": "ARMARIO",
        "armarioId": format!("arm-{id}"),
        "ambienteId": null,
        "Armario": {
            "id": format!("arm-{id}"),
            "codigo": codigo,
            "bloco": "B",
            "localizacao": "SNO"
        },
        "Ambiente": null
    })
}

pub fn emprestimo(id: &str, chave_id: &str, status: &str) -> Value {
    let devolvido = status == "DEVOLVIDO";
    json!({
        "id": id,
        "chaveId": chave_id,
        "usuarioSolicitanteId": "u1",
        "usuarioDevolucaoId": if devolvido { json!("u1") } else { Value::Null },
        "operadorId": "op-admin",
        "dataRetirada": "2025-03-10T09:30:00.000Z",
        "dataRetorno": if devolvido { json!("2025-03-10T17:00:00.000Z") } else { Value::Null },
        "status": status,
        "tipo": "NORMAL",
        "justificativa": null,
        "createdAt": "2025-03-10T09:30:00.000Z",
        "updatedAt": "2025-03-10T09:30:00.000Z"
    })
}

fn user(email: &str) -> Value {
    let admin = email == ADMIN_EMAIL;
    json!({
        "id": if admin { "op-admin" } else { "op-2" },
        "name": if admin { "Admin" } else { "Operador" },
        "email": email,
        "role": if admin { "ADMIN" } else { "OPERADOR" }
    })
}

fn envelope(status: StatusCode, identifier: &str, description: &str, path: &str) -> Response {
    (
        status,
        Json(json!({
            "statusCode": status.as_u16(),
            "identifier": identifier,
            "description": description,
            "timestamp": "2025-03-10T09:30:00.000Z",
            "path": path,
            "method": "POST"
        })),
    )
        .into_response()
}

fn session_email(headers: &HeaderMap) -> Option<&'static str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    let token = cookies
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix(&format!("{COOKIE_NAME}=")))?;
    match token {
        "admin" => Some(ADMIN_EMAIL),
        "operador" => Some(OPERADOR_EMAIL),
        "novo" => Some("novo@uni.br"),
        _ => None,
    }
}

fn set_session(token: &str) -> [(header::HeaderName, String); 1] {
    [(
        header::SET_COOKIE,
        format!("{COOKIE_NAME}={token}; Path=/; HttpOnly"),
    )]
}

async fn listar_chaves(
    State(backend): State<Arc<Backend>>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    backend.chaves_listed.fetch_add(1, Ordering::SeqCst);
    let emprestada = backend.emprestada.load(Ordering::SeqCst);
    let indisponivel = query.get("status").map(String::as_str) == Some("indisponivel");

    let mut chaves = vec![];
    if emprestada == indisponivel {
        chaves.push(armario("k1", "A12"));
    }
    if !indisponivel {
        chaves.push(armario("k2", "B07"));
    }
    if let Some(codigo) = query.get("codigo") {
        chaves.retain(|c| c["Armario"]["codigo"].as_str() == Some(codigo.as_str()));
    }
    Json(Value::Array(chaves))
}

async fn buscar_chave(State(backend): State<Arc<Backend>>, Path(id): Path<String>) -> Json<Value> {
    backend.chave_fetched.fetch_add(1, Ordering::SeqCst);
    let mut chave = armario(&id, "A12");
    let mut loan = emprestimo("e1", &id, "PENDENTE");
    loan["UsuarioSolicitante"] = json!({ "nome": "Ana Souza" });
    chave["Emprestimo"] = json!([loan]);
    Json(chave)
}

async fn listar_emprestimos(
    State(backend): State<Arc<Backend>>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    backend.emprestimos_listed.fetch_add(1, Ordering::SeqCst);
    *backend.last_emprestimos_query.lock().unwrap() = query;
    Json(json!([emprestimo("e1", "k1", "PENDENTE")]))
}

async fn buscar_emprestimo(Path(id): Path<String>) -> Response {
    if id != "e1" {
        return envelope(
            StatusCode::NOT_FOUND,
            "EMPRESTIMO_NAO_ENCONTRADO",
            "Empréstimo não encontrado",
            "/emprestimos",
        );
    }
    let mut detalhe = emprestimo("e1", "k1", "PENDENTE");
    detalhe["UsuarioSolicitante"] =
        json!({ "id": "u1", "nome": "Ana Souza", "matricula": "20210001" });
    detalhe["OperadorSolicitacao"] = user(ADMIN_EMAIL);
    detalhe["UsuarioDevolucao"] = Value::Null;
    detalhe["OperadorDevolucao"] = Value::Null;
    detalhe["Chave"] = armario("k1", "A12");
    Json(detalhe).into_response()
}

async fn retirada(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> Response {
    if session_email(&headers).is_none() {
        return envelope(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Sessão inválida", "/emprestimos/retirada");
    }
    if backend.emprestada.swap(true, Ordering::SeqCst) {
        return envelope(
            StatusCode::CONFLICT,
            "CHAVE_INDISPONIVEL",
            "A chave já está emprestada",
            &format!("/emprestimos/retirada/{id}"),
        );
    }
    if backend.bare_writes.load(Ordering::SeqCst) {
        return StatusCode::CREATED.into_response();
    }
    Json(emprestimo("e1", &id, "PENDENTE")).into_response()
}

async fn devolucao(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    *backend.devolucao_content_type.lock().unwrap() = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    if parsed["matricula"].as_str().is_none() {
        return envelope(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Matrícula obrigatória", "/emprestimos/devolucao");
    }
    if !backend.emprestada.swap(false, Ordering::SeqCst) {
        return envelope(
            StatusCode::CONFLICT,
            "EMPRESTIMO_NAO_ENCONTRADO",
            "Não há empréstimo pendente para esta chave",
            &format!("/emprestimos/devolucao/{id}"),
        );
    }
    Json(emprestimo("e1", &id, "DEVOLVIDO")).into_response()
}

async fn administrativo(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    *backend.administrativo_body.lock().unwrap() = Some(body.clone());
    if session_email(&headers) != Some(ADMIN_EMAIL) {
        return envelope(StatusCode::FORBIDDEN, "FORBIDDEN", "Acesso negado", "/emprestimos/emprestimo-administrativo");
    }
    let chave_id = body["chaveId"].as_str().unwrap_or_default().to_string();
    let status = body["status"].as_str().unwrap_or("PENDENTE").to_string();
    let mut loan = emprestimo("e9", &chave_id, &status);
    loan["tipo"] = json!("ADMINISTRATIVO");
    loan["justificativa"] = body["justificativa"].clone();
    Json(loan).into_response()
}

async fn listar_operadores(headers: HeaderMap) -> Response {
    if session_email(&headers) != Some(ADMIN_EMAIL) {
        return envelope(StatusCode::FORBIDDEN, "FORBIDDEN", "Acesso negado", "/operadores");
    }
    Json(json!([user(ADMIN_EMAIL), user(OPERADOR_EMAIL)])).into_response()
}

async fn remover_operador(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<String>,
) -> StatusCode {
    backend.removed.lock().unwrap().push(id);
    StatusCode::OK
}

async fn sign_in(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let token = match email {
        ADMIN_EMAIL => "admin",
        OPERADOR_EMAIL => "operador",
        _ => "",
    };
    if token.is_empty() || body["password"].as_str() != Some(PASSWORD) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": "INVALID_EMAIL_OR_PASSWORD", "message": "Invalid email or password" })),
        )
            .into_response();
    }
    (set_session(token), Json(json!({ "redirect": false, "user": user(email) }))).into_response()
}

async fn sign_up(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    backend.signups.fetch_add(1, Ordering::SeqCst);
    let novo = json!({
        "id": "op-novo",
        "name": body["name"],
        "email": body["email"],
        "role": "OPERADOR"
    });
    (set_session("novo"), Json(json!({ "token": "novo", "user": novo }))).into_response()
}

async fn sign_out() -> Response {
    (
        [(
            header::SET_COOKIE,
            format!("{COOKIE_NAME}=; Path=/; Max-Age=0"),
        )],
        Json(json!({ "success": true })),
    )
        .into_response()
}

async fn get_session(headers: HeaderMap) -> Json<Value> {
    match session_email(&headers) {
        Some(email) => Json(json!({
            "session": { "id": "s1", "expiresAt": "2099-01-01T00:00:00.000Z" },
            "user": user(email)
        })),
        None => Json(Value::Null),
    }
}

use std::sync::Arc;

use crate::clients::{ApiClient, AuthClient};
use crate::config::Config;
use crate::query::QueryCache;
use crate::services::{
    ChaveService, EmprestimoService, HttpChaveService, HttpEmprestimoService,
    HttpOperadorService, OperadorService,
};
use crate::session::{SessionManager, SessionStore};

/// Everything a screen or command needs, wired once per invocation.
///
/// Cloning is cheap: the HTTP client, cookie jar and cache are all shared.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub api: ApiClient,

    pub session: Arc<SessionManager>,

    pub cache: QueryCache,

    pub chaves: Arc<dyn ChaveService>,

    pub emprestimos: Arc<dyn EmprestimoService>,

    pub operadores: Arc<dyn OperadorService>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = SessionStore::new(config.session.resolved_path());
        Self::with_store(config, store)
    }

    /// Same as [`Self::new`] with an explicit session file.
    pub fn with_store(config: Config, store: SessionStore) -> anyhow::Result<Self> {
        // One client and one cookie jar for both the API and the session service.
        let api = ApiClient::new(&config.api)?;
        let auth = AuthClient::new(api.clone(), &config.api.auth_base_path);

        let session = Arc::new(SessionManager::new(api.clone(), auth.clone(), store));

        let chaves = Arc::new(HttpChaveService::new(api.clone())) as Arc<dyn ChaveService>;
        let emprestimos =
            Arc::new(HttpEmprestimoService::new(api.clone())) as Arc<dyn EmprestimoService>;
        let operadores = Arc::new(HttpOperadorService::new(api.clone(), auth))
            as Arc<dyn OperadorService>;

        Ok(Self {
            config: Arc::new(config),
            api,
            session,
            cache: QueryCache::new(),
            chaves,
            emprestimos,
            operadores,
        })
    }

    /// Swaps the loan and key services, keeping everything else.
    #[must_use]
    pub fn with_services(
        mut self,
        chaves: Arc<dyn ChaveService>,
        emprestimos: Arc<dyn EmprestimoService>,
    ) -> Self {
        self.chaves = chaves;
        self.emprestimos = emprestimos;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("base_url", &self.api.base_url())
            .finish_non_exhaustive()
    }
}

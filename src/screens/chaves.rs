use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info};

use super::Committed;
use crate::constants::query_keys::CHAVE;
use crate::debounce::debounced;
use crate::filters::{ChavesControl, ChavesFilter, Location};
use crate::models::{Chave, ChaveComEmprestimos, StatusChave};
use crate::query::{QueryCache, QueryKey, QueryState};
use crate::services::ChaveService;
use crate::state::AppState;
use crate::view::{self, ChaveSection};

/// Key listing (`/emprestimos`).
pub struct ChavesScreen {
    chaves: Arc<dyn ChaveService>,
    cache: QueryCache,
    location: Location,
    listing: Committed<Vec<Chave>>,
}

impl ChavesScreen {
    #[must_use]
    pub fn new(state: &AppState, location: Location) -> Self {
        let key = ChavesFilter::from_location(&location).query_key();
        Self {
            chaves: state.chaves.clone(),
            cache: state.cache.clone(),
            location,
            listing: Committed::new(key),
        }
    }

    #[must_use]
    pub fn filter(&self) -> ChavesFilter {
        ChavesFilter::from_location(&self.location)
    }

    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub const fn listing(&self) -> &QueryState<Vec<Chave>> {
        self.listing.state()
    }

    /// Commits one control change. Returns `true` when the derived query
    /// changed and the listing has to be fetched again.
    pub fn apply(&mut self, control: &ChavesControl) -> bool {
        control.apply(&mut self.location);
        let changed = self.listing.commit(self.filter().query_key());
        debug!(location = %self.location, changed, "Key filter committed");
        changed
    }

    /// Fetches the listing for the committed filter and applies it.
    pub async fn load(&mut self) -> &QueryState<Vec<Chave>> {
        let (key, state) =
            fetch_listing(self.chaves.clone(), self.cache.clone(), self.filter()).await;
        self.listing.receive(&key, state);
        self.listing.state()
    }

    /// Applies a response produced elsewhere. Stale responses are dropped.
    pub fn receive(&mut self, key: &QueryKey, state: QueryState<Vec<Chave>>) -> bool {
        self.listing.receive(key, state)
    }

    /// Drives the code filter from raw keystrokes.
    ///
    /// Each item of `input` is the full text of the code field. Bursts settle
    /// through the debouncer before committing; every commit starts a fetch
    /// without waiting for the previous one, and `on_update` runs whenever a
    /// response for the current filter lands.
    pub async fn search<F>(
        &mut self,
        input: mpsc::Receiver<String>,
        delay: Duration,
        mut on_update: F,
    ) where
        F: FnMut(&Self),
    {
        let mut settled = debounced(input, delay);
        let mut in_flight = JoinSet::new();

        if self.listing.state().is_loading() {
            in_flight.spawn(fetch_listing(
                self.chaves.clone(),
                self.cache.clone(),
                self.filter(),
            ));
        }

        let mut input_open = true;
        while input_open || !in_flight.is_empty() {
            tokio::select! {
                text = settled.recv(), if input_open => match text {
                    Some(text) => {
                        if self.apply(&ChavesControl::Codigo(text)) {
                            in_flight.spawn(fetch_listing(
                                self.chaves.clone(),
                                self.cache.clone(),
                                self.filter(),
                            ));
                        }
                    }
                    None => input_open = false,
                },
                Some(done) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Ok((key, state)) = done
                        && self.receive(&key, state)
                    {
                        on_update(self);
                    }
                }
            }
        }
    }
}

async fn fetch_listing(
    chaves: Arc<dyn ChaveService>,
    cache: QueryCache,
    filter: ChavesFilter,
) -> (QueryKey, QueryState<Vec<Chave>>) {
    let key = filter.query_key();
    let result = cache
        .fetch(key.clone(), || async move { chaves.listar(&filter).await })
        .await;
    (key, QueryState::from_list(result))
}

/// Options panel of one listed key.
///
/// Keys listed as unavailable look up their loans to show who holds them;
/// available keys never issue that request.
#[derive(Debug, Clone)]
pub struct KeyPanel {
    chave: Chave,
    status: StatusChave,
    detalhe: Option<ChaveComEmprestimos>,
}

impl KeyPanel {
    pub async fn load(state: &AppState, chave: Chave, status: StatusChave) -> Self {
        let detalhe = if view::holder_lookup_needed(status) {
            let id = chave.id.clone();
            let service = state.chaves.clone();
            state
                .cache
                .fetch(QueryKey::detail(CHAVE, id.as_str()), || async move {
                    service.buscar(&id).await
                })
                .await
        } else {
            None
        };

        Self {
            chave,
            status,
            detalhe,
        }
    }

    #[must_use]
    pub const fn chave(&self) -> &Chave {
        &self.chave
    }

    #[must_use]
    pub const fn status(&self) -> StatusChave {
        self.status
    }

    #[must_use]
    pub fn sections(&self) -> Vec<ChaveSection<'_>> {
        view::chave_sections(&self.chave, self.status, self.detalhe.as_ref())
    }

    #[must_use]
    pub fn render(&self) -> String {
        view::render::render_chave_panel(&self.chave, &self.sections())
    }
}

/// Finds a key by id in the listing of `filter`.
///
/// Availability is a property of the listing a key appears in, so the panel
/// opened from the result uses `filter.status`.
pub async fn find(state: &AppState, filter: &ChavesFilter, id: &str) -> Option<Chave> {
    let service = state.chaves.clone();
    let owned = filter.clone();
    let chaves = state
        .cache
        .fetch(filter.query_key(), || async move { service.listar(&owned).await })
        .await?;
    let found = chaves.into_iter().find(|c| c.id.as_str() == id);
    if found.is_none() {
        info!(chave_id = id, status = %filter.status, "Key not in listing");
    }
    found
}

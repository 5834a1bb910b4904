use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::Committed;
use crate::constants::query_keys::EMPRESTIMO;
use crate::debounce::debounced;
use crate::domain::EmprestimoId;
use crate::filters::{DateRange, EmprestimosControl, EmprestimosFilter, FilterError, Location};
use crate::models::{Emprestimo, EmprestimoDetalhado};
use crate::query::{QueryCache, QueryKey, QueryState};
use crate::services::EmprestimoService;
use crate::state::AppState;

/// Default withdrawal window: today through `days` from now.
#[must_use]
pub fn default_range(days: u64) -> DateRange {
    DateRange::window(Local::now().date_naive(), days)
}

/// Loan history (`/listar-emprestimos`).
pub struct EmprestimosScreen {
    emprestimos: Arc<dyn EmprestimoService>,
    cache: QueryCache,
    defaults: DateRange,
    location: Location,
    listing: Committed<Vec<Emprestimo>>,
}

impl EmprestimosScreen {
    #[must_use]
    pub fn new(state: &AppState, location: Location, defaults: DateRange) -> Self {
        let key = EmprestimosFilter::from_location(&location, defaults).query_key();
        Self {
            emprestimos: state.emprestimos.clone(),
            cache: state.cache.clone(),
            defaults,
            location,
            listing: Committed::new(key),
        }
    }

    #[must_use]
    pub fn filter(&self) -> EmprestimosFilter {
        EmprestimosFilter::from_location(&self.location, self.defaults)
    }

    /// The location with both dates written out, as the listing shares it.
    #[must_use]
    pub fn location(&self) -> Location {
        self.filter().to_location()
    }

    #[must_use]
    pub const fn listing(&self) -> &QueryState<Vec<Emprestimo>> {
        self.listing.state()
    }

    /// Commits one control change. A half-picked period is rejected and
    /// leaves the location as it was.
    pub fn apply(&mut self, control: &EmprestimosControl) -> Result<bool, FilterError> {
        control.apply(&mut self.location)?;
        let changed = self.listing.commit(self.filter().query_key());
        debug!(location = %self.location, changed, "Loan filter committed");
        Ok(changed)
    }

    pub async fn load(&mut self) -> &QueryState<Vec<Emprestimo>> {
        let (key, state) =
            fetch_listing(self.emprestimos.clone(), self.cache.clone(), self.filter()).await;
        self.listing.receive(&key, state);
        self.listing.state()
    }

    /// Applies a response produced elsewhere. Stale responses are dropped.
    pub fn receive(&mut self, key: &QueryKey, state: QueryState<Vec<Emprestimo>>) -> bool {
        self.listing.receive(key, state)
    }

    /// Drives the listing from raw control input.
    ///
    /// The code, requester name and requester id fields each settle through
    /// their own debouncer, so typing in one never delays another. Other
    /// controls commit as soon as they arrive. Every commit starts a fetch
    /// and `on_update` runs when a response for the current filter lands.
    pub async fn search<F>(
        &mut self,
        mut input: mpsc::Receiver<EmprestimosControl>,
        delay: Duration,
        mut on_update: F,
    ) where
        F: FnMut(&Self),
    {
        let (settled_tx, mut settled) = mpsc::channel(16);
        let mut fields: Vec<mpsc::Sender<String>> = Vec::with_capacity(TEXT_FIELDS.len());
        for make in TEXT_FIELDS {
            let (tx, rx) = mpsc::channel(16);
            let mut out = debounced(rx, delay);
            let settled_tx = settled_tx.clone();
            tokio::spawn(async move {
                while let Some(text) = out.recv().await {
                    if settled_tx.send(make(text)).await.is_err() {
                        break;
                    }
                }
            });
            fields.push(tx);
        }
        drop(settled_tx);

        let mut in_flight = JoinSet::new();
        if self.listing.state().is_loading() {
            in_flight.spawn(fetch_listing(
                self.emprestimos.clone(),
                self.cache.clone(),
                self.filter(),
            ));
        }

        let mut input_open = true;
        let mut settled_open = true;
        while input_open || settled_open || !in_flight.is_empty() {
            let commit = tokio::select! {
                control = input.recv(), if input_open => match control {
                    Some(control) => match text_field(&control) {
                        Some((slot, text)) => {
                            if fields[slot].send(text).await.is_err() {
                                warn!("Debounce stage closed early");
                            }
                            None
                        }
                        None => Some(control),
                    },
                    None => {
                        input_open = false;
                        // closing the stages flushes whatever is still pending
                        fields.clear();
                        None
                    }
                },
                control = settled.recv(), if settled_open => {
                    if control.is_none() {
                        settled_open = false;
                    }
                    control
                }
                Some(done) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Ok((key, state)) = done
                        && self.receive(&key, state)
                    {
                        on_update(self);
                    }
                    None
                }
            };

            let Some(control) = commit else { continue };
            match self.apply(&control) {
                Ok(true) => {
                    in_flight.spawn(fetch_listing(
                        self.emprestimos.clone(),
                        self.cache.clone(),
                        self.filter(),
                    ));
                }
                Ok(false) => {}
                Err(e) => warn!(error = %e, "Loan filter change rejected"),
            }
        }
    }
}

/// Debounced text controls, in stage order.
const TEXT_FIELDS: [fn(String) -> EmprestimosControl; 3] = [
    EmprestimosControl::Codigo,
    EmprestimosControl::NomeSolicitante,
    EmprestimosControl::MatriculaSolicitante,
];

fn text_field(control: &EmprestimosControl) -> Option<(usize, String)> {
    match control {
        EmprestimosControl::Codigo(text) => Some((0, text.clone())),
        EmprestimosControl::NomeSolicitante(text) => Some((1, text.clone())),
        EmprestimosControl::MatriculaSolicitante(text) => Some((2, text.clone())),
        _ => None,
    }
}

async fn fetch_listing(
    emprestimos: Arc<dyn EmprestimoService>,
    cache: QueryCache,
    filter: EmprestimosFilter,
) -> (QueryKey, QueryState<Vec<Emprestimo>>) {
    let key = filter.query_key();
    let result = cache
        .fetch(key.clone(), || async move { emprestimos.listar(&filter).await })
        .await;
    (key, QueryState::from_list(result))
}

/// Loan detail (`/listar-emprestimos/{id}`).
pub async fn detalhe(state: &AppState, id: &EmprestimoId) -> QueryState<EmprestimoDetalhado> {
    let service = state.emprestimos.clone();
    let owned = id.clone();
    let result = state
        .cache
        .fetch(QueryKey::detail(EMPRESTIMO, id.as_str()), || async move {
            service.buscar(&owned).await
        })
        .await;
    QueryState::from_item(result)
}

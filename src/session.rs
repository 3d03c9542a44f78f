//! Raffle page session: loading, the grid, and purchases against one raffle.

use std::mem;

use tracing::{debug, info, warn};

use crate::api::RaffleApi;
use crate::error::{Result, RifaError};
use crate::grid::{GridAction, GridState, ZoomLevel, reduce_grid_state};
use crate::purchase::{PurchaseRequest, submit_selection};
use crate::types::Ticket;

/// Lifecycle of a raffle page
#[derive(Debug, Clone)]
pub enum SessionState {
    Loading,
    Ready(GridState),
    /// The raffle could not be fetched; `retry` fetches it again
    Failed { message: String },
}

/// Who is buying and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseSettings {
    pub user_id: String,
    pub proof_url: String,
    pub revalidate: bool,
}

/// One raffle's grid backed by an injected API handle
pub struct RaffleSession<A> {
    api: A,
    raffle_id: String,
    zoom: Option<ZoomLevel>,
    state: SessionState,
}

impl<A: RaffleApi> RaffleSession<A> {
    /// New session in the `Loading` state; call [`load`](Self::load) next.
    ///
    /// `zoom` overrides the raffle type's default density.
    pub fn new(api: A, raffle_id: impl Into<String>, zoom: Option<ZoomLevel>) -> Self {
        Self {
            api,
            raffle_id: raffle_id.into(),
            zoom,
            state: SessionState::Loading,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn raffle_id(&self) -> &str {
        &self.raffle_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn grid(&self) -> Option<&GridState> {
        match &self.state {
            SessionState::Ready(grid) => Some(grid),
            _ => None,
        }
    }

    /// Fetch the raffle.
    ///
    /// A session that is already showing this raffle keeps its viewport and
    /// prunes its selection against the fresh data.
    pub async fn load(&mut self) -> &SessionState {
        debug!(raffle_id = %self.raffle_id, "loading raffle");
        match self.api.get_raffle(&self.raffle_id).await {
            Ok(raffle) => {
                self.state = match mem::replace(&mut self.state, SessionState::Loading) {
                    SessionState::Ready(grid) => SessionState::Ready(reduce_grid_state(
                        grid,
                        GridAction::RaffleRefreshed(raffle),
                    )),
                    _ => SessionState::Ready(GridState::new(raffle, self.zoom)),
                };
            }
            Err(e) => {
                warn!(raffle_id = %self.raffle_id, "failed to load raffle: {e}");
                self.state = SessionState::Failed {
                    message: e.to_string(),
                };
            }
        }
        &self.state
    }

    /// Fetch again after a failure. No automatic backoff.
    pub async fn retry(&mut self) -> &SessionState {
        if matches!(self.state, SessionState::Failed { .. }) {
            self.state = SessionState::Loading;
        }
        self.load().await
    }

    /// Apply a grid action; ignored unless the raffle is loaded.
    pub fn dispatch(&mut self, action: GridAction) {
        self.state = match mem::replace(&mut self.state, SessionState::Loading) {
            SessionState::Ready(grid) => SessionState::Ready(reduce_grid_state(grid, action)),
            other => other,
        };
    }

    /// Buy the current selection.
    ///
    /// On success the selection is cleared, the modal closes and the raffle
    /// is fetched again. On failure the selection and modal stay as they
    /// were and the error is returned.
    pub async fn purchase(&mut self, settings: &PurchaseSettings) -> Result<Vec<Ticket>> {
        let grid = self.grid().ok_or_else(|| {
            RifaError::Other(format!("raffle '{}' is not loaded", self.raffle_id))
        })?;
        if grid.selection.is_empty() {
            return Err(RifaError::EmptySelection);
        }
        if !grid.raffle.status.accepts_purchases() {
            return Err(RifaError::RaffleNotActive(self.raffle_id.clone()));
        }

        if !grid.modal_open {
            self.dispatch(GridAction::OpenPurchaseModal);
        }
        self.dispatch(GridAction::PurchaseStarted);

        let selection = match self.grid() {
            Some(grid) => grid.selection.clone(),
            None => return Err(RifaError::EmptySelection),
        };
        let request = PurchaseRequest {
            raffle_id: &self.raffle_id,
            user_id: &settings.user_id,
            proof_url: &settings.proof_url,
            revalidate: settings.revalidate,
        };

        match submit_selection(&self.api, &request, &selection).await {
            Ok(tickets) => {
                info!(
                    raffle_id = %self.raffle_id,
                    count = tickets.len(),
                    "selection purchased"
                );
                self.dispatch(GridAction::PurchaseSucceeded);
                self.load().await;
                Ok(tickets)
            }
            Err(e) => {
                self.dispatch(GridAction::PurchaseFailed(e.to_string()));
                Err(e)
            }
        }
    }
}

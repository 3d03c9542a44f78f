//! Ticket grid model types for testable state management
//!
//! This module separates state (GridState) from view (GridViewModel)
//! so the whole grid can be driven and inspected without a rendering host.

use serde::Serialize;

use super::format::TicketFormatter;
use super::search::{SearchOutcome, resolve_search};
use super::selection::SelectionSet;
use super::viewport::{Direction, DragTracker, PointerKind, Viewport, visible_tickets};
use super::zoom::{CellSize, ZoomLevel};
use crate::types::{Raffle, RaffleType};

/// Arrow keys understood by the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKey {
    Left,
    Right,
}

/// Raw state that changes during user interaction
#[derive(Debug, Clone)]
pub struct GridState {
    /// Raffle as last fetched from the API
    pub raffle: Raffle,
    /// Zoom level and column-aligned offset
    pub viewport: Viewport,
    /// Tickets picked but not yet bought
    pub selection: SelectionSet,
    /// Text currently in the search box
    pub search_query: String,
    /// Outcome of the last search, if any
    pub last_search: Option<SearchOutcome>,
    /// Pointer drag in progress
    pub drag: DragTracker,
    /// Whether the purchase confirmation modal is open
    pub modal_open: bool,
    /// Whether a purchase batch is being submitted
    pub purchase_in_flight: bool,
    /// Message from the last failed purchase
    pub purchase_error: Option<String>,
}

impl GridState {
    /// Fresh state for a newly loaded raffle.
    ///
    /// Without an explicit zoom the raffle type picks the grid density.
    pub fn new(raffle: Raffle, zoom: Option<ZoomLevel>) -> Self {
        let zoom = zoom.unwrap_or_else(|| ZoomLevel::for_raffle_type(raffle.raffle_type));
        let viewport = Viewport::new(raffle.ticket_count(), zoom);
        Self {
            raffle,
            viewport,
            selection: SelectionSet::new(),
            search_query: String::new(),
            last_search: None,
            drag: DragTracker::default(),
            modal_open: false,
            purchase_in_flight: false,
            purchase_error: None,
        }
    }

    /// Whether `raffle` is the same ticket list this state was built for
    pub fn is_same_ticket_list(&self, raffle: &Raffle) -> bool {
        self.raffle.id == raffle.id && self.raffle.ticket_count() == raffle.ticket_count()
    }
}

/// All possible actions on the grid
#[derive(Debug, Clone, PartialEq)]
pub enum GridAction {
    // Selection
    /// Toggle a ticket cell
    CellClicked(usize),
    /// Drop every selected ticket
    ClearSelection,

    // Navigation
    /// Pointer pressed on the grid
    DragStart { x: f64, pointer: PointerKind },
    /// Pointer moved while pressed
    DragMove { x: f64 },
    /// Pointer released or left the grid
    DragEnd,
    /// Arrow key pressed
    Arrow(ArrowKey),
    /// Next column
    PageForward,
    /// Previous column
    PageBackward,

    // Search
    /// Search box text changed
    Search(String),
    /// Empty the search box without moving the grid
    ClearSearch,

    // Zoom
    ZoomIn,
    ZoomOut,

    // Purchase
    /// Open the confirmation modal for the current selection
    OpenPurchaseModal,
    /// Dismiss the confirmation modal
    ClosePurchaseModal,
    /// Submission of the selection began
    PurchaseStarted,
    /// Every selected ticket was bought
    PurchaseSucceeded,
    /// Submission stopped on a failure
    PurchaseFailed(String),

    /// Authoritative raffle data arrived from the API
    RaffleRefreshed(Raffle),
}

impl GridAction {
    /// Map a zoom delta from the host (+1 denser, -1 sparser).
    pub fn from_zoom_delta(delta: i32) -> Option<Self> {
        match delta.signum() {
            1 => Some(GridAction::ZoomIn),
            -1 => Some(GridAction::ZoomOut),
            _ => None,
        }
    }
}

/// Visual treatment of a cell, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellTone {
    Selected,
    Sold,
    Palindrome,
    Disabled,
    Available,
}

/// One visible ticket as the host should draw it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketCell {
    pub number: usize,
    pub label: String,
    pub is_sold: bool,
    pub is_palindrome: bool,
    pub is_selected: bool,
    pub is_disabled: bool,
    pub tone: CellTone,
}

/// Counts shown under the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSummary {
    /// 1-based number of the first visible ticket (0 when nothing is shown)
    pub first_shown: usize,
    /// 1-based number of the last visible ticket
    pub last_shown: usize,
    pub ticket_count: usize,
    pub available: usize,
    pub sold: usize,
    pub selected: usize,
    pub selected_total: f64,
}

/// Contents of the purchase confirmation modal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseModalViewModel {
    /// Formatted labels of the selected tickets, in selection order
    pub labels: Vec<String>,
    pub unit_price: f64,
    pub total: f64,
    pub raffle_type: RaffleType,
    pub in_flight: bool,
    pub error: Option<String>,
}

/// Computed view model for rendering the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridViewModel {
    pub raffle_id: String,
    pub zoom: u8,
    pub rows: usize,
    pub cols: usize,
    pub cell_size: CellSize,
    pub offset: usize,
    /// Visible cells in row-major order
    pub cells: Vec<TicketCell>,
    pub summary: GridSummary,
    pub can_page_backward: bool,
    pub can_page_forward: bool,
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
    pub is_dragging: bool,
    pub search_query: String,
    pub modal: Option<PurchaseModalViewModel>,
    /// Why tickets cannot be bought, for non-active raffles
    pub status_notice: Option<&'static str>,
}

impl GridViewModel {
    /// Cells grouped into display rows
    pub fn rows(&self) -> impl Iterator<Item = &[TicketCell]> {
        self.cells.chunks(self.cols.max(1))
    }
}

// ============================================================================
// Pure Functions
// ============================================================================

/// Pure function: apply action to state (reducer pattern)
///
/// Network effects (submitting purchases, refetching the raffle) happen
/// outside; their results come back in as `Purchase*` and
/// `RaffleRefreshed` actions.
pub fn reduce_grid_state(mut state: GridState, action: GridAction) -> GridState {
    match action {
        GridAction::CellClicked(number) => {
            state.selection.toggle(&state.raffle, number);
        }
        GridAction::ClearSelection => {
            state.selection.clear();
        }

        GridAction::DragStart { x, pointer } => {
            state.drag.start(x, pointer);
        }
        GridAction::DragMove { x } => {
            if let Some(direction) = state.drag.track(x) {
                state.viewport.step(direction);
            }
        }
        GridAction::DragEnd => {
            state.drag.end();
        }
        GridAction::Arrow(ArrowKey::Left) | GridAction::PageBackward => {
            state.viewport.step(Direction::Backward);
        }
        GridAction::Arrow(ArrowKey::Right) | GridAction::PageForward => {
            state.viewport.step(Direction::Forward);
        }

        GridAction::Search(query) => {
            state.last_search = Some(resolve_search(&query, &mut state.viewport));
            state.search_query = query;
        }
        GridAction::ClearSearch => {
            state.search_query.clear();
            state.last_search = None;
        }

        GridAction::ZoomIn => {
            state.viewport.zoom_in();
        }
        GridAction::ZoomOut => {
            state.viewport.zoom_out();
        }

        GridAction::OpenPurchaseModal => {
            if !state.selection.is_empty() && state.raffle.status.accepts_purchases() {
                state.modal_open = true;
                state.purchase_error = None;
            }
        }
        GridAction::ClosePurchaseModal => {
            if !state.purchase_in_flight {
                state.modal_open = false;
            }
        }
        GridAction::PurchaseStarted => {
            if state.modal_open && !state.selection.is_empty() {
                state.purchase_in_flight = true;
                state.purchase_error = None;
            }
        }
        GridAction::PurchaseSucceeded => {
            state.selection.clear();
            state.modal_open = false;
            state.purchase_in_flight = false;
            state.purchase_error = None;
        }
        GridAction::PurchaseFailed(message) => {
            // Selection is kept so the user can retry or adjust it
            state.purchase_in_flight = false;
            state.purchase_error = Some(message);
        }

        GridAction::RaffleRefreshed(raffle) => {
            state = apply_refreshed_raffle(state, raffle);
        }
    }
    state
}

fn apply_refreshed_raffle(mut state: GridState, raffle: Raffle) -> GridState {
    if !state.is_same_ticket_list(&raffle) {
        return GridState::new(raffle, Some(state.viewport.zoom()));
    }
    if raffle.status.accepts_purchases() {
        state.selection.retain_available(&raffle);
    } else {
        state.selection.clear();
        state.modal_open = false;
    }
    state.raffle = raffle;
    state
}

/// Pure function: compute view model from state
pub fn compute_grid_view_model(state: &GridState) -> GridViewModel {
    let raffle = &state.raffle;
    let viewport = &state.viewport;
    let formatter = TicketFormatter::new(raffle.ticket_count());
    let is_disabled = !raffle.status.accepts_purchases();

    let cells: Vec<TicketCell> = visible_tickets(&raffle.tickets, viewport)
        .into_iter()
        .map(|(number, is_sold)| {
            let label = formatter.format(number);
            let is_palindrome = super::format::is_palindrome(&label);
            let is_selected = state.selection.contains(number);
            TicketCell {
                number,
                label,
                is_sold,
                is_palindrome,
                is_selected,
                is_disabled,
                tone: cell_tone(is_selected, is_sold, is_palindrome, is_disabled),
            }
        })
        .collect();

    let range = viewport.visible_range();
    let sold = raffle.sold_count();
    let summary = GridSummary {
        first_shown: if range.is_empty() { 0 } else { range.start + 1 },
        last_shown: range.end,
        ticket_count: raffle.ticket_count(),
        available: raffle.ticket_count() - sold,
        sold,
        selected: state.selection.len(),
        selected_total: state.selection.total(raffle.ticket_price),
    };

    let modal = state.modal_open.then(|| PurchaseModalViewModel {
        labels: state
            .selection
            .numbers()
            .iter()
            .map(|n| formatter.format(*n))
            .collect(),
        unit_price: raffle.ticket_price,
        total: state.selection.total(raffle.ticket_price),
        raffle_type: raffle.raffle_type,
        in_flight: state.purchase_in_flight,
        error: state.purchase_error.clone(),
    });

    let layout = viewport.layout();
    GridViewModel {
        raffle_id: raffle.id.clone(),
        zoom: viewport.zoom().get(),
        rows: layout.rows,
        cols: layout.cols,
        cell_size: layout.cell_size,
        offset: viewport.offset(),
        cells,
        summary,
        can_page_backward: viewport.can_page_backward(),
        can_page_forward: viewport.can_page_forward(),
        can_zoom_in: viewport.zoom() < ZoomLevel::MAX,
        can_zoom_out: viewport.zoom() > ZoomLevel::MIN,
        is_dragging: state.drag.is_dragging(),
        search_query: state.search_query.clone(),
        modal,
        status_notice: raffle.status.notice(),
    }
}

/// Selected beats sold beats palindrome beats disabled.
pub fn cell_tone(is_selected: bool, is_sold: bool, is_palindrome: bool, is_disabled: bool) -> CellTone {
    if is_selected {
        CellTone::Selected
    } else if is_sold {
        CellTone::Sold
    } else if is_palindrome {
        CellTone::Palindrome
    } else if is_disabled {
        CellTone::Disabled
    } else {
        CellTone::Available
    }
}

//! Ticket grid: zoom table, viewport, selection, search and the reducer
//! that ties them together.

pub mod format;
pub mod model;
pub mod search;
pub mod selection;
pub mod viewport;
pub mod zoom;

pub use format::{TicketFormatter, format_ticket_number, is_palindrome, label_width};
pub use model::{
    ArrowKey, CellTone, GridAction, GridState, GridSummary, GridViewModel, PurchaseModalViewModel,
    TicketCell, compute_grid_view_model, reduce_grid_state,
};
pub use search::{SearchOutcome, resolve_search};
pub use selection::{RejectReason, SelectionSet, ToggleOutcome};
pub use viewport::{
    Direction, DragTracker, PointerKind, Viewport, row_start, visible_tickets, zoom_reaching,
};
pub use zoom::{CellSize, ZOOM_CONFIGS, ZoomConfig, ZoomLevel, zoom_config};

pub mod api;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod grid;
pub mod purchase;
pub mod session;
pub mod types;

pub use api::{HttpRaffleApi, RaffleApi};
pub use config::Config;
pub use error::{Result, RifaError};
pub use grid::{GridAction, GridState, GridViewModel, compute_grid_view_model, reduce_grid_state};
pub use purchase::{PurchaseRequest, submit_selection};
pub use session::{PurchaseSettings, RaffleSession, SessionState};
pub use types::{
    BuyTicketData, CreateRaffleData, CreateUserData, DrawMode, Raffle, RaffleStatus, RaffleType,
    Ticket, User, VALID_STATUSES, VALID_TYPES,
};

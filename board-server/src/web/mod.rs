//! Web layer for the departure board.
//!
//! Serves the rendered board, a JSON view of the same state, and the
//! endpoints behind the board's refresh controls.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;

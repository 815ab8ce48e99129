//! Application state for the web layer.

use std::sync::Arc;

use crate::arrivals::BoardSource;
use crate::refresh::{RefreshController, RefreshScheduler};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Refresh scheduler, which also owns the board's controller
    pub scheduler: Arc<RefreshScheduler<BoardSource>>,

    /// Rows shown per direction when the request does not ask for a count
    pub default_rows: usize,
}

impl AppState {
    pub fn new(scheduler: Arc<RefreshScheduler<BoardSource>>, default_rows: usize) -> Self {
        Self {
            scheduler,
            default_rows,
        }
    }

    pub fn controller(&self) -> &Arc<RefreshController<BoardSource>> {
        self.scheduler.controller()
    }
}

//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::board::{DirectionalTrains, DisplayTrain};
use crate::refresh::{FetchPhase, RefreshSnapshot, SchedulerSnapshot};

/// Query string accepted by the board endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    /// Rows per direction; must be one of the display count options
    pub rows: Option<usize>,
}

/// The whole board as JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    /// Station the board is for
    pub station: String,

    /// Controller state, including the raw upstream board
    #[serde(flatten)]
    pub refresh: RefreshSnapshot,

    /// Cooldown and auto-refresh state
    #[serde(flatten)]
    pub scheduler: SchedulerSnapshot,

    /// Rows per direction
    pub rows: usize,

    /// Trains leaving towards the suburbs, sorted by departure
    pub outbound: Vec<DisplayTrain>,

    /// Trains heading for the city terminal, sorted by departure
    pub inbound: Vec<DisplayTrain>,
}

impl BoardResponse {
    pub fn new(
        station: impl Into<String>,
        refresh: RefreshSnapshot,
        scheduler: SchedulerSnapshot,
        boards: DirectionalTrains,
        rows: usize,
    ) -> Self {
        let DirectionalTrains {
            mut inbound,
            mut outbound,
        } = boards;
        inbound.truncate(rows);
        outbound.truncate(rows);

        Self {
            station: station.into(),
            refresh,
            scheduler,
            rows,
            outbound,
            inbound,
        }
    }
}

/// Result of pressing the refresh button.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// False when the press was ignored because the cooldown was running
    pub accepted: bool,

    /// Phase of the controller once the refresh settled
    pub phase: FetchPhase,

    #[serde(flatten)]
    pub scheduler: SchedulerSnapshot,
}

/// Result of retrying after an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryResponse {
    pub phase: FetchPhase,
    pub error: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

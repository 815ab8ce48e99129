//! Askama templates for the web frontend.

use askama::Template;

use crate::board::{DirectionalTrains, DisplayTrain, PASS_MARKER};
use crate::config::DISPLAY_COUNT_OPTIONS;
use crate::refresh::{RefreshSnapshot, SchedulerSnapshot};

/// Shown in place of a direction that has no trains.
pub const EMPTY_BOARD_MESSAGE: &str = "列車はありません";

/// Shown when there is nothing to display and no error to explain why.
pub const NO_DATA_MESSAGE: &str = "データがありません";

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// The departure board page.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub station_name: String,
    pub page: PageState,
    /// Error from a failed refresh while older data stays on screen
    pub stale_error: Option<String>,
    pub outbound: DirectionView,
    pub inbound: DirectionView,
    pub rows: usize,
    pub row_options: Vec<RowOption>,
    /// `updatedAt` as reported upstream
    pub updated_at: Option<String>,
    /// When this server last received the board
    pub fetched_at: Option<String>,
    pub is_refreshing: bool,
    pub can_refresh: bool,
    pub auto_refresh: bool,
    pub cooldown_progress: u8,
    pub remaining_secs: u64,
}

/// What the body of the board page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    /// First load still in flight
    Loading,
    /// Nothing to show because the last fetch failed
    Error(String),
    /// Nothing fetched and nothing in flight
    NoData,
    /// A board is available
    Ready,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// One option in the rows selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOption {
    pub value: usize,
    pub selected: bool,
}

/// One direction's half of the board.
#[derive(Debug, Clone)]
pub struct DirectionView {
    /// Heading, e.g. "下り"
    pub label: &'static str,
    pub trains: Vec<TrainRowView>,
}

/// Train row view model for templates.
#[derive(Debug, Clone)]
pub struct TrainRowView {
    pub time: String,
    pub train_type: String,
    pub icon_name: String,
    pub destination: String,
    /// "通過" for trains that do not stop, "+N分" for late ones
    pub status: Option<String>,
    pub is_pass: bool,
    pub is_delayed: bool,
    pub note: Option<String>,
}

impl TrainRowView {
    pub fn from_display(train: &DisplayTrain) -> Self {
        let status = if train.is_pass {
            Some(PASS_MARKER.to_string())
        } else if train.is_delayed() {
            Some(format!("+{}分", train.delay))
        } else {
            None
        };

        Self {
            time: train.time.clone(),
            train_type: train.train_type.clone(),
            icon_name: train.icon_name.clone(),
            destination: train.destination.clone(),
            status,
            is_pass: train.is_pass,
            is_delayed: train.is_delayed(),
            note: train.note.clone().filter(|n| !n.is_empty()),
        }
    }

    /// CSS modifier for the row.
    pub fn row_class(&self) -> &'static str {
        if self.is_pass {
            "train--pass"
        } else if self.is_delayed {
            "train--delayed"
        } else {
            ""
        }
    }
}

impl DirectionView {
    fn new(label: &'static str, trains: &[DisplayTrain], rows: usize) -> Self {
        Self {
            label,
            trains: trains
                .iter()
                .take(rows)
                .map(TrainRowView::from_display)
                .collect(),
        }
    }
}

impl BoardTemplate {
    /// Build the page from the current controller and scheduler state.
    ///
    /// `station` is used as the heading until a board names the station.
    pub fn new(
        station: &str,
        refresh: &RefreshSnapshot,
        scheduler: SchedulerSnapshot,
        boards: &DirectionalTrains,
        rows: usize,
    ) -> Self {
        let page = match (&refresh.data, &refresh.error) {
            (Some(_), _) => PageState::Ready,
            (None, _) if refresh.loading => PageState::Loading,
            (None, Some(error)) => PageState::Error(error.clone()),
            (None, None) => PageState::NoData,
        };

        let stale_error = refresh
            .data
            .as_ref()
            .and(refresh.error.clone());

        let station_name = refresh
            .data
            .as_ref()
            .map(|d| d.station_name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| station.to_string());

        Self {
            station_name,
            page,
            stale_error,
            outbound: DirectionView::new("下り", &boards.outbound, rows),
            inbound: DirectionView::new("上り", &boards.inbound, rows),
            rows,
            row_options: DISPLAY_COUNT_OPTIONS
                .iter()
                .map(|&value| RowOption {
                    value,
                    selected: value == rows,
                })
                .collect(),
            updated_at: refresh.data.as_ref().map(|d| d.updated_at.clone()),
            fetched_at: refresh
                .last_updated_at
                .map(|t| t.format("%H:%M:%S").to_string()),
            is_refreshing: refresh.is_refreshing,
            can_refresh: scheduler.cooldown_progress >= 100 && !refresh.loading,
            auto_refresh: scheduler.auto_refresh,
            cooldown_progress: scheduler.cooldown_progress,
            remaining_secs: scheduler.cooldown_remaining_secs.ceil() as u64,
        }
    }

    /// Outbound first, then inbound.
    pub fn directions(&self) -> [&DirectionView; 2] {
        [&self.outbound, &self.inbound]
    }

    pub fn empty_message(&self) -> &'static str {
        EMPTY_BOARD_MESSAGE
    }

    pub fn no_data_message(&self) -> &'static str {
        NO_DATA_MESSAGE
    }

    /// Whether the page should poll for fresh state.
    pub fn should_poll(&self) -> bool {
        self.auto_refresh
            || self.is_refreshing
            || self.cooldown_progress < 100
            || self.page == PageState::Loading
    }
}

//! Fetch lifecycle for the board.
//!
//! The controller owns the latest arrivals snapshot and the state of the
//! fetch that produces it. Errors stop here: callers only ever see a
//! user-facing message, and the previous snapshot stays on the board.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::arrivals::{ArrivalsResponse, ArrivalsSource, FetchError, FetchErrorKind};

/// Shown when the upstream base URL is missing or unusable.
pub const CONFIG_ERROR_MESSAGE: &str = "APIのURLが設定されていません";

/// Shown for every transport or decode failure.
pub const FETCH_ERROR_MESSAGE: &str = "列車データの取得に失敗しました";

/// Where the controller is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPhase {
    /// Nothing has been fetched yet.
    Idle,
    /// A first (or retry) fetch is in flight.
    Loading,
    /// A refresh is in flight; the previous snapshot is still shown.
    Refreshing,
    /// The last fetch succeeded.
    Success,
    /// The last fetch failed.
    Error,
}

impl FetchPhase {
    fn is_in_flight(self) -> bool {
        matches!(self, FetchPhase::Loading | FetchPhase::Refreshing)
    }
}

/// Point-in-time view of the controller for presenters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSnapshot {
    pub phase: FetchPhase,
    pub data: Option<Arc<ArrivalsResponse>>,
    pub error: Option<String>,
    pub loading: bool,
    pub is_refreshing: bool,
    /// When the current snapshot was received.
    pub last_updated_at: Option<DateTime<Local>>,
}

#[derive(Debug)]
struct RefreshState {
    phase: FetchPhase,
    data: Option<Arc<ArrivalsResponse>>,
    error: Option<String>,
    last_updated_at: Option<DateTime<Local>>,
    /// Bumped on every fetch; only the latest fetch may apply its result.
    generation: u64,
}

/// Owns the board's data and the fetch that refreshes it.
pub struct RefreshController<S> {
    source: S,
    station: String,
    state: Mutex<RefreshState>,
}

impl<S: ArrivalsSource> RefreshController<S> {
    /// Create a controller fetching `station` from `source`.
    pub fn new(source: S, station: impl Into<String>) -> Self {
        Self {
            source,
            station: station.into(),
            state: Mutex::new(RefreshState {
                phase: FetchPhase::Idle,
                data: None,
                error: None,
                last_updated_at: None,
                generation: 0,
            }),
        }
    }

    /// The station this controller fetches.
    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn snapshot(&self) -> RefreshSnapshot {
        let state = self.lock();
        RefreshSnapshot {
            phase: state.phase,
            data: state.data.clone(),
            error: state.error.clone(),
            loading: state.phase == FetchPhase::Loading,
            is_refreshing: state.phase == FetchPhase::Refreshing,
            last_updated_at: state.last_updated_at,
        }
    }

    pub fn data(&self) -> Option<Arc<ArrivalsResponse>> {
        self.lock().data.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn phase(&self) -> FetchPhase {
        self.lock().phase
    }

    pub fn loading(&self) -> bool {
        self.phase() == FetchPhase::Loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.phase() == FetchPhase::Refreshing
    }

    /// Fetch the board once.
    ///
    /// `is_refresh` selects between the loading state (first load, retry)
    /// and the refreshing state (data already on screen). The in-flight
    /// state is always cleared when this returns or is dropped.
    ///
    /// Returns the phase the controller is in afterwards.
    pub async fn fetch_data(&self, is_refresh: bool) -> FetchPhase {
        let in_flight = self.begin(is_refresh);

        if !self.source.is_configured() {
            return in_flight.finish(Err(FetchError::NotConfigured));
        }

        let result = self.source.fetch_arrivals(&self.station).await;
        in_flight.finish(result)
    }

    fn begin(&self, is_refresh: bool) -> InFlight<'_, S> {
        let mut state = self.lock();
        state.generation += 1;
        state.phase = if is_refresh {
            FetchPhase::Refreshing
        } else {
            FetchPhase::Loading
        };
        state.error = None;

        debug!(
            station = %self.station,
            generation = state.generation,
            is_refresh,
            "fetch started"
        );

        InFlight {
            controller: self,
            generation: state.generation,
            settled: false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn source_for_tests(&self) -> &S {
        &self.source
    }
}

/// Scoped claim on the in-flight state for one fetch.
///
/// Dropping it without calling [`InFlight::finish`] (for example when the
/// fetch future is cancelled) releases the in-flight state.
struct InFlight<'a, S> {
    controller: &'a RefreshController<S>,
    generation: u64,
    settled: bool,
}

impl<S: ArrivalsSource> InFlight<'_, S> {
    fn finish(mut self, result: Result<ArrivalsResponse, FetchError>) -> FetchPhase {
        self.settled = true;
        let mut state = self.controller.lock();

        if state.generation != self.generation {
            debug!(
                generation = self.generation,
                latest = state.generation,
                "discarding superseded fetch result"
            );
            return state.phase;
        }

        match result {
            Ok(response) => {
                info!(
                    station = %response.station_name,
                    trains = response.arriving_trains.len(),
                    "arrivals updated"
                );
                state.data = Some(Arc::new(response));
                state.last_updated_at = Some(Local::now());
                state.error = None;
                state.phase = FetchPhase::Success;
            }
            Err(e) => {
                let message = match e.kind() {
                    FetchErrorKind::Configuration => {
                        warn!(error = %e, "arrivals API is not configured");
                        CONFIG_ERROR_MESSAGE
                    }
                    FetchErrorKind::Transport | FetchErrorKind::Decode => {
                        error!(error = %e, kind = ?e.kind(), "failed to fetch arrivals");
                        FETCH_ERROR_MESSAGE
                    }
                };
                state.error = Some(message.to_string());
                state.phase = FetchPhase::Error;
            }
        }

        state.phase
    }
}

impl<S> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let mut state = self
            .controller
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if state.generation == self.generation && state.phase.is_in_flight() {
            debug!(generation = self.generation, "fetch abandoned");
            state.phase = if state.data.is_some() {
                FetchPhase::Success
            } else {
                FetchPhase::Idle
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::refresh::testing::{FakeSource, response_with};

    #[tokio::test]
    async fn starts_idle() {
        let controller = RefreshController::new(FakeSource::new(), "調布");
        let snapshot = controller.snapshot();

        assert_eq!(snapshot.phase, FetchPhase::Idle);
        assert!(snapshot.data.is_none());
        assert!(snapshot.error.is_none());
        assert!(!snapshot.loading);
        assert!(!snapshot.is_refreshing);
        assert_eq!(controller.station(), "調布");
    }

    #[tokio::test]
    async fn successful_fetch_stores_data() {
        let source = FakeSource::new();
        source.push_ok(response_with(&["10:00", "10:05"]));
        let controller = RefreshController::new(source, "調布");

        let phase = controller.fetch_data(false).await;

        assert_eq!(phase, FetchPhase::Success);
        assert_eq!(controller.data().unwrap().arriving_trains.len(), 2);
        assert!(controller.error().is_none());
        assert!(!controller.loading());
        assert!(!controller.is_refreshing());
        assert!(controller.snapshot().last_updated_at.is_some());
        assert_eq!(controller.source.stations(), vec!["調布".to_string()]);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_data() {
        let source = FakeSource::new();
        source.push_ok(response_with(&["10:00"]));
        source.push_err(FetchError::Status {
            status: 500,
            body: "boom".into(),
        });
        let controller = RefreshController::new(source, "調布");

        controller.fetch_data(false).await;
        let before = controller.data().unwrap();

        let phase = controller.fetch_data(true).await;

        assert_eq!(phase, FetchPhase::Error);
        assert_eq!(controller.error().as_deref(), Some(FETCH_ERROR_MESSAGE));
        assert_eq!(controller.data().unwrap(), before);
        assert!(!controller.is_refreshing());
    }

    #[tokio::test]
    async fn decode_failure_uses_fetch_message() {
        let source = FakeSource::new();
        let json_err = serde_json::from_str::<ArrivalsResponse>("[]").unwrap_err();
        source.push_err(FetchError::decode(json_err, "[]"));
        let controller = RefreshController::new(source, "調布");

        controller.fetch_data(false).await;

        assert_eq!(controller.error().as_deref(), Some(FETCH_ERROR_MESSAGE));
        assert!(controller.data().is_none());
        assert!(!controller.loading());
    }

    #[tokio::test]
    async fn missing_configuration_never_fetches() {
        let source = FakeSource::unconfigured();
        let controller = RefreshController::new(source, "調布");

        let phase = controller.fetch_data(false).await;

        assert_eq!(phase, FetchPhase::Error);
        assert_eq!(controller.error().as_deref(), Some(CONFIG_ERROR_MESSAGE));
        assert_eq!(controller.source.calls(), 0);
        assert!(!controller.loading());
    }

    #[tokio::test]
    async fn new_fetch_clears_previous_error() {
        let source = FakeSource::new();
        source.push_err(FetchError::Status {
            status: 503,
            body: String::new(),
        });
        source.push_ok(response_with(&["10:00"]));
        let controller = RefreshController::new(source, "調布");

        controller.fetch_data(false).await;
        assert!(controller.error().is_some());

        controller.fetch_data(false).await;
        assert!(controller.error().is_none());
        assert_eq!(controller.phase(), FetchPhase::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_flags_track_fetch_kind() {
        let source = FakeSource::new();
        source.push_delayed(Duration::from_secs(1), Ok(response_with(&["10:00"])));
        source.push_delayed(Duration::from_secs(1), Ok(response_with(&["10:00"])));
        let controller = Arc::new(RefreshController::new(source, "調布"));

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.fetch_data(false).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(controller.loading());
        assert!(!controller.is_refreshing());
        task.await.unwrap();

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.fetch_data(true).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(controller.is_refreshing());
        assert!(!controller.loading());
        // the previous snapshot stays visible while refreshing
        assert!(controller.data().is_some());
        task.await.unwrap();

        assert!(!controller.is_refreshing());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_result_is_discarded() {
        let source = FakeSource::new();
        source.push_delayed(Duration::from_secs(5), Ok(response_with(&["09:00"])));
        source.push_delayed(Duration::from_secs(1), Ok(response_with(&["10:00", "10:30"])));
        let controller = RefreshController::new(source, "調布");

        let (slow, fast) = tokio::join!(controller.fetch_data(true), controller.fetch_data(true));

        assert_eq!(fast, FetchPhase::Success);
        assert_eq!(slow, FetchPhase::Success);
        assert_eq!(controller.data().unwrap().arriving_trains.len(), 2);
        assert!(!controller.is_refreshing());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_fetch_releases_in_flight_state() {
        let source = FakeSource::new();
        source.push_delayed(Duration::from_secs(60), Ok(response_with(&["10:00"])));
        let controller = RefreshController::new(source, "調布");

        let outcome =
            tokio::time::timeout(Duration::from_secs(1), controller.fetch_data(false)).await;

        assert!(outcome.is_err());
        assert_eq!(controller.phase(), FetchPhase::Idle);
        assert!(!controller.loading());
        assert!(controller.data().is_none());
    }
}

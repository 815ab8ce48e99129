//! Cooldown and auto-refresh timing.
//!
//! Every refresh issued through the scheduler starts a cooldown. Manual
//! refreshes are refused until it has run out. When auto-refresh is on, the
//! end of each cooldown arms a one-shot timer that refreshes again after
//! [`SchedulerTiming::auto_refresh_delay`], which in turn restarts the
//! cooldown.
//!
//! The scheduler owns both timers. [`RefreshScheduler::shutdown`] (or
//! dropping the scheduler) cancels them together. A fetch that is already
//! in flight is left to finish.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::{Instant, interval_at};
use tracing::{debug, info, warn};

use crate::arrivals::ArrivalsSource;

use super::controller::RefreshController;
use super::timer::TimerSlot;

/// Cooldown length, in ticks.
const COOLDOWN_TICKS: u32 = 100;

/// Cooldown tick period. 100 ticks of 100 ms make a 10 s cooldown.
const COOLDOWN_TICK: Duration = Duration::from_millis(100);

/// Delay between the end of a cooldown and the next automatic refresh.
const AUTO_REFRESH_DELAY: Duration = Duration::from_secs(30);

/// Timing parameters for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerTiming {
    /// Number of ticks a cooldown lasts.
    pub cooldown_ticks: u32,
    /// Length of one cooldown tick.
    pub tick: Duration,
    /// Wait after a cooldown before an automatic refresh.
    pub auto_refresh_delay: Duration,
}

impl Default for SchedulerTiming {
    fn default() -> Self {
        Self {
            cooldown_ticks: COOLDOWN_TICKS,
            tick: COOLDOWN_TICK,
            auto_refresh_delay: AUTO_REFRESH_DELAY,
        }
    }
}

impl SchedulerTiming {
    /// Total cooldown length.
    pub fn cooldown_total(&self) -> Duration {
        self.tick * self.cooldown_ticks
    }
}

/// Point-in-time view of the scheduler for presenters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerSnapshot {
    pub auto_refresh: bool,
    /// 0 right after a refresh, 100 once refreshing is allowed again.
    pub cooldown_progress: u8,
    pub cooldown_remaining_secs: f64,
}

struct SchedulerState {
    auto_refresh: bool,
    cooldown_ticks: u32,
    cooldown_timer: TimerSlot,
    auto_timer: TimerSlot,
    shut_down: bool,
}

struct SchedulerInner<S> {
    controller: Arc<RefreshController<S>>,
    timing: SchedulerTiming,
    state: Mutex<SchedulerState>,
}

/// Gates manual refreshes behind a cooldown and drives auto-refresh.
pub struct RefreshScheduler<S> {
    inner: Arc<SchedulerInner<S>>,
}

impl<S: ArrivalsSource + 'static> RefreshScheduler<S> {
    /// Create a scheduler with the default timing.
    pub fn new(controller: Arc<RefreshController<S>>) -> Self {
        Self::with_timing(controller, SchedulerTiming::default())
    }

    pub fn with_timing(controller: Arc<RefreshController<S>>, timing: SchedulerTiming) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                controller,
                timing,
                state: Mutex::new(SchedulerState {
                    auto_refresh: false,
                    cooldown_ticks: 0,
                    cooldown_timer: TimerSlot::new(),
                    auto_timer: TimerSlot::new(),
                    shut_down: false,
                }),
            }),
        }
    }

    pub fn controller(&self) -> &Arc<RefreshController<S>> {
        &self.inner.controller
    }

    pub fn auto_refresh(&self) -> bool {
        self.inner.lock().auto_refresh
    }

    /// Percentage of the cooldown that has elapsed, rounded down.
    pub fn cooldown_progress(&self) -> u8 {
        let ticks = self.inner.lock().cooldown_ticks;
        self.inner.progress(ticks)
    }

    /// Time left before a manual refresh is accepted.
    pub fn cooldown_remaining(&self) -> Duration {
        self.inner.timing.tick * self.inner.lock().cooldown_ticks
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        let (auto_refresh, ticks) = {
            let state = self.inner.lock();
            (state.auto_refresh, state.cooldown_ticks)
        };

        SchedulerSnapshot {
            auto_refresh,
            cooldown_progress: self.inner.progress(ticks),
            cooldown_remaining_secs: (self.inner.timing.tick * ticks).as_secs_f64(),
        }
    }

    /// Refresh now, unless the cooldown is still running.
    ///
    /// Returns whether a fetch was issued. The fetch runs on its own task, so
    /// dropping this future does not cancel it.
    pub async fn handle_refresh(&self) -> bool {
        {
            let mut state = self.inner.lock();
            if state.shut_down {
                return false;
            }
            if state.cooldown_ticks > 0 {
                debug!(
                    remaining_ticks = state.cooldown_ticks,
                    "manual refresh rejected during cooldown"
                );
                return false;
            }
            self.inner.start_cooldown(&mut state);
        }

        info!("manual refresh");
        self.inner.fetch_detached().await;
        true
    }

    /// Flip auto-refresh and return the new setting.
    ///
    /// Turning it on while no cooldown is running refreshes immediately.
    /// Turning it off cancels the pending automatic refresh but leaves any
    /// running cooldown and in-flight fetch alone.
    pub async fn toggle_auto_refresh(&self) -> bool {
        let (enabled, refresh_now) = {
            let mut state = self.inner.lock();
            if state.shut_down {
                return state.auto_refresh;
            }

            state.auto_refresh = !state.auto_refresh;
            if state.auto_refresh {
                let idle = state.cooldown_ticks == 0;
                if idle {
                    self.inner.start_cooldown(&mut state);
                }
                (true, idle)
            } else {
                if state.auto_timer.cancel() {
                    debug!("pending auto-refresh cancelled");
                }
                (false, false)
            }
        };

        info!(enabled, "auto-refresh toggled");

        if refresh_now {
            self.inner.fetch_detached().await;
        }
        enabled
    }

    /// Cancel all timers. Further refresh requests are ignored.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}

impl<S> Drop for RefreshScheduler<S> {
    fn drop(&mut self) {
        self.inner.shutdown();
    }
}

impl<S> SchedulerInner<S> {
    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn progress(&self, ticks: u32) -> u8 {
        let total = self.timing.cooldown_ticks;
        if ticks == 0 || total == 0 {
            return 100;
        }
        let elapsed = total.saturating_sub(ticks);
        (u64::from(elapsed) * 100 / u64::from(total)) as u8
    }

    fn shutdown(&self) {
        let mut state = self.lock();
        if state.shut_down {
            return;
        }
        state.shut_down = true;
        state.cooldown_timer.cancel();
        state.auto_timer.cancel();
        info!("refresh scheduler shut down");
    }
}

impl<S: ArrivalsSource + 'static> SchedulerInner<S> {
    /// Reset the cooldown to full and restart its countdown.
    ///
    /// Any pending automatic refresh is dropped; the end of this cooldown
    /// re-arms it.
    fn start_cooldown(self: &Arc<Self>, state: &mut SchedulerState) {
        state.cooldown_ticks = self.timing.cooldown_ticks;
        state.auto_timer.cancel();

        let inner = Arc::clone(self);
        state.cooldown_timer.arm(tokio::spawn(inner.run_cooldown()));
    }

    /// Run a refresh on its own task and wait for it to settle.
    ///
    /// Dropping the returned future only stops the wait; the fetch still
    /// completes and its result is applied.
    async fn fetch_detached(&self) {
        let controller = Arc::clone(&self.controller);
        let fetch = tokio::spawn(async move { controller.fetch_data(true).await });

        if let Err(e) = fetch.await {
            warn!(error = %e, "refresh task failed");
        }
    }

    fn arm_auto_refresh(self: &Arc<Self>, state: &mut SchedulerState) {
        debug!(delay = ?self.timing.auto_refresh_delay, "auto-refresh armed");

        let inner = Arc::clone(self);
        state.auto_timer.arm(tokio::spawn(inner.run_auto_refresh()));
    }

    async fn run_cooldown(self: Arc<Self>) {
        let tick = self.timing.tick;
        let mut interval = interval_at(Instant::now() + tick, tick);

        loop {
            interval.tick().await;

            let mut state = self.lock();
            state.cooldown_ticks = state.cooldown_ticks.saturating_sub(1);
            if state.cooldown_ticks == 0 {
                state.cooldown_timer.release();
                if state.auto_refresh && !state.shut_down {
                    self.arm_auto_refresh(&mut state);
                }
                return;
            }
        }
    }

    async fn run_auto_refresh(self: Arc<Self>) {
        tokio::time::sleep(self.timing.auto_refresh_delay).await;

        {
            let mut state = self.lock();
            if state.shut_down || !state.auto_refresh || state.cooldown_ticks > 0 {
                return;
            }
            // From here on this is an in-flight refresh, not a pending timer.
            state.auto_timer.release();
            self.start_cooldown(&mut state);
        }

        info!("auto-refresh");
        self.controller.fetch_data(true).await;
    }
}

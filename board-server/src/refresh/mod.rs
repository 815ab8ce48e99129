//! Keeping the board fresh.
//!
//! [`RefreshController`] runs individual fetches and holds the resulting
//! state; [`RefreshScheduler`] decides when fetches may or should happen.

mod controller;
mod scheduler;
#[cfg(test)]
mod testing;
mod timer;

pub use controller::{
    CONFIG_ERROR_MESSAGE, FETCH_ERROR_MESSAGE, FetchPhase, RefreshController, RefreshSnapshot,
};
pub use scheduler::{RefreshScheduler, SchedulerSnapshot, SchedulerTiming};
pub use timer::TimerSlot;

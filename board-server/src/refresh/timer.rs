//! Cancellable timer slots.

use tokio::task::JoinHandle;

/// Holds at most one pending timer task.
///
/// Arming a new timer cancels the previous one, and dropping the slot
/// cancels whatever is still pending.
#[derive(Debug, Default)]
pub struct TimerSlot {
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handle`, cancelling any timer already in the slot.
    pub fn arm(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.handle.replace(handle) {
            previous.abort();
        }
    }

    /// Cancel the pending timer. Returns whether one was still running.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    /// Forget the timer without cancelling it.
    ///
    /// Used by a timer task to clear its own slot once it has fired, so
    /// that a later [`TimerSlot::cancel`] cannot interrupt work it started.
    pub fn release(&mut self) {
        self.handle.take();
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

//! Board model: turning an arrivals snapshot into sorted, directional rows.
//!
//! Everything in this module is a pure function of its inputs. It is only
//! ever fed a successfully fetched board; fetch failures stop at the refresh
//! controller.

mod direction;
mod display;
mod sort;
mod time;

pub use direction::{DirectionalTrains, INBOUND_MARKER, categorize_by_direction};
pub use display::{DisplayTrain, PASS_MARKER, convert_to_display_trains};
pub use sort::{sort_trains_at, sorted_boards, sorted_boards_at};
pub use time::{ClockTime, TimeError};

#[cfg(test)]
pub(crate) use display::tests as fixtures;

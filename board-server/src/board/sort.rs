//! Chronological ordering of board rows.
//!
//! Sorting by time alone makes trains with the same time swap places
//! between refreshes, so ties are broken by train type. Times are anchored
//! to a calendar day first (see [`ClockTime::anchor`]) so that a board
//! spanning midnight reads in real departure order.

use std::cmp::Ordering;

use chrono::{Local, NaiveDateTime};
use tracing::warn;

use crate::arrivals::ArrivalsResponse;

use super::direction::{DirectionalTrains, categorize_by_direction};
use super::display::{DisplayTrain, convert_to_display_trains};
use super::time::ClockTime;

/// Precomputed ordering key for one row.
struct SortKey<'a> {
    /// `None` when the row's time does not parse; such rows sort last.
    departs: Option<NaiveDateTime>,
    train_type: &'a str,
}

impl SortKey<'_> {
    /// Departure first, then train type by code point. The type order is not
    /// locale-aware.
    fn compare(&self, other: &Self) -> Ordering {
        match (self.departs, other.departs) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.train_type.cmp(other.train_type)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Sort rows by departure as seen at `now`.
///
/// The sort is stable: rows with the same time and type keep their input
/// order, and rows with unparsable times keep their input order at the end.
pub fn sort_trains_at(trains: &[DisplayTrain], now: NaiveDateTime) -> Vec<DisplayTrain> {
    let mut keyed: Vec<(SortKey<'_>, &DisplayTrain)> = trains
        .iter()
        .map(|train| {
            let departs = match ClockTime::parse_hhmm(&train.time) {
                Ok(time) => Some(time.anchor(now)),
                Err(e) => {
                    warn!(id = %train.id, time = %train.time, error = %e, "unparsable departure time");
                    None
                }
            };
            let key = SortKey {
                departs,
                train_type: &train.train_type,
            };
            (key, train)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| a.compare(b));

    keyed.into_iter().map(|(_, train)| train.clone()).collect()
}

/// Build both sorted boards, anchoring times against the local clock.
pub fn sorted_boards(response: Option<&ArrivalsResponse>) -> DirectionalTrains {
    sorted_boards_at(response, Local::now().naive_local())
}

/// Run the full pipeline: convert, split by direction, sort each board.
///
/// `now` is captured once so both boards share the same day anchoring.
pub fn sorted_boards_at(response: Option<&ArrivalsResponse>, now: NaiveDateTime) -> DirectionalTrains {
    let split = categorize_by_direction(convert_to_display_trains(response));

    DirectionalTrains {
        inbound: sort_trains_at(&split.inbound, now),
        outbound: sort_trains_at(&split.outbound, now),
    }
}

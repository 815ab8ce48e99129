//! Conversion from arrivals DTOs to board rows.

use serde::Serialize;

use crate::arrivals::{ArrivalTrain, ArrivalsResponse};

/// `passType` value for trains that run through without stopping.
pub const PASS_MARKER: &str = "通過";

/// One row on the departure board.
///
/// Rows are rebuilt from scratch on every fetch; nothing here survives a
/// refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTrain {
    /// Train number plus position in the batch. Unique within one board only.
    pub id: String,
    /// Departure time as printed, "HH:MM".
    pub time: String,
    pub train_type: String,
    /// Badge identifier, falling back to the type name.
    pub icon_name: String,
    pub destination: String,
    pub direction: String,
    /// Delay in minutes, never negative.
    pub delay: u32,
    pub is_pass: bool,
    pub note: Option<String>,
}

impl DisplayTrain {
    fn from_arrival(train: &ArrivalTrain, index: usize) -> Self {
        let icon_name = if train.train_type.icon_name.is_empty() {
            train.train_type.name.clone()
        } else {
            train.train_type.icon_name.clone()
        };

        Self {
            id: format!("{}-{}", train.train_number, index),
            time: train.estimated_departure.clone(),
            train_type: train.train_type.name.clone(),
            icon_name,
            destination: train.destination.name.clone(),
            direction: train.direction.clone(),
            delay: u32::try_from(train.delay).unwrap_or(0),
            is_pass: train.pass_type == PASS_MARKER,
            note: train.information.clone(),
        }
    }

    /// Whether the train is running late.
    pub fn is_delayed(&self) -> bool {
        self.delay > 0
    }
}

/// Convert an arrivals board to display rows, preserving upstream order.
///
/// Never fails: a missing board yields no rows.
pub fn convert_to_display_trains(response: Option<&ArrivalsResponse>) -> Vec<DisplayTrain> {
    let Some(response) = response else {
        return Vec::new();
    };

    response
        .arriving_trains
        .iter()
        .enumerate()
        .map(|(index, train)| DisplayTrain::from_arrival(train, index))
        .collect()
}

//! Arrivals API response DTOs.
//!
//! These types map directly to the `/trains/arrivals/{station}` JSON
//! response. Fields the upstream sometimes omits are defaulted here so that
//! the display layer only ever sees a complete record; anything else that
//! does not match this shape is rejected at deserialization time.

use serde::{Deserialize, Serialize};

/// Response from `GET /trains/arrivals/{stationIdOrName}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalsResponse {
    /// Upstream station identifier.
    pub station_id: String,

    /// Human-readable station name.
    pub station_name: String,

    /// When the upstream last refreshed this board (free-form string).
    pub updated_at: String,

    /// Trains approaching the station, in upstream order.
    #[serde(default)]
    pub arriving_trains: Vec<ArrivalTrain>,
}

/// A train approaching the station.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalTrain {
    /// Operator-assigned train number.
    pub train_number: String,

    /// Service category (local, express, ...).
    #[serde(rename = "type")]
    pub train_type: TrainType,

    /// Direction of travel, e.g. "上り" or "下り".
    pub direction: String,

    /// Terminal station of this run.
    pub destination: Destination,

    /// Delay in minutes.
    pub delay: i32,

    /// Estimated departure from this station, "HH:MM".
    pub estimated_departure: String,

    /// Whether the train is currently standing at the platform.
    #[serde(default)]
    pub is_in_station: bool,

    /// Stop pattern at this station; "通過" for trains that pass through.
    pub pass_type: String,

    /// Free-text operational notice.
    #[serde(default)]
    pub information: Option<String>,
}

/// Service category of a train.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainType {
    #[serde(default)]
    pub code: String,

    /// Display name, e.g. "急行".
    pub name: String,

    /// Badge identifier. Often empty.
    #[serde(default)]
    pub icon_name: String,
}

/// Terminal station of a train.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    #[serde(default)]
    pub code: String,
    pub name: String,
}

//! Upstream arrivals API client.
//!
//! The transit API publishes one board per station listing the trains
//! approaching it. Key characteristics:
//! - Times are wall-clock "HH:MM" strings with no date attached
//! - The board carries no request identifier; every fetch is a full snapshot
//! - Non-2xx responses carry no useful body for end users

mod client;
mod error;
mod mock;
mod source;
mod types;

pub use client::{ArrivalsClient, ArrivalsConfig};
pub use error::{FetchError, FetchErrorKind};
pub use mock::MockArrivalsClient;
pub use source::{ArrivalsSource, BoardSource};
pub use types::{ArrivalTrain, ArrivalsResponse, Destination, TrainType};

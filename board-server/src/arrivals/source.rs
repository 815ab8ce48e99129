//! The seam between the refresh controller and wherever boards come from.

use std::future::Future;

use super::client::ArrivalsClient;
use super::error::FetchError;
use super::mock::MockArrivalsClient;
use super::types::ArrivalsResponse;

/// Something that can produce an arrivals board for a station.
///
/// This abstraction lets the refresh controller run against the live API,
/// the file-backed mock, or a test double.
pub trait ArrivalsSource: Send + Sync {
    /// Whether the source can be queried at all. Checked before every fetch;
    /// an unconfigured source is never asked for data.
    fn is_configured(&self) -> bool {
        true
    }

    /// Fetch the current arrivals board for `station`.
    fn fetch_arrivals(
        &self,
        station: &str,
    ) -> impl Future<Output = Result<ArrivalsResponse, FetchError>> + Send;
}

/// The source the server was started with.
#[derive(Clone)]
pub enum BoardSource {
    Live(ArrivalsClient),
    Mock(MockArrivalsClient),
}

impl ArrivalsSource for BoardSource {
    fn is_configured(&self) -> bool {
        match self {
            BoardSource::Live(client) => client.is_configured(),
            BoardSource::Mock(_) => true,
        }
    }

    fn fetch_arrivals(
        &self,
        station: &str,
    ) -> impl Future<Output = Result<ArrivalsResponse, FetchError>> + Send {
        async move {
            match self {
                BoardSource::Live(client) => client.get_arrivals(station).await,
                BoardSource::Mock(client) => client.get_arrivals(station).await,
            }
        }
    }
}

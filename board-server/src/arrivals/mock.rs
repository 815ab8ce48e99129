//! Mock arrivals client for running the board without API access.
//!
//! Loads sample boards from JSON files and serves them as if they were live
//! API responses.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use super::error::FetchError;
use super::source::ArrivalsSource;
use super::types::ArrivalsResponse;

/// Mock arrivals client that serves data from JSON files.
#[derive(Clone)]
pub struct MockArrivalsClient {
    /// Pre-loaded boards, keyed by station (file stem).
    boards: Arc<HashMap<String, ArrivalsResponse>>,
}

impl MockArrivalsClient {
    /// Create a new mock client by loading JSON files from a directory.
    ///
    /// Expects files named `{station}.json` (e.g. `調布.json`).
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let boards = load_boards(data_dir.as_ref())?;

        Ok(Self {
            boards: Arc::new(boards),
        })
    }

    /// List available stations in the mock data.
    pub fn available_stations(&self) -> Vec<String> {
        let mut stations: Vec<String> = self.boards.keys().cloned().collect();
        stations.sort();
        stations
    }

    /// Return the stored board for a station.
    pub async fn get_arrivals(&self, station: &str) -> Result<ArrivalsResponse, FetchError> {
        let boards = &self.boards;

        boards.get(station).cloned().ok_or_else(|| FetchError::Status {
            status: 404,
            body: format!(
                "No mock data for station {}. Available: {:?}",
                station,
                boards.keys().collect::<Vec<_>>()
            ),
        })
    }
}

impl ArrivalsSource for MockArrivalsClient {
    fn fetch_arrivals(
        &self,
        station: &str,
    ) -> impl Future<Output = Result<ArrivalsResponse, FetchError>> + Send {
        self.get_arrivals(station)
    }
}

fn load_boards(data_dir: &Path) -> Result<HashMap<String, ArrivalsResponse>, FetchError> {
    let io_error = |message: String| FetchError::MockData { message };

    let entries = std::fs::read_dir(data_dir)
        .map_err(|e| io_error(format!("Failed to read mock data directory: {e}")))?;

    let mut boards = HashMap::new();

    for entry in entries {
        let entry = entry.map_err(|e| io_error(format!("Failed to read directory entry: {e}")))?;

        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let station = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| io_error(format!("Invalid filename: {path:?}")))?
            .to_string();

        let json = std::fs::read_to_string(&path)
            .map_err(|e| io_error(format!("Failed to read {path:?}: {e}")))?;

        let board: ArrivalsResponse =
            serde_json::from_str(&json).map_err(|e| FetchError::decode(e, &json))?;

        boards.insert(station, board);
    }

    if boards.is_empty() {
        return Err(io_error(format!("No mock board files found in {data_dir:?}")));
    }

    Ok(boards)
}

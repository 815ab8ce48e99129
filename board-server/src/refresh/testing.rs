//! Test doubles for the refresh layer.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::arrivals::{
    ArrivalTrain, ArrivalsResponse, ArrivalsSource, Destination, FetchError, TrainType,
};

type Scripted = (Duration, Result<ArrivalsResponse, FetchError>);

/// Arrivals source that replays scripted results and counts calls.
///
/// Once the script runs out it answers with an empty board.
pub(crate) struct FakeSource {
    configured: bool,
    script: Mutex<VecDeque<Scripted>>,
    calls: AtomicUsize,
    stations: Mutex<Vec<String>>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self {
            configured: true,
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            stations: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub(crate) fn push_ok(&self, response: ArrivalsResponse) {
        self.push_delayed(Duration::ZERO, Ok(response));
    }

    pub(crate) fn push_err(&self, err: FetchError) {
        self.push_delayed(Duration::ZERO, Err(err));
    }

    pub(crate) fn push_delayed(&self, delay: Duration, result: Result<ArrivalsResponse, FetchError>) {
        self.script.lock().unwrap().push_back((delay, result));
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn stations(&self) -> Vec<String> {
        self.stations.lock().unwrap().clone()
    }
}

impl ArrivalsSource for FakeSource {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn fetch_arrivals(
        &self,
        station: &str,
    ) -> impl Future<Output = Result<ArrivalsResponse, FetchError>> + Send {
        // Take the scripted result at call time so that concurrent fetches
        // are matched to the script in the order they were started.
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.stations.lock().unwrap().push(station.to_string());
        let next = self.script.lock().unwrap().pop_front();

        async move {
            match next {
                Some((delay, result)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    result
                }
                None => Ok(response_with(&[])),
            }
        }
    }
}

/// A board with one train per time, alternating inbound and outbound.
pub(crate) fn response_with(times: &[&str]) -> ArrivalsResponse {
    let arriving_trains = times
        .iter()
        .enumerate()
        .map(|(i, time)| ArrivalTrain {
            train_number: format!("{}", 1000 + i),
            train_type: TrainType {
                code: "1".to_string(),
                name: "各停".to_string(),
                icon_name: String::new(),
            },
            direction: if i % 2 == 0 { "上り" } else { "下り" }.to_string(),
            destination: Destination {
                code: "KO01".to_string(),
                name: "新宿".to_string(),
            },
            delay: 0,
            estimated_departure: (*time).to_string(),
            is_in_station: false,
            pass_type: "停車".to_string(),
            information: None,
        })
        .collect();

    ArrivalsResponse {
        station_id: "KO18".to_string(),
        station_name: "調布".to_string(),
        updated_at: "2026-10-17T10:00:00+09:00".to_string(),
        arriving_trains,
    }
}

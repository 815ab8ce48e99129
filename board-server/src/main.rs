use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use board_server::arrivals::{ArrivalsClient, ArrivalsConfig, BoardSource, MockArrivalsClient};
use board_server::config::BoardConfig;
use board_server::refresh::{RefreshController, RefreshScheduler};
use board_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let config = BoardConfig::from_env().expect("Invalid configuration");

    let source = match &config.mock_dir {
        Some(dir) => {
            let mock = MockArrivalsClient::new(dir).expect("Failed to load mock boards");
            info!(
                dir = %dir.display(),
                stations = ?mock.available_stations(),
                "Serving mock boards"
            );
            BoardSource::Mock(mock)
        }
        None => {
            if config.api_base_url.is_none() {
                warn!("TRAIN_API_URL not set. Every fetch will fail until it is configured.");
            }
            let arrivals_config = ArrivalsConfig::new(config.api_base_url.clone())
                .with_timeout(config.request_timeout_secs);
            BoardSource::Live(
                ArrivalsClient::new(arrivals_config).expect("Failed to create arrivals client"),
            )
        }
    };

    let controller = Arc::new(RefreshController::new(source, config.station.clone()));
    let scheduler = Arc::new(RefreshScheduler::new(controller.clone()));

    // First load; the page shows the loading state until it settles.
    tokio::spawn(async move {
        controller.fetch_data(false).await;
    });

    let state = AppState::new(scheduler.clone(), config.default_rows);
    let app = create_router(state, &config.static_dir);

    info!(
        station = %config.station,
        "Departure board listening on http://{}",
        config.bind_addr
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    scheduler.shutdown();
    info!("Shut down");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::board::{DirectionalTrains, sorted_boards};
use crate::config::DISPLAY_COUNT_OPTIONS;
use crate::refresh::{RefreshSnapshot, SchedulerSnapshot};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(board_page))
        .route("/health", get(health))
        .route("/api/board", get(board_json))
        .route("/api/refresh", post(refresh))
        .route("/api/retry", post(retry))
        .route("/api/auto-refresh", post(toggle_auto_refresh))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Validate a requested row count, falling back to the configured default.
fn resolve_rows(state: &AppState, requested: Option<usize>) -> Result<usize, AppError> {
    match requested {
        None => Ok(state.default_rows),
        Some(rows) if DISPLAY_COUNT_OPTIONS.contains(&rows) => Ok(rows),
        Some(rows) => Err(AppError::BadRequest {
            message: format!("rows must be one of {DISPLAY_COUNT_OPTIONS:?}, got {rows}"),
        }),
    }
}

/// Current controller state plus both sorted boards.
fn current_board(state: &AppState) -> (RefreshSnapshot, DirectionalTrains) {
    let snapshot = state.controller().snapshot();
    let boards = sorted_boards(snapshot.data.as_deref());
    (snapshot, boards)
}

/// The rendered departure board.
async fn board_page(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Html<String>, AppError> {
    let rows = resolve_rows(&state, query.rows)?;
    let (snapshot, boards) = current_board(&state);

    let template = BoardTemplate::new(
        state.controller().station(),
        &snapshot,
        state.scheduler.snapshot(),
        &boards,
        rows,
    );

    Ok(Html(template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?))
}

/// The same board as JSON.
async fn board_json(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<BoardResponse>, AppError> {
    let rows = resolve_rows(&state, query.rows)?;
    let (snapshot, boards) = current_board(&state);

    Ok(Json(BoardResponse::new(
        state.controller().station(),
        snapshot,
        state.scheduler.snapshot(),
        boards,
        rows,
    )))
}

/// Manual refresh. Ignored while the cooldown is running.
async fn refresh(State(state): State<AppState>) -> Json<RefreshResponse> {
    let accepted = state.scheduler.handle_refresh().await;

    Json(RefreshResponse {
        accepted,
        phase: state.controller().phase(),
        scheduler: state.scheduler.snapshot(),
    })
}

/// Retry after an error, showing the loading state rather than refreshing.
async fn retry(State(state): State<AppState>) -> Json<RetryResponse> {
    let phase = state.controller().fetch_data(false).await;

    Json(RetryResponse {
        phase,
        error: state.controller().error(),
    })
}

/// Flip auto-refresh on or off.
async fn toggle_auto_refresh(State(state): State<AppState>) -> Json<SchedulerSnapshot> {
    state.scheduler.toggle_auto_refresh().await;
    Json(state.scheduler.snapshot())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

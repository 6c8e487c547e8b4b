//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::sse::sse_stream;
use super::types::{ChatRequest, ChatResponse, ErrorResponse, SessionResponse, SuccessResponse};
use super::AppState;
use crate::content::{Landing, LANDING};
use crate::session::SessionError;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the landing page
        .route("/", get(serve_index))
        .route("/assets/*path", get(serve_static))
        // Landing copy
        .route("/api/landing", get(get_landing))
        // Session lifecycle
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/restart", post(restart_session))
        .route("/api/sessions/:id/delete", post(delete_session))
        // Conversation
        .route("/api/sessions/:id/chat", post(send_chat))
        .route("/api/sessions/:id/stream", get(stream_session))
        // Version
        .route("/version", get(get_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================
// Page
// ============================================================

async fn serve_index() -> Result<Html<String>, AppError> {
    get_index_html()
        .map(Html)
        .ok_or_else(|| AppError::Internal("index.html is not embedded".to_string()))
}

async fn get_landing() -> Json<Landing> {
    Json(LANDING)
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.sessions.create().await;
    Json(SessionResponse {
        session: session.snapshot(),
    })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.get(&id).await?;
    Ok(Json(SessionResponse {
        session: session.snapshot(),
    }))
}

async fn restart_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.get(&id).await?;
    Ok(Json(SessionResponse {
        session: session.restart(),
    }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.remove(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Conversation
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let session = state.sessions.get(&id).await?;
    let Json(req) = payload?;
    let outcome = session.submit(&req.text).await?;
    Ok(Json(outcome.into()))
}

async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.sessions.get(&id).await?;
    // Subscribe before the snapshot so nothing falls between them
    let broadcast_rx = session.subscribe();
    Ok(sse_stream(session.snapshot(), broadcast_rx))
}

async fn get_version() -> &'static str {
    concat!("learnsync ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Errors
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => AppError::NotFound(err.to_string()),
            SessionError::Busy(_) => AppError::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

use super::{page, AppState};
use crate::error::TroubleshootError;
use crate::ingest::{check_log_file, decode_log, ingest_log, UNREADABLE_PLACEHOLDER};
use crate::providers::Message;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// JSON error body with a matching status code
pub(super) struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let status = match err.downcast_ref::<TroubleshootError>() {
            Some(TroubleshootError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            Some(TroubleshootError::FileLoad(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SessionCreated {
    id: Uuid,
}

#[derive(Debug, Serialize)]
pub(super) struct SessionView {
    id: Uuid,
    created_at: DateTime<Utc>,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MessageRequest {
    content: String,
}

#[derive(Debug, Serialize)]
pub(super) struct TurnResponse {
    reply: Option<String>,
    error: Option<String>,
    trace: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LogQuery {
    filename: String,
}

#[derive(Debug, Serialize)]
pub(super) struct LogResponse {
    content: String,
    summary: Option<String>,
    error: Option<String>,
    trace: Option<String>,
}

pub(super) async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(page::render_page(&state.ingest().allowed_extensions))
}

pub(super) async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SessionCreated>) {
    let id = state.create_session().await;
    tracing::info!("Started web session {}", id);
    (StatusCode::CREATED, Json(SessionCreated { id }))
}

pub(super) async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let handle = state.session(id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView {
        id: session.id(),
        created_at: session.created_at(),
        messages: session.transcript().displayed().to_vec(),
    }))
}

pub(super) async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.remove_session(id).await {
        tracing::info!("Ended web session {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(anyhow::Error::from(TroubleshootError::SessionNotFound(id.to_string())).into())
    }
}

pub(super) async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let handle = state.session(id).await?;
    // Held across the remote call: one outstanding turn per session.
    let mut session = handle.lock().await;

    let outcome = state.turns().handle_turn(&mut session, &request.content).await;

    let (reply, error, trace) = match outcome {
        Some(outcome) => match outcome.failure {
            Some(failure) => (Some(outcome.reply), Some(failure.message), Some(failure.trace)),
            None => (Some(outcome.reply), None, None),
        },
        None => (None, None, None),
    };

    Ok(Json(TurnResponse {
        reply,
        error,
        trace,
        messages: session.transcript().displayed().to_vec(),
    }))
}

pub(super) async fn upload_log(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogQuery>,
    body: Body,
) -> Result<Json<LogResponse>, ApiError> {
    let ingest = state.ingest();
    check_log_file(&query.filename, &ingest.allowed_extensions)?;

    let content = match axum::body::to_bytes(body, ingest.max_log_bytes).await {
        Ok(bytes) => decode_log(&bytes),
        Err(e) => {
            tracing::warn!("Unable to read uploaded log {}: {}", query.filename, e);
            UNREADABLE_PLACEHOLDER.to_string()
        }
    };

    tracing::info!(
        "Summarizing uploaded log {} ({} chars)",
        query.filename,
        content.len()
    );

    let turns = state.turns();
    let report = ingest_log(turns.adapter().as_ref(), turns.model(), content).await;
    let (error, trace) = match report.failure {
        Some(failure) => (Some(failure.message), Some(failure.trace)),
        None => (None, None),
    };

    Ok(Json(LogResponse {
        content: report.content,
        summary: report.summary,
        error,
        trace,
    }))
}

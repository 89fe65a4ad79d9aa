//! HTTP API endpoints for inspecting the server.
//!
//! Read-only views used by operators and the display screen.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub rooms: usize,
}

/// Survey summary without its answers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub index: usize,
    pub prompt: String,
    pub answer_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsResponse {
    pub surveys: Vec<QuestionSummary>,
    pub fast_money_sets: usize,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/questions", get(list_questions))
        .route("/api/rooms/{code}", get(get_room))
}

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        rooms: state.room_count().await,
    })
}

/// List the survey bank so the host can pick a question index.
///
/// GET /api/questions
pub async fn list_questions(State(state): State<Arc<AppState>>) -> Json<QuestionsResponse> {
    let surveys = state
        .bank
        .surveys
        .iter()
        .enumerate()
        .map(|(index, q)| QuestionSummary {
            index,
            prompt: q.prompt.clone(),
            answer_count: q.answers.len(),
        })
        .collect();

    Json(QuestionsResponse {
        surveys,
        fast_money_sets: state.bank.fast_money_sets.len(),
    })
}

/// GET /api/rooms/{code}
pub async fn get_room(State(state): State<Arc<AppState>>, Path(code): Path<String>) -> Response {
    match state.get_game(&code.to_uppercase()).await {
        Some(game) => Json(game).into_response(),
        None => (StatusCode::NOT_FOUND, format!("Game {} not found", code)).into_response(),
    }
}

//! HTTP presentation layer.
//!
//! Thin by design: handlers render engine state as JSON and forward user
//! intents. No quiz logic lives here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::domain::MuscleCategory;
use crate::session::SessionView;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/quiz", get(quiz_state))
        .route("/quiz/start", post(quiz_start))
        .route("/quiz/answer", post(quiz_answer))
        .route("/quiz/submit", post(quiz_submit))
        .route("/quiz/next", post(quiz_next))
        .route("/quiz/reset", post(quiz_reset))
        .route("/history", get(history))
        .route("/history/{id}", delete(history_delete))
        .route("/stats", get(overall_stats))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    /// `None` quizzes over the whole muscle bank.
    pub category: Option<MuscleCategory>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

/// One row of the quiz history listing.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub category: Option<MuscleCategory>,
    pub score: i64,
    pub total_questions: i64,
    pub percentage: f64,
    pub grade: u8,
    pub duration_secs: i64,
}

async fn quiz_state(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.engine.view().await)
}

async fn quiz_start(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Json<SessionView> {
    Json(state.engine.start(req.category).await)
}

async fn quiz_answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Json<SessionView> {
    Json(state.engine.select_answer(req.answer).await)
}

async fn quiz_submit(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.engine.submit().await)
}

async fn quiz_next(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.engine.advance().await)
}

async fn quiz_reset(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.engine.reset().await)
}

async fn history(State(state): State<AppState>) -> Response {
    let Ok(conn) = db::try_lock(&state.pool) else {
        return db_unavailable();
    };
    match db::list_quizzes(&conn) {
        Ok(quizzes) => {
            let entries: Vec<HistoryEntry> = quizzes
                .iter()
                .map(|q| HistoryEntry {
                    id: q.id,
                    date: q.date,
                    category: q.category,
                    score: q.score,
                    total_questions: q.total_questions,
                    percentage: q.percentage(),
                    grade: q.grade(),
                    duration_secs: q.duration_secs,
                })
                .collect();
            Json(entries).into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to list quiz history: {}", e);
            db_unavailable()
        }
    }
}

async fn history_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let Ok(conn) = db::try_lock(&state.pool) else {
        return db_unavailable();
    };
    match db::delete_quiz(&conn, id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::warn!("Failed to delete quiz {}: {}", id, e);
            db_unavailable()
        }
    }
}

async fn overall_stats(State(state): State<AppState>) -> Response {
    let Ok(conn) = db::try_lock(&state.pool) else {
        return db_unavailable();
    };
    match db::get_overall_stats(&conn) {
        Ok(stats) => Json(serde_json::json!({
            "total_questions_answered": stats.total_questions_answered,
            "total_correct": stats.total_correct,
            "total_incorrect": stats.total_incorrect,
            "success_rate": stats.success_rate(),
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!("Failed to read statistics: {}", e);
            db_unavailable()
        }
    }
}

fn db_unavailable() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({ "error": "database unavailable" })),
    )
        .into_response()
}

//! REST endpoints for session inspection.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::state::{ConversationState, IntakeStage, Message};
use super::store::SessionStore;
use crate::dialogue::{Welcome, render_routine_summary};

/// Shared state for session routes.
#[derive(Clone)]
pub struct SessionRouteState {
    pub store: Arc<SessionStore>,
    pub welcome: Welcome,
}

#[derive(Serialize)]
struct SessionView<'a> {
    session: &'a str,
    stage: IntakeStage,
    current_habits: &'a [String],
    energizing_activities: &'a [String],
    goals: &'a [String],
    history: &'a [Message],
}

impl<'a> SessionView<'a> {
    fn new(session: &'a str, state: &'a ConversationState) -> Self {
        Self {
            session,
            stage: state.intake_stage(),
            current_habits: state.current_habits(),
            energizing_activities: state.energizing_activities(),
            goals: state.goals(),
            history: state.history(),
        }
    }
}

fn not_found(session: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": format!("No session {session}")})),
    )
        .into_response()
}

/// GET /api/health
async fn health(State(state): State<SessionRouteState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": state.store.len().await,
    }))
}

/// GET /api/starters
///
/// The greeting and starter prompts shown at session start.
async fn starters(State(state): State<SessionRouteState>) -> impl IntoResponse {
    Json(state.welcome.clone())
}

/// GET /api/sessions/{session}
///
/// Preferences, intake stage, and full history for one session.
async fn get_session(
    State(state): State<SessionRouteState>,
    Path(session): Path<String>,
) -> impl IntoResponse {
    match state.store.snapshot(&session).await {
        Some(snapshot) => Json(SessionView::new(&session, &snapshot)).into_response(),
        None => not_found(&session),
    }
}

/// GET /api/sessions/{session}/summary
///
/// The locally rendered routine template for one session.
async fn get_summary(
    State(state): State<SessionRouteState>,
    Path(session): Path<String>,
) -> impl IntoResponse {
    match state.store.snapshot(&session).await {
        Some(snapshot) => Json(serde_json::json!({
            "session": session,
            "summary": render_routine_summary(&snapshot),
        }))
        .into_response(),
        None => not_found(&session),
    }
}

/// Build the session REST routes.
pub fn session_routes(state: SessionRouteState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/starters", get(starters))
        .route("/api/sessions/{session}", get(get_session))
        .route("/api/sessions/{session}/summary", get(get_summary))
        .with_state(state)
}

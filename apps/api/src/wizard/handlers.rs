//! Axum route handlers for the wizard API.
//!
//! Handlers stay thin: request decoding and session lookup here, the
//! submission contract in `controller`.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::wizard::controller::SessionController;
use crate::wizard::session::Session;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub company_name: String,
    pub position: String,
    pub section: String,
    pub user_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub selections: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviousStepResponse {
    pub session: Session,
    /// The popped answer, for the presentation layer to prefill the form.
    pub prefill_answer: String,
    pub prefill_selections: Vec<String>,
}

fn controller(state: &AppState) -> SessionController {
    SessionController::new(state.qa.clone(), state.store.clone())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/wizard/start
///
/// Opens a session with the Question/Answer Service and returns it with the
/// first question populated.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Result<Json<Session>, AppError> {
    let session = controller(&state)
        .start(
            &request.company_name,
            &request.position,
            &request.section,
            request.user_id,
        )
        .await?;
    Ok(Json(session))
}

/// POST /api/v1/wizard/:session_id/answer
///
/// Submits the answer for the current question. Returns the advanced session,
/// or the completed session with its generated content on the final step.
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<Session>, AppError> {
    let controller = controller(&state);
    let session = controller.fetch(&session_id).await?;
    let updated = controller
        .submit_answer(&session, &request.answer, &request.selections)
        .await?;
    Ok(Json(updated))
}

/// POST /api/v1/wizard/:session_id/previous
///
/// Rolls the session back one step locally and returns the popped answer as
/// prefill. No call is made to the Question/Answer Service.
pub async fn handle_previous(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<PreviousStepResponse>, AppError> {
    let controller = controller(&state);
    let session = controller.fetch(&session_id).await?;
    let rollback = controller.previous_step(&session).await?;
    Ok(Json(PreviousStepResponse {
        session: rollback.session,
        prefill_answer: rollback.prefill_answer,
        prefill_selections: rollback.prefill_selections,
    }))
}

/// GET /api/v1/wizard/:session_id
///
/// Returns the stored session snapshot.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, AppError> {
    let session = controller(&state).fetch(&session_id).await?;
    Ok(Json(session))
}

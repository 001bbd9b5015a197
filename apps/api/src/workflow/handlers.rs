//! Axum route handlers for the session API.
//!
//! Model-backed operations lock the session only to begin and to complete; the
//! model call itself runs unlocked so reads and resets stay responsive. Call and
//! completion run in a spawned task, so a client hanging up mid-call still leaves
//! the session settled.

use std::collections::HashMap;
use std::future::Future;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::{paginate_with_config, LayoutConfig, Page};
use crate::sessions::{Session, SessionHandle};
use crate::state::AppState;
use crate::workflow::controller::{Completion, Workflow};
use crate::workflow::refine_target::{
    PendingSelection, Rect, RefineTarget, SelectionSnapshot, Viewport,
};
use crate::workflow::view::StepView;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRequest {
    #[serde(default)]
    pub target_role: String,
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRequest {
    /// Absent keeps the answers saved on the review draft.
    #[serde(default)]
    pub answers: Option<HashMap<String, String>>,
    /// Absent keeps the saved selection.
    #[serde(default)]
    pub selected_suggestion_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEditRequest {
    /// Suggestion ids to flip.
    #[serde(default)]
    pub toggle: Vec<String>,
    #[serde(default)]
    pub answers: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineRequest {
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub selected_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRequest {
    pub selection: SelectionSnapshot,
    pub preview_region: Rect,
    pub viewport: Viewport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorResponse {
    pub actionable: bool,
    pub pending: Option<PendingSelection>,
}

/// Session envelope: the step view plus the banner and busy indicator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    #[serde(flatten)]
    pub view: StepView,
    pub error: Option<String>,
    pub busy: bool,
    pub refining: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionView {
    pub fn of(session: &Session, layout: &LayoutConfig) -> Self {
        let state = session.workflow.state();
        Self {
            id: session.id,
            view: StepView::build(&session.workflow, layout),
            error: state.error.clone(),
            busy: session.workflow.is_busy(),
            refining: state.refining,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagesResponse {
    pub content_height: f32,
    pub pages: Vec<Page>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// Turns a completion into the response: the fresh view, or the user-facing
/// failure message. A discarded completion just reports the current state.
fn respond(
    session: &Session,
    completion: Completion,
    layout: &LayoutConfig,
) -> Result<Json<SessionView>, AppError> {
    match completion {
        Completion::Applied | Completion::Discarded => Ok(Json(SessionView::of(session, layout))),
        Completion::Failed { message } => Err(AppError::Service(message)),
    }
}

/// Awaits the model call and applies its outcome inside a spawned task. The
/// handler only waits on the task; dropping the handler future doesn't cancel it.
async fn run_to_completion<T, F, C>(
    handle: SessionHandle,
    call: F,
    complete: C,
) -> Result<Completion, AppError>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
    C: FnOnce(&mut Workflow, T) -> Completion + Send + 'static,
{
    let task = tokio::spawn(async move {
        let outcome = call.await;
        let mut session = handle.lock().await;
        let completion = complete(&mut session.workflow, outcome);
        session.touch();
        completion
    });

    task.await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Model call task failed: {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let handle = state.sessions.create().await;
    let session = handle.lock().await;
    (
        StatusCode::CREATED,
        Json(SessionView::of(&session, &state.config.layout)),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView::of(&session, &state.config.layout)))
}

/// DELETE /api/v1/sessions/:id
///
/// An in-flight request on the session finishes against its own handle and is dropped.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// POST /api/v1/sessions/:id/start
pub async fn handle_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    session.workflow.start()?;
    session.touch();
    Ok(Json(SessionView::of(&session, &state.config.layout)))
}

/// POST /api/v1/sessions/:id/intake
///
/// Runs the analysis and returns the review step, or 502 after rolling back to input.
pub async fn handle_intake(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<IntakeRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;

    let ticket = {
        let mut session = handle.lock().await;
        let ticket = session
            .workflow
            .begin_intake(&request.target_role, &request.resume_text)?;
        session.touch();
        ticket
    };

    let token = ticket.token;
    let optimizer = state.optimizer.clone();
    let completion = run_to_completion(
        handle.clone(),
        async move {
            optimizer
                .analyze(&ticket.resume_text, &ticket.target_role)
                .await
        },
        move |workflow, outcome| workflow.complete_analysis(token, outcome),
    )
    .await?;

    let session = handle.lock().await;
    respond(&session, completion, &state.config.layout)
}

/// PATCH /api/v1/sessions/:id/review
///
/// Saves checkbox and answer edits without submitting.
pub async fn handle_edit_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReviewEditRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    session
        .workflow
        .edit_review(&request.toggle, &request.answers)?;
    session.touch();
    Ok(Json(SessionView::of(&session, &state.config.layout)))
}

/// POST /api/v1/sessions/:id/strategy
///
/// Without an analysis this is a no-op that returns the unchanged session.
pub async fn handle_strategy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StrategyRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;

    let ticket = {
        let mut session = handle.lock().await;
        let ticket = session
            .workflow
            .begin_strategy(
                request.answers.as_ref(),
                request.selected_suggestion_ids.as_deref(),
            )?;
        match ticket {
            Some(ticket) => {
                session.touch();
                ticket
            }
            None => return Ok(Json(SessionView::of(&session, &state.config.layout))),
        }
    };

    let token = ticket.token;
    let optimizer = state.optimizer.clone();
    let completion = run_to_completion(
        handle.clone(),
        async move { optimizer.generate(&ticket.request).await },
        move |workflow, outcome| workflow.complete_generation(token, outcome),
    )
    .await?;

    let session = handle.lock().await;
    respond(&session, completion, &state.config.layout)
}

/// POST /api/v1/sessions/:id/refine
pub async fn handle_refine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;

    let ticket = {
        let mut session = handle.lock().await;
        let ticket = session
            .workflow
            .begin_refine(&request.instruction, &request.selected_text)?;
        session.touch();
        ticket
    };

    let token = ticket.token;
    let optimizer = state.optimizer.clone();
    let completion = run_to_completion(
        handle.clone(),
        async move {
            optimizer
                .refine(&ticket.document, &ticket.instruction, &ticket.selected_text)
                .await
        },
        move |workflow, outcome| workflow.complete_refine(token, outcome),
    )
    .await?;

    let session = handle.lock().await;
    respond(&session, completion, &state.config.layout)
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    session.workflow.reset();
    session.touch();
    Ok(Json(SessionView::of(&session, &state.config.layout)))
}

/// POST /api/v1/sessions/:id/dismiss-error
pub async fn handle_dismiss_error(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    session.workflow.dismiss_error();
    session.touch();
    Ok(Json(SessionView::of(&session, &state.config.layout)))
}

/// GET /api/v1/sessions/:id/pages
///
/// The paginated preview of the current tailored resume.
pub async fn handle_pages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PagesResponse>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;
    let Some(result) = session.workflow.state().final_result.as_ref() else {
        return Err(AppError::Conflict(
            "No tailored resume has been generated yet".to_string(),
        ));
    };

    let layout = &state.config.layout;
    Ok(Json(PagesResponse {
        content_height: layout.content_height,
        pages: paginate_with_config(&result.optimized_resume, layout),
    }))
}

/// POST /api/v1/layout/anchor
///
/// Stateless: where the refine popover goes for a selection, or nothing if the
/// selection isn't inside the preview.
pub async fn handle_anchor(Json(request): Json<AnchorRequest>) -> Json<AnchorResponse> {
    let mut target = RefineTarget::new(request.preview_region, request.viewport);
    let actionable = target.on_selection(&request.selection);
    Json(AnchorResponse {
        actionable,
        pending: target.pending().cloned(),
    })
}

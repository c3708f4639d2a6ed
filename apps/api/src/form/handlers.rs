//! Axum route handlers for the resume form session API.
//!
//! Submit and preview share the same shape: claim the session's generation
//! guard, finalize + validate, run document assembly without holding the
//! store lock, then release the guard. Validation failure performs neither
//! assembly nor download.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::store::SessionStore;
use crate::form::{SectionList, SessionView};
use crate::models::resume::{Contact, ResumeRecord};
use crate::pdf::assemble_document;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SummaryUpdate {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct EntryCreated {
    pub key: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewGenerated {
    pub size: usize,
    /// True when a previously stored artifact was released to make room.
    pub replaced_previous: bool,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// Download name: whitespace runs in the full name collapse to single
/// underscores, suffixed `_Resume.pdf`.
pub fn download_filename(full_name: &str) -> String {
    let underscored = full_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{underscored}_Resume.pdf")
}

/// Claims the generation guard and finalizes the draft in one locked step.
/// The guard is released on validation failure; on success the caller owns
/// it until assembly completes.
fn begin_and_finalize(sessions: &SessionStore, id: Uuid) -> Result<ResumeRecord, AppError> {
    sessions
        .with_session(id, |session| {
            if !session.begin_generation() {
                return Err(AppError::Conflict(
                    "Document generation is already in progress for this session".to_string(),
                ));
            }
            session.finalize().map_err(|fields| {
                session.end_generation();
                AppError::Fields(fields)
            })
        })
        .ok_or_else(|| not_found(id))?
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let view = state.sessions.create();
    info!("Created form session {}", view.id);
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .with_session(id, |s| s.view())
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// DELETE /api/v1/sessions/:id
///
/// Discards the session and drops its preview artifact with it.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id) {
        info!("Discarded form session {id}");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// PUT /api/v1/sessions/:id/contact
pub async fn handle_set_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(contact): Json<Contact>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .with_session(id, |s| s.set_contact(contact))
        .ok_or_else(|| not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/summary
pub async fn handle_set_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<SummaryUpdate>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .with_session(id, |s| s.set_summary(update.summary))
        .ok_or_else(|| not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/:list/entries
pub async fn handle_append_entry(
    State(state): State<AppState>,
    Path((id, list)): Path<(Uuid, SectionList)>,
) -> Result<(StatusCode, Json<EntryCreated>), AppError> {
    let key = state
        .sessions
        .with_session(id, |s| s.append_entry(list))
        .ok_or_else(|| not_found(id))?;
    Ok((StatusCode::CREATED, Json(EntryCreated { key })))
}

/// PUT /api/v1/sessions/:id/:list/entries/:index
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path((id, list, index)): Path<(Uuid, SectionList, usize)>,
    Json(value): Json<Value>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .with_session(id, |s| s.update_entry(list, index, value))
        .ok_or_else(|| not_found(id))??;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/sessions/:id/:list/entries/:index
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((id, list, index)): Path<(Uuid, SectionList, usize)>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .with_session(id, |s| s.remove_entry(list, index))
        .ok_or_else(|| not_found(id))??;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/submit
///
/// Full validation, document assembly, then the artifact as an attachment
/// download named `<FullName_With_Underscores>_Resume.pdf`.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let record = begin_and_finalize(&state.sessions, id)?;
    let filename = download_filename(&record.contact.full_name);

    let result = assemble_document(record, state.summarizer.as_ref()).await;
    state.sessions.with_session(id, |s| s.end_generation());

    let artifact = result.map_err(AppError::from)?;
    info!(
        "Assembled resume download ({} bytes) for session {id}",
        artifact.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        artifact,
    )
        .into_response())
}

/// POST /api/v1/sessions/:id/preview
///
/// Same validation and assembly as submit, but the artifact lands in the
/// session's single preview slot — releasing the previous artifact first —
/// and is fetched inline via GET.
pub async fn handle_generate_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreviewGenerated>, AppError> {
    let record = begin_and_finalize(&state.sessions, id)?;

    let result = assemble_document(record, state.summarizer.as_ref()).await;

    let outcome = state
        .sessions
        .with_session(id, |session| {
            session.end_generation();
            result.map(|artifact| {
                let size = artifact.len();
                let replaced_previous = session.store_preview(artifact);
                if replaced_previous {
                    debug!("Released previous preview artifact for session {id}");
                }
                PreviewGenerated {
                    size,
                    replaced_previous,
                }
            })
        })
        .ok_or_else(|| not_found(id))?;

    let generated = outcome.map_err(AppError::from)?;
    info!(
        "Stored preview artifact ({} bytes) for session {id}",
        generated.size
    );
    Ok(Json(generated))
}

/// GET /api/v1/sessions/:id/preview
pub async fn handle_get_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let artifact = state
        .sessions
        .with_session(id, |s| s.preview())
        .ok_or_else(|| not_found(id))?
        .ok_or_else(|| {
            AppError::NotFound("No preview has been generated for this session".to_string())
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, "inline".to_string()),
        ],
        artifact,
    )
        .into_response())
}

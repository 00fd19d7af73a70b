use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{CreateNoteDto, NoteResponse, UpdateNoteDto};
use super::service::NoteService;

/// List a student's notes
#[utoipa::path(
    get,
    path = "/api/students/{student_id}/notes",
    params(("student_id" = Uuid, Path, description = "Student row ID")),
    responses(
        (status = 200, description = "Notes for the student", body = [NoteResponse]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student Notes"
)]
#[instrument(skip(state))]
pub async fn list_notes(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<NoteResponse>>, AppError> {
    let notes = NoteService::list_for_student(&state.db, student_id).await?;
    Ok(Json(notes))
}

/// Add a note to a student
#[utoipa::path(
    post,
    path = "/api/students/{student_id}/notes",
    params(("student_id" = Uuid, Path, description = "Student row ID")),
    request_body = CreateNoteDto,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student Notes"
)]
#[instrument(skip(state, dto))]
pub async fn create_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(student_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateNoteDto>,
) -> Result<(StatusCode, Json<NoteResponse>), AppError> {
    let created_by = auth_user.user_id()?;
    let note = NoteService::create(&state.db, student_id, dto, created_by).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// Get a single note
#[utoipa::path(
    get,
    path = "/api/students/{student_id}/notes/{note_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student row ID"),
        ("note_id" = Uuid, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note", body = NoteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student Notes"
)]
#[instrument(skip(state))]
pub async fn get_note(
    State(state): State<AppState>,
    Path((student_id, note_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<NoteResponse>, AppError> {
    let note = NoteService::get(&state.db, student_id, note_id).await?;
    Ok(Json(note))
}

/// Update a note
#[utoipa::path(
    patch,
    path = "/api/students/{student_id}/notes/{note_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student row ID"),
        ("note_id" = Uuid, Path, description = "Note ID")
    ),
    request_body = UpdateNoteDto,
    responses(
        (status = 200, description = "Updated note", body = NoteResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student Notes"
)]
#[instrument(skip(state, dto))]
pub async fn update_note(
    State(state): State<AppState>,
    Path((student_id, note_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateNoteDto>,
) -> Result<Json<NoteResponse>, AppError> {
    let note = NoteService::update(&state.db, student_id, note_id, dto).await?;
    Ok(Json(note))
}

/// Delete a note
#[utoipa::path(
    delete,
    path = "/api/students/{student_id}/notes/{note_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student row ID"),
        ("note_id" = Uuid, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student Notes"
)]
#[instrument(skip(state))]
pub async fn delete_note(
    State(state): State<AppState>,
    Path((student_id, note_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    NoteService::delete(&state.db, student_id, note_id).await?;
    Ok(Json(
        serde_json::json!({"message": "Note deleted successfully"}),
    ))
}

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

use super::model::{CreateDocumentDto, DocumentResponse, UpdateDocumentDto};
use super::service::DocumentService;

/// List a student's documents
#[utoipa::path(
    get,
    path = "/api/students/{student_id}/documents",
    params(("student_id" = Uuid, Path, description = "Student row ID")),
    responses(
        (status = 200, description = "Documents for the student", body = [DocumentResponse]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student Documents"
)]
#[instrument(skip(state))]
pub async fn list_documents(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<DocumentResponse>>, AppError> {
    let documents = DocumentService::list_for_student(&state.db, student_id).await?;
    Ok(Json(documents))
}

/// Attach a document record to a student
#[utoipa::path(
    post,
    path = "/api/students/{student_id}/documents",
    params(("student_id" = Uuid, Path, description = "Student row ID")),
    request_body = CreateDocumentDto,
    responses(
        (status = 201, description = "Document created", body = DocumentResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student Documents"
)]
#[instrument(skip(state, dto))]
pub async fn create_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(student_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateDocumentDto>,
) -> Result<(StatusCode, Json<DocumentResponse>), AppError> {
    let uploaded_by = auth_user.user_id()?;
    let document = DocumentService::create(&state.db, student_id, dto, uploaded_by).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// Get a single document
#[utoipa::path(
    get,
    path = "/api/students/{student_id}/documents/{document_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student row ID"),
        ("document_id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document", body = DocumentResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student Documents"
)]
#[instrument(skip(state))]
pub async fn get_document(
    State(state): State<AppState>,
    Path((student_id, document_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = DocumentService::get(&state.db, student_id, document_id).await?;
    Ok(Json(document))
}

/// Update a document record
#[utoipa::path(
    patch,
    path = "/api/students/{student_id}/documents/{document_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student row ID"),
        ("document_id" = Uuid, Path, description = "Document ID")
    ),
    request_body = UpdateDocumentDto,
    responses(
        (status = 200, description = "Updated document", body = DocumentResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student Documents"
)]
#[instrument(skip(state, dto))]
pub async fn update_document(
    State(state): State<AppState>,
    Path((student_id, document_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateDocumentDto>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = DocumentService::update(&state.db, student_id, document_id, dto).await?;
    Ok(Json(document))
}

/// Delete a document record
#[utoipa::path(
    delete,
    path = "/api/students/{student_id}/documents/{document_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student row ID"),
        ("document_id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student Documents"
)]
#[instrument(skip(state))]
pub async fn delete_document(
    State(state): State<AppState>,
    Path((student_id, document_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    DocumentService::delete(&state.db, student_id, document_id).await?;
    Ok(Json(
        serde_json::json!({"message": "Document deleted successfully"}),
    ))
}

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PaginationMeta, PaginationParams};
use crate::validator::ValidatedJson;

use super::model::{
    BulkStatusUpdateRequest, BulkStatusUpdateResponse, CreateStudentDto, PaginatedStudentsResponse,
    QuickInfoResponse, Student, StudentDetailResponse, StudentFilterParams, StudentSearchRequest,
    StudentStatsResponse, StudentStatus, StudentSummary, UpdateStudentDto,
};
use super::service::StudentService;

fn to_page(students: Vec<Student>, total: i64, pagination: &PaginationParams) -> PaginatedStudentsResponse {
    let today = Utc::now().date_naive();
    PaginatedStudentsResponse {
        data: students
            .iter()
            .map(|s| StudentSummary::from_student(s, today))
            .collect(),
        meta: PaginationMeta::new(total, pagination),
    }
}

/// List students with optional filters
#[utoipa::path(
    get,
    path = "/api/students",
    params(
        ("status" = Option<String>, Query, description = "Filter by lifecycle status"),
        ("current_class" = Option<String>, Query, description = "Filter by class"),
        ("section" = Option<String>, Query, description = "Filter by section"),
        ("gender" = Option<String>, Query, description = "Filter by gender (M/F/O)"),
        ("enrollment_status" = Option<bool>, Query, description = "Filter by enrollment flag"),
        ("search" = Option<String>, Query, description = "Free-text search"),
        ("ordering" = Option<String>, Query, description = "Ordering column, prefix with '-' for descending"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)"),
        ("page" = Option<i64>, Query, description = "Page number")
    ),
    responses(
        (status = 200, description = "Paginated list of students", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, params))]
pub async fn get_students(
    State(state): State<AppState>,
    Query(params): Query<StudentFilterParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let (students, total) = StudentService::list_students(&state.db, &params).await?;
    Ok(Json(to_page(students, total, &params.pagination)))
}

/// Create a new student
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Validation error or duplicate email/ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let created_by = auth_user.user_id()?;
    let student = StudentService::create_student(&state.db, dto, Some(created_by)).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// Get full student details
#[utoipa::path(
    get,
    path = "/api/students/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student row ID")),
    responses(
        (status = 200, description = "Student details", body = StudentDetailResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<StudentDetailResponse>, AppError> {
    let detail = StudentService::get_student_detail(&state.db, student_id).await?;
    Ok(Json(detail))
}

/// Update a student (partial; provided fields only)
#[utoipa::path(
    patch,
    path = "/api/students/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student row ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Validation error or duplicate email", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(student_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let updated_by = auth_user.user_id()?;
    let student = StudentService::update_student(&state.db, student_id, dto, updated_by).await?;
    Ok(Json(student))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/api/students/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student row ID")),
    responses(
        (status = 200, description = "Student deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    StudentService::delete_student(&state.db, student_id).await?;
    Ok(Json(
        serde_json::json!({"message": "Student deleted successfully"}),
    ))
}

/// Student statistics
#[utoipa::path(
    get,
    path = "/api/students/stats",
    responses(
        (status = 200, description = "Aggregate statistics", body = StudentStatsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student_stats(
    State(state): State<AppState>,
) -> Result<Json<StudentStatsResponse>, AppError> {
    let stats = StudentService::stats(&state.db).await?;
    Ok(Json(stats))
}

/// Advanced student search
#[utoipa::path(
    post,
    path = "/api/students/search",
    request_body = StudentSearchRequest,
    responses(
        (status = 200, description = "Matching students", body = PaginatedStudentsResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, req))]
pub async fn search_students(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<StudentSearchRequest>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let (students, total) = StudentService::search(&state.db, &req).await?;
    Ok(Json(to_page(students, total, &req.pagination())))
}

/// Students admitted in the last 30 days
#[utoipa::path(
    get,
    path = "/api/students/recent-admissions",
    responses(
        (status = 200, description = "Recently admitted students", body = [StudentSummary]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_recent_admissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentSummary>>, AppError> {
    let students = StudentService::recent_admissions(&state.db).await?;
    let today = Utc::now().date_naive();
    Ok(Json(
        students
            .iter()
            .map(|s| StudentSummary::from_student(s, today))
            .collect(),
    ))
}

/// Students with a specific lifecycle status
#[utoipa::path(
    get,
    path = "/api/students/status/{status_type}",
    params(
        ("status_type" = String, Path, description = "One of the enumerated statuses"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)"),
        ("page" = Option<i64>, Query, description = "Page number")
    ),
    responses(
        (status = 200, description = "Students with the given status", body = PaginatedStudentsResponse),
        (status = 400, description = "Status outside the enumerated set", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, pagination))]
pub async fn get_students_by_status(
    State(state): State<AppState>,
    Path(status_type): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let status = StudentStatus::parse(&status_type).ok_or_else(|| {
        let valid: Vec<&str> = StudentStatus::ALL.iter().map(|s| s.as_str()).collect();
        AppError::bad_request(format!(
            "Invalid status. Valid options: {:?}",
            valid
        ))
    })?;

    let (students, total) = StudentService::by_status(&state.db, status, &pagination).await?;
    Ok(Json(to_page(students, total, &pagination)))
}

/// Students in a specific class
#[utoipa::path(
    get,
    path = "/api/students/class/{class_name}",
    params(
        ("class_name" = String, Path, description = "Class name (case-insensitive)"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)"),
        ("page" = Option<i64>, Query, description = "Page number")
    ),
    responses(
        (status = 200, description = "Students in the class", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, pagination))]
pub async fn get_students_by_class(
    State(state): State<AppState>,
    Path(class_name): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let (students, total) = StudentService::by_class(&state.db, &class_name, &pagination).await?;
    Ok(Json(to_page(students, total, &pagination)))
}

/// Bulk status update
#[utoipa::path(
    post,
    path = "/api/students/bulk/update-status",
    request_body = BulkStatusUpdateRequest,
    responses(
        (status = 200, description = "Statuses updated", body = BulkStatusUpdateResponse),
        (status = 400, description = "Empty ID list or invalid status", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, req))]
pub async fn bulk_update_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<BulkStatusUpdateRequest>,
) -> Result<Json<BulkStatusUpdateResponse>, AppError> {
    let updated_by = auth_user.user_id()?;
    let updated_count = StudentService::bulk_update_status(&state.db, &req, updated_by).await?;

    Ok(Json(BulkStatusUpdateResponse {
        message: format!("Successfully updated {} students", updated_count),
        updated_count,
    }))
}

/// Quick student info by human-readable identifier
#[utoipa::path(
    get,
    path = "/api/students/quick-info/{student_id}",
    params(("student_id" = String, Path, description = "Human-readable identifier, e.g. STU20240001")),
    responses(
        (status = 200, description = "Compact student info", body = QuickInfoResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_quick_info(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<QuickInfoResponse>, AppError> {
    let info = StudentService::quick_info(&state.db, &student_id).await?;
    Ok(Json(info))
}

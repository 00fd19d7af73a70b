use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    ChangePasswordDto, LoginRequest, LoginResponse, MessageResponse, RefreshRequest,
    RefreshResponse, RegisterRequestDto, ResetPasswordConfirmRequest, ResetPasswordEmailRequest,
};
use crate::modules::documents::model::{
    CreateDocumentDto, DocumentResponse, DocumentType, UpdateDocumentDto,
};
use crate::modules::health::controller::{HealthChecks, HealthResponse};
use crate::modules::notes::model::{CreateNoteDto, NoteResponse, NoteType, UpdateNoteDto};
use crate::modules::students::model::{
    BulkStatusUpdateRequest, BulkStatusUpdateResponse, CreateStudentDto, EmergencyContact, Gender,
    PaginatedStudentsResponse, QuickInfoResponse, Student, StudentDetailResponse,
    StudentStatsResponse, StudentStatus, StudentSummary, UpdateStudentDto,
};
use crate::modules::users::model::{
    PaginatedUsersResponse, Profile, ProfileResponse, UpdateProfileDto, UpdateUserDto, User,
    UserRole,
};
use crate::utils::pagination::PaginationMeta;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::verify_email,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::change_password,
        crate::modules::auth::controller::request_password_reset,
        crate::modules::auth::controller::confirm_password_reset,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::update_me,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::list_users,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::get_student_stats,
        crate::modules::students::controller::search_students,
        crate::modules::students::controller::get_recent_admissions,
        crate::modules::students::controller::get_students_by_status,
        crate::modules::students::controller::get_students_by_class,
        crate::modules::students::controller::bulk_update_status,
        crate::modules::students::controller::get_quick_info,
        crate::modules::documents::controller::list_documents,
        crate::modules::documents::controller::create_document,
        crate::modules::documents::controller::get_document,
        crate::modules::documents::controller::update_document,
        crate::modules::documents::controller::delete_document,
        crate::modules::notes::controller::list_notes,
        crate::modules::notes::controller::create_note,
        crate::modules::notes::controller::get_note,
        crate::modules::notes::controller::update_note,
        crate::modules::notes::controller::delete_note,
        crate::modules::health::controller::health_check,
    ),
    components(
        schemas(
            User,
            UserRole,
            UpdateUserDto,
            Profile,
            UpdateProfileDto,
            ProfileResponse,
            PaginatedUsersResponse,
            RegisterRequestDto,
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            RefreshResponse,
            ChangePasswordDto,
            ResetPasswordEmailRequest,
            ResetPasswordConfirmRequest,
            MessageResponse,
            ErrorResponse,
            Student,
            StudentStatus,
            Gender,
            StudentSummary,
            StudentDetailResponse,
            CreateStudentDto,
            UpdateStudentDto,
            StudentStatsResponse,
            BulkStatusUpdateRequest,
            BulkStatusUpdateResponse,
            QuickInfoResponse,
            EmergencyContact,
            PaginatedStudentsResponse,
            PaginationMeta,
            DocumentType,
            DocumentResponse,
            CreateDocumentDto,
            UpdateDocumentDto,
            NoteType,
            NoteResponse,
            CreateNoteDto,
            UpdateNoteDto,
            HealthResponse,
            HealthChecks,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, verification and token endpoints"),
        (name = "Users", description = "User self-service and admin listing"),
        (name = "Students", description = "Student record management"),
        (name = "Student Documents", description = "Document attachments"),
        (name = "Student Notes", description = "Note attachments"),
        (name = "Health", description = "Service health")
    ),
    info(
        title = "Slate API",
        version = "0.1.0",
        description = "School management REST API built with Rust, Axum, and PostgreSQL featuring JWT-based authentication.",
        contact(
            name = "API Support",
            email = "support@slate-school.io"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

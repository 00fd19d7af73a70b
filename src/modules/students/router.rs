use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::documents::router::init_documents_router;
use crate::modules::notes::router::init_notes_router;
use crate::state::AppState;

use super::controller::{
    bulk_update_status, create_student, delete_student, get_quick_info, get_recent_admissions,
    get_student, get_student_stats, get_students, get_students_by_class, get_students_by_status,
    search_students, update_student,
};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students).post(create_student))
        .route("/stats", get(get_student_stats))
        .route("/search", post(search_students))
        .route("/recent-admissions", get(get_recent_admissions))
        .route("/status/{status_type}", get(get_students_by_status))
        .route("/class/{class_name}", get(get_students_by_class))
        .route("/bulk/update-status", post(bulk_update_status))
        .route("/quick-info/{student_id}", get(get_quick_info))
        .route(
            "/{student_id}",
            get(get_student)
                .put(update_student)
                .patch(update_student)
                .delete(delete_student),
        )
        .nest("/{student_id}/documents", init_documents_router())
        .nest("/{student_id}/notes", init_notes_router())
}

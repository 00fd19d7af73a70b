use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_note, delete_note, get_note, list_notes, update_note};

/// Nested under `/api/students/{student_id}/notes`.
pub fn init_notes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route(
            "/{note_id}",
            get(get_note).patch(update_note).delete(delete_note),
        )
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum NoteType {
    Academic,
    Behavioral,
    Medical,
    General,
    Disciplinary,
}

/// A note on a student with the author's name joined in.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct NoteResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub note_type: NoteType,
    pub title: String,
    pub content: String,
    pub is_confidential: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub created_by: Option<Uuid>,
    pub created_by_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateNoteDto {
    pub note_type: NoteType,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    pub is_confidential: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateNoteDto {
    pub note_type: Option<NoteType>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub is_confidential: Option<bool>,
}

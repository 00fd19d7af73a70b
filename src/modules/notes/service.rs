use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{CreateNoteDto, NoteResponse, UpdateNoteDto};

const NOTE_SELECT: &str = "SELECT n.id, n.student_id, n.note_type, n.title, n.content, \
     n.is_confidential, n.created_at, n.created_by, \
     TRIM(u.first_name || ' ' || u.last_name) AS created_by_name \
     FROM student_notes n LEFT JOIN users u ON u.id = n.created_by";

pub struct NoteService;

impl NoteService {
    #[instrument(skip(db))]
    pub async fn list_for_student(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<NoteResponse>, AppError> {
        let sql = format!(
            "{} WHERE n.student_id = $1 ORDER BY n.created_at DESC",
            NOTE_SELECT
        );
        let notes = sqlx::query_as::<_, NoteResponse>(&sql)
            .bind(student_id)
            .fetch_all(db)
            .await?;

        Ok(notes)
    }

    #[instrument(skip(db, dto))]
    pub async fn create(
        db: &PgPool,
        student_id: Uuid,
        dto: CreateNoteDto,
        created_by: Uuid,
    ) -> Result<NoteResponse, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)",
        )
        .bind(student_id)
        .fetch_one(db)
        .await?;
        if !exists {
            return Err(AppError::not_found("Student not found".to_string()));
        }

        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO student_notes \
             (student_id, note_type, title, content, is_confidential, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(student_id)
        .bind(dto.note_type)
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(dto.is_confidential)
        .bind(created_by)
        .fetch_one(db)
        .await?;

        Self::get(db, student_id, id).await
    }

    #[instrument(skip(db))]
    pub async fn get(
        db: &PgPool,
        student_id: Uuid,
        note_id: Uuid,
    ) -> Result<NoteResponse, AppError> {
        let sql = format!("{} WHERE n.id = $1 AND n.student_id = $2", NOTE_SELECT);
        let note = sqlx::query_as::<_, NoteResponse>(&sql)
            .bind(note_id)
            .bind(student_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Note not found".to_string()))?;

        Ok(note)
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        student_id: Uuid,
        note_id: Uuid,
        dto: UpdateNoteDto,
    ) -> Result<NoteResponse, AppError> {
        let updated = sqlx::query(
            "UPDATE student_notes SET \
                note_type = COALESCE($1, note_type), \
                title = COALESCE($2, title), \
                content = COALESCE($3, content), \
                is_confidential = COALESCE($4, is_confidential) \
             WHERE id = $5 AND student_id = $6",
        )
        .bind(dto.note_type)
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(dto.is_confidential)
        .bind(note_id)
        .bind(student_id)
        .execute(db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found("Note not found".to_string()));
        }

        Self::get(db, student_id, note_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, student_id: Uuid, note_id: Uuid) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM student_notes WHERE id = $1 AND student_id = $2")
                .bind(note_id)
                .bind(student_id)
                .execute(db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Note not found".to_string()));
        }

        Ok(())
    }
}

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{CreateDocumentDto, DocumentResponse, UpdateDocumentDto};

const DOCUMENT_SELECT: &str = "SELECT d.id, d.student_id, d.document_type, d.title, d.file_path, \
     d.description, d.uploaded_at, d.uploaded_by, \
     TRIM(u.first_name || ' ' || u.last_name) AS uploaded_by_name \
     FROM student_documents d LEFT JOIN users u ON u.id = d.uploaded_by";

pub struct DocumentService;

impl DocumentService {
    #[instrument(skip(db))]
    pub async fn list_for_student(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<DocumentResponse>, AppError> {
        let sql = format!(
            "{} WHERE d.student_id = $1 ORDER BY d.uploaded_at DESC",
            DOCUMENT_SELECT
        );
        let documents = sqlx::query_as::<_, DocumentResponse>(&sql)
            .bind(student_id)
            .fetch_all(db)
            .await?;

        Ok(documents)
    }

    #[instrument(skip(db, dto))]
    pub async fn create(
        db: &PgPool,
        student_id: Uuid,
        dto: CreateDocumentDto,
        uploaded_by: Uuid,
    ) -> Result<DocumentResponse, AppError> {
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
            "INSERT INTO student_documents \
             (student_id, document_type, title, file_path, description, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(student_id)
        .bind(dto.document_type)
        .bind(&dto.title)
        .bind(&dto.file_path)
        .bind(&dto.description)
        .bind(uploaded_by)
        .fetch_one(db)
        .await?;

        Self::get(db, student_id, id).await
    }

    #[instrument(skip(db))]
    pub async fn get(
        db: &PgPool,
        student_id: Uuid,
        document_id: Uuid,
    ) -> Result<DocumentResponse, AppError> {
        let sql = format!("{} WHERE d.id = $1 AND d.student_id = $2", DOCUMENT_SELECT);
        let document = sqlx::query_as::<_, DocumentResponse>(&sql)
            .bind(document_id)
            .bind(student_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found".to_string()))?;

        Ok(document)
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        student_id: Uuid,
        document_id: Uuid,
        dto: UpdateDocumentDto,
    ) -> Result<DocumentResponse, AppError> {
        let updated = sqlx::query(
            "UPDATE student_documents SET \
                document_type = COALESCE($1, document_type), \
                title = COALESCE($2, title), \
                file_path = COALESCE($3, file_path), \
                description = COALESCE($4, description) \
             WHERE id = $5 AND student_id = $6",
        )
        .bind(dto.document_type)
        .bind(&dto.title)
        .bind(&dto.file_path)
        .bind(&dto.description)
        .bind(document_id)
        .bind(student_id)
        .execute(db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found("Document not found".to_string()));
        }

        Self::get(db, student_id, document_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete(
        db: &PgPool,
        student_id: Uuid,
        document_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM student_documents WHERE id = $1 AND student_id = $2",
        )
        .bind(document_id)
        .bind(student_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Document not found".to_string()));
        }

        Ok(())
    }
}

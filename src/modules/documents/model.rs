use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum DocumentType {
    BirthCertificate,
    PreviousSchoolReport,
    MedicalReport,
    Passport,
    Visa,
    Other,
}

/// A stored document record with the uploader's name joined in.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub document_type: DocumentType,
    pub title: String,
    pub file_path: String,
    pub description: Option<String>,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    pub uploaded_by: Option<Uuid>,
    pub uploaded_by_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDocumentDto {
    pub document_type: DocumentType,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub file_path: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentDto {
    pub document_type: Option<DocumentType>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub file_path: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_serde_values() {
        assert_eq!(
            serde_json::to_string(&DocumentType::BirthCertificate).unwrap(),
            "\"birth_certificate\""
        );
        assert_eq!(
            serde_json::to_string(&DocumentType::PreviousSchoolReport).unwrap(),
            "\"previous_school_report\""
        );
        assert_eq!(serde_json::to_string(&DocumentType::Other).unwrap(), "\"other\"");
        assert!(serde_json::from_str::<DocumentType>("\"diploma\"").is_err());
    }
}

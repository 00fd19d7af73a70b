//! Student data models, DTOs and the computed helpers the serializers expose.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::documents::model::DocumentResponse;
use crate::modules::notes::model::NoteResponse;
use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// Lifecycle status of a student record. Distinct from `enrollment_status`,
/// which flags active school enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Inactive,
    Graduated,
    Transferred,
    Suspended,
    Expelled,
}

impl StudentStatus {
    pub const ALL: [StudentStatus; 6] = [
        Self::Active,
        Self::Inactive,
        Self::Graduated,
        Self::Transferred,
        Self::Suspended,
        Self::Expelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Graduated => "graduated",
            Self::Transferred => "transferred",
            Self::Suspended => "suspended",
            Self::Expelled => "expelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum Gender {
    #[serde(rename = "M")]
    #[sqlx(rename = "M")]
    Male,
    #[serde(rename = "F")]
    #[sqlx(rename = "F")]
    Female,
    #[serde(rename = "O")]
    #[sqlx(rename = "O")]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Other => "O",
        }
    }
}

/// Age in whole years on `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Buckets an age into the six reporting ranges. Anything outside 3..=17
/// lands in `18+`.
pub fn age_bucket(age: i32) -> &'static str {
    match age {
        3..=5 => "3-5",
        6..=8 => "6-8",
        9..=11 => "9-11",
        12..=14 => "12-14",
        15..=17 => "15-17",
        _ => "18+",
    }
}

/// A student record.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub student_id: String,
    pub user_id: Option<Uuid>,

    // Personal information
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub blood_group: Option<String>,
    pub nationality: String,
    pub religion: Option<String>,

    // Contact information
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relationship: String,

    // Address
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub county: String,
    pub postal_code: String,
    pub country: String,

    // Academic information
    pub admission_date: NaiveDate,
    pub current_class: String,
    pub academic_year: String,
    pub roll_number: Option<String>,
    pub section: Option<String>,

    // Status
    pub status: StudentStatus,
    pub enrollment_status: bool,
    pub graduation_date: Option<NaiveDate>,

    // Parent / guardian information
    pub father_name: Option<String>,
    pub father_phone: Option<String>,
    pub father_email: Option<String>,
    pub father_occupation: Option<String>,
    pub mother_name: Option<String>,
    pub mother_phone: Option<String>,
    pub mother_email: Option<String>,
    pub mother_occupation: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub guardian_email: Option<String>,
    pub guardian_relationship: Option<String>,

    // Medical information
    pub medical_conditions: Option<String>,
    pub medications: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_phone: Option<String>,

    // Additional
    pub profile_picture: Option<String>,
    pub notes: Option<String>,

    // Audit
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
}

impl Student {
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }

    pub fn age(&self, today: NaiveDate) -> i32 {
        age_on(self.date_of_birth, today)
    }

    /// Active lifecycle status AND currently enrolled.
    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active && self.enrollment_status
    }

    pub fn primary_contact(&self) -> EmergencyContact {
        EmergencyContact {
            name: self.emergency_contact_name.clone(),
            phone: self.emergency_contact_phone.clone(),
            relationship: self.emergency_contact_relationship.clone(),
        }
    }

    pub fn formatted_address(&self) -> String {
        let mut parts = vec![self.address_line_1.clone()];
        if let Some(line2) = &self.address_line_2 {
            parts.push(line2.clone());
        }
        parts.push(self.city.clone());
        parts.push(self.county.clone());
        parts.push(self.postal_code.clone());
        parts.push(self.country.clone());
        parts.join(", ")
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

/// Lightweight student representation for list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentSummary {
    pub id: Uuid,
    pub student_id: String,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub current_class: String,
    pub section: Option<String>,
    pub status: StudentStatus,
    pub admission_date: NaiveDate,
    pub age: i32,
    pub is_active: bool,
    pub profile_picture: Option<String>,
}

impl StudentSummary {
    pub fn from_student(student: &Student, today: NaiveDate) -> Self {
        Self {
            id: student.id,
            student_id: student.student_id.clone(),
            full_name: student.full_name(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
            phone_number: student.phone_number.clone(),
            current_class: student.current_class.clone(),
            section: student.section.clone(),
            status: student.status,
            admission_date: student.admission_date,
            age: student.age(today),
            is_active: student.is_active(),
            profile_picture: student.profile_picture.clone(),
        }
    }
}

/// Full student detail: every stored field plus computed values, related
/// attachments, linked-user state and auditor names.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDetailResponse {
    #[serde(flatten)]
    pub student: Student,
    pub full_name: String,
    pub age: i32,
    pub is_active: bool,
    pub formatted_address: String,
    pub primary_contact: EmergencyContact,
    pub documents: Vec<DocumentResponse>,
    pub student_notes: Vec<NoteResponse>,
    pub user_email: Option<String>,
    pub user_is_active: Option<bool>,
    pub created_by_name: Option<String>,
    pub updated_by_name: Option<String>,
}

fn default_nationality() -> String {
    "British".to_string()
}

fn default_country() -> String {
    "United Kingdom".to_string()
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    /// Provided identifiers are kept; omitted ones are generated as
    /// `STU<year><seq>`.
    pub student_id: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(length(max = 50))]
    pub middle_name: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub blood_group: Option<String>,
    #[serde(default = "default_nationality")]
    pub nationality: String,
    pub religion: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 17))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub emergency_contact_name: String,
    #[validate(length(min = 1, max = 17))]
    pub emergency_contact_phone: String,
    #[validate(length(min = 1, max = 50))]
    pub emergency_contact_relationship: String,

    #[validate(length(min = 1, max = 255))]
    pub address_line_1: String,
    #[validate(length(max = 255))]
    pub address_line_2: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub county: String,
    #[validate(length(min = 1, max = 10))]
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,

    pub admission_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 20))]
    pub current_class: String,
    #[validate(length(min = 1, max = 9))]
    pub academic_year: String,
    #[validate(length(max = 20))]
    pub roll_number: Option<String>,
    #[validate(length(max = 10))]
    pub section: Option<String>,

    pub father_name: Option<String>,
    pub father_phone: Option<String>,
    #[validate(email)]
    pub father_email: Option<String>,
    pub father_occupation: Option<String>,
    pub mother_name: Option<String>,
    pub mother_phone: Option<String>,
    #[validate(email)]
    pub mother_email: Option<String>,
    pub mother_occupation: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    #[validate(email)]
    pub guardian_email: Option<String>,
    pub guardian_relationship: Option<String>,

    pub medical_conditions: Option<String>,
    pub medications: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_phone: Option<String>,

    pub profile_picture: Option<String>,
    pub notes: Option<String>,
}

/// Partial update; only provided fields change.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub blood_group: Option<String>,
    pub nationality: Option<String>,
    pub religion: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,

    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,

    pub current_class: Option<String>,
    pub academic_year: Option<String>,
    pub roll_number: Option<String>,
    pub section: Option<String>,

    pub status: Option<StudentStatus>,
    pub enrollment_status: Option<bool>,
    pub graduation_date: Option<NaiveDate>,

    pub father_name: Option<String>,
    pub father_phone: Option<String>,
    #[validate(email)]
    pub father_email: Option<String>,
    pub father_occupation: Option<String>,
    pub mother_name: Option<String>,
    pub mother_phone: Option<String>,
    #[validate(email)]
    pub mother_email: Option<String>,
    pub mother_occupation: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    #[validate(email)]
    pub guardian_email: Option<String>,
    pub guardian_relationship: Option<String>,

    pub medical_conditions: Option<String>,
    pub medications: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_phone: Option<String>,

    pub profile_picture: Option<String>,
    pub notes: Option<String>,
}

// Query-string booleans arrive as strings.
fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref() {
        None | Some("") => Ok(None),
        Some("true") | Some("1") => Ok(Some(true)),
        Some("false") | Some("0") => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid boolean: {}",
            other
        ))),
    }
}

/// Query parameters for the student list endpoint. All filters are optional
/// and AND together.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StudentFilterParams {
    pub status: Option<StudentStatus>,
    pub current_class: Option<String>,
    pub section: Option<String>,
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub enrollment_status: Option<bool>,
    /// Free-text search over name, student id, email and phone number.
    pub search: Option<String>,
    pub ordering: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Body of the advanced search endpoint.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct StudentSearchRequest {
    pub query: Option<String>,
    pub status: Option<StudentStatus>,
    pub current_class: Option<String>,
    pub section: Option<String>,
    pub gender: Option<Gender>,
    pub admission_date_from: Option<NaiveDate>,
    pub admission_date_to: Option<NaiveDate>,
    #[validate(range(min = 0))]
    pub age_from: Option<i32>,
    #[validate(range(min = 0))]
    pub age_to: Option<i32>,
    pub ordering: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl StudentSearchRequest {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            limit: self.page_size,
            offset: None,
            page: self.page,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkStatusUpdateRequest {
    #[validate(length(min = 1, message = "student_ids is required"))]
    pub student_ids: Vec<Uuid>,
    pub status: StudentStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkStatusUpdateResponse {
    pub message: String,
    pub updated_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentStatsResponse {
    pub total_students: i64,
    pub active_students: i64,
    pub inactive_students: i64,
    pub graduated_students: i64,
    pub new_admissions_this_month: i64,
    pub students_by_class: std::collections::HashMap<String, i64>,
    pub students_by_status: std::collections::HashMap<String, i64>,
    pub gender_distribution: std::collections::HashMap<String, i64>,
    pub age_distribution: std::collections::HashMap<String, i64>,
}

/// Compact representation for popups/tooltips.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuickInfoResponse {
    pub id: Uuid,
    pub student_id: String,
    pub full_name: String,
    pub current_class: String,
    pub section: Option<String>,
    pub status: StudentStatus,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub emergency_contact: EmergencyContact,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<StudentSummary>,
    pub meta: PaginationMeta,
}

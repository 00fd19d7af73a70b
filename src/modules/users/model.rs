//! User data models and DTOs.
//!
//! # Core Types
//!
//! - [`User`] - User entity as returned by the API (never carries the
//!   password hash; queries select [`USER_COLUMNS`])
//! - [`UserRole`] - Role tag (`admin`, `teacher`, `student`, `parent`)
//! - [`Profile`] - One-to-one profile extension, created lazily
//!
//! # Request DTOs
//!
//! - [`UpdateUserDto`] - Update the authenticated user's own record
//! - [`UpdateProfileDto`] - Update bio/social links

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::PaginationMeta;

/// Column list selected for every [`User`] query; the password hash is
/// deliberately excluded.
pub const USER_COLUMNS: &str = "id, email, first_name, last_name, role, phone, address, \
     date_of_birth, profile_picture, is_active, is_verified, last_login, date_joined, updated_at";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
    #[default]
    Student,
    Parent,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Parent => "parent",
        }
    }
}

/// A user account.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub date_joined: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// DTO for updating the authenticated user's own record.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub profile_picture: Option<String>,
}

/// Extended profile information, one-to-one with [`User`].
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    pub bio: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(url)]
    pub facebook: Option<String>,
    #[validate(url)]
    pub twitter: Option<String>,
    #[validate(url)]
    pub linkedin: Option<String>,
}

/// Profile with its owning user embedded, as returned by `/api/auth/profile`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub user: User,
}

impl ProfileResponse {
    pub fn new(profile: Profile, user: User) -> Self {
        Self {
            id: profile.id,
            bio: profile.bio,
            website: profile.website,
            facebook: profile.facebook,
            twitter: profile.twitter,
            linkedin: profile.linkedin,
            user,
        }
    }
}

/// Paginated response for the admin user listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for (role, s) in [
            (UserRole::Admin, "admin"),
            (UserRole::Teacher, "teacher"),
            (UserRole::Student, "student"),
            (UserRole::Parent, "parent"),
        ] {
            assert_eq!(role.as_str(), s);
            let parsed: UserRole = serde_json::from_str(&format!("\"{}\"", s)).unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert!(serde_json::from_str::<UserRole>("\"superuser\"").is_err());
    }

    #[test]
    fn test_default_role_is_student() {
        assert_eq!(UserRole::default(), UserRole::Student);
    }

    #[test]
    fn test_update_profile_dto_url_validation() {
        let dto = UpdateProfileDto {
            bio: Some("hi".to_string()),
            website: Some("https://example.com".to_string()),
            facebook: None,
            twitter: None,
            linkedin: None,
        };
        assert!(dto.validate().is_ok());

        let bad = UpdateProfileDto {
            bio: None,
            website: Some("not a url".to_string()),
            facebook: None,
            twitter: None,
            linkedin: None,
        };
        assert!(bad.validate().is_err());
    }
}

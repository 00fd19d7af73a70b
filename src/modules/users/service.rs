use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationParams;

use super::model::{Profile, USER_COLUMNS, UpdateProfileDto, UpdateUserDto, User};

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with id {} not found", id)))?;

        Ok(user)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_user(db: &PgPool, id: Uuid, dto: UpdateUserDto) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users SET \
                first_name = COALESCE($1, first_name), \
                last_name = COALESCE($2, last_name), \
                phone = COALESCE($3, phone), \
                address = COALESCE($4, address), \
                profile_picture = COALESCE($5, profile_picture), \
                updated_at = NOW() \
             WHERE id = $6 \
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&dto.first_name)
            .bind(&dto.last_name)
            .bind(&dto.phone)
            .bind(&dto.address)
            .bind(&dto.profile_picture)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with id {} not found", id)))?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn list_users(
        db: &PgPool,
        pagination: &PaginationParams,
    ) -> Result<(Vec<User>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await?;

        let sql = format!(
            "SELECT {} FROM users ORDER BY date_joined DESC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(db)
            .await?;

        Ok((users, total))
    }

    /// Fetches the user's profile, creating an empty one on first access.
    #[instrument(skip(db))]
    pub async fn get_or_create_profile(db: &PgPool, user_id: Uuid) -> Result<Profile, AppError> {
        let existing = sqlx::query_as::<_, Profile>(
            "SELECT id, user_id, bio, website, facebook, twitter, linkedin \
             FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        if let Some(profile) = existing {
            return Ok(profile);
        }

        let profile = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id \
             RETURNING id, user_id, bio, website, facebook, twitter, linkedin",
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok(profile)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<Profile, AppError> {
        // Make sure the row exists before patching it.
        Self::get_or_create_profile(db, user_id).await?;

        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET \
                bio = COALESCE($1, bio), \
                website = COALESCE($2, website), \
                facebook = COALESCE($3, facebook), \
                twitter = COALESCE($4, twitter), \
                linkedin = COALESCE($5, linkedin) \
             WHERE user_id = $6 \
             RETURNING id, user_id, bio, website, facebook, twitter, linkedin",
        )
        .bind(&dto.bio)
        .bind(&dto.website)
        .bind(&dto.facebook)
        .bind(&dto.twitter)
        .bind(&dto.linkedin)
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok(profile)
    }
}

use chrono::{Duration, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::config::email::EmailConfig;
use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{USER_COLUMNS, User, UserRole};
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::utils::jwt::{
    create_access_token, create_refresh_token, create_reset_token, verify_refresh_token,
    verify_reset_token,
};
use crate::utils::password::{hash_password, verify_password};

use super::model::{
    ChangePasswordDto, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse,
    RegisterRequestDto, ResetPasswordConfirmRequest, ResetPasswordEmailRequest,
};

/// Verification links expire after 24 hours.
const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

#[derive(sqlx::FromRow)]
struct UserWithPassword {
    id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    role: UserRole,
    password: String,
    is_active: bool,
}

#[derive(sqlx::FromRow)]
struct VerificationToken {
    token: String,
    created_at: chrono::DateTime<Utc>,
}

fn generate_verification_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, email_config))]
    pub async fn register_user(
        db: &PgPool,
        dto: RegisterRequestDto,
        email_config: &EmailConfig,
    ) -> Result<User, AppError> {
        if dto.password != dto.password2 {
            return Err(AppError::field_error(
                "password",
                "Password fields didn't match.",
            ));
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(&dto.email)
        .fetch_one(db)
        .await?;

        if exists {
            return Err(AppError::field_error(
                "email",
                "A user with this email already exists.",
            ));
        }

        let hashed_password = hash_password(&dto.password)?;

        let sql = format!(
            "INSERT INTO users (email, password, first_name, last_name, role, phone) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&dto.email)
            .bind(&hashed_password)
            .bind(&dto.first_name)
            .bind(&dto.last_name)
            .bind(dto.role)
            .bind(&dto.phone)
            .fetch_one(db)
            .await?;

        sqlx::query("INSERT INTO profiles (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(db)
            .await?;

        Self::send_verification_email(db, &user, email_config).await;

        Ok(user)
    }

    /// Generates and stores a fresh verification token (replacing any previous
    /// one) and emails the verification link. Failures are logged rather than
    /// failing the registration that triggered the send.
    async fn send_verification_email(db: &PgPool, user: &User, email_config: &EmailConfig) {
        let token = generate_verification_token();

        let stored = sqlx::query(
            "INSERT INTO email_verification_tokens (user_id, token) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET token = EXCLUDED.token, created_at = NOW()",
        )
        .bind(user.id)
        .bind(&token)
        .execute(db)
        .await;

        if let Err(e) = stored {
            warn!(error = %e, user_id = %user.id, "Failed to store verification token");
            return;
        }

        let email_service = EmailService::new(email_config.clone());
        if let Err(e) = email_service
            .send_verification_email(&user.email, &user.full_name(), user.id, &token)
            .await
        {
            warn!(error = %e, user_id = %user.id, "Failed to send verification email");
        }
    }

    #[instrument(skip(db, token))]
    pub async fn verify_email(db: &PgPool, user_id: Uuid, token: &str) -> Result<(), AppError> {
        let stored = sqlx::query_as::<_, VerificationToken>(
            "SELECT token, created_at FROM email_verification_tokens WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid token".to_string()))?;

        if stored.token != token {
            return Err(AppError::bad_request("Invalid token".to_string()));
        }

        if Utc::now() - stored.created_at > Duration::hours(VERIFICATION_TOKEN_TTL_HOURS) {
            return Err(AppError::bad_request(
                "Verification token has expired".to_string(),
            ));
        }

        sqlx::query("UPDATE users SET is_verified = TRUE, is_active = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(db)
            .await?;

        sqlx::query("DELETE FROM email_verification_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(())
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let user_with_password = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, email, first_name, last_name, role, password, is_active \
             FROM users WHERE email = $1",
        )
            .bind(&dto.email)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password".to_string()))?;

        let is_valid = verify_password(&dto.password, &user_with_password.password)?;

        if !is_valid {
            return Err(AppError::unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        if !user_with_password.is_active {
            return Err(AppError::unauthorized(
                "Account is inactive. Please verify your email.".to_string(),
            ));
        }

        let sql = format!(
            "UPDATE users SET last_login = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_with_password.id)
            .fetch_one(db)
            .await?;

        let access = create_access_token(user.id, &user.email, user.role, jwt_config)?;
        let refresh = create_refresh_token(user.id, jwt_config)?;

        Ok(LoginResponse {
            access,
            refresh,
            user,
        })
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn refresh_token(
        db: &PgPool,
        dto: RefreshRequest,
        jwt_config: &JwtConfig,
    ) -> Result<RefreshResponse, AppError> {
        let claims = verify_refresh_token(&dto.refresh, jwt_config)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid or expired refresh token".to_string()))?;

        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired refresh token".to_string()))?;

        if !user.is_active {
            return Err(AppError::unauthorized(
                "Account is inactive.".to_string(),
            ));
        }

        let access = create_access_token(user.id, &user.email, user.role, jwt_config)?;

        Ok(RefreshResponse { access })
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        user_id: Uuid,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let current_hash = sqlx::query_scalar::<_, String>(
            "SELECT password FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found".to_string()))?;

        if !verify_password(&dto.old_password, &current_hash)? {
            return Err(AppError::field_error("old_password", "Wrong password."));
        }

        let new_hash = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Always succeeds from the caller's perspective so the endpoint does not
    /// reveal which emails have accounts.
    #[instrument(skip(db, dto, jwt_config, email_config))]
    pub async fn forgot_password(
        db: &PgPool,
        dto: ResetPasswordEmailRequest,
        jwt_config: &JwtConfig,
        email_config: &EmailConfig,
    ) -> Result<(), AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&dto.email)
            .fetch_optional(db)
            .await?;

        if let Some(user) = user {
            let token = create_reset_token(user.id, &user.email, jwt_config)?;
            let email_service = EmailService::new(email_config.clone());
            if let Err(e) = email_service
                .send_password_reset_email(&user.email, &user.full_name(), &token)
                .await
            {
                warn!(error = %e, user_id = %user.id, "Failed to send password reset email");
            }
        }

        Ok(())
    }

    #[instrument(skip(db, dto, jwt_config, email_config))]
    pub async fn reset_password(
        db: &PgPool,
        dto: ResetPasswordConfirmRequest,
        jwt_config: &JwtConfig,
        email_config: &EmailConfig,
    ) -> Result<(), AppError> {
        let claims = verify_reset_token(&dto.token, jwt_config)?;
        let user_id = Uuid::parse_str(&claims.user_id)
            .map_err(|_| AppError::bad_request("Invalid or expired reset token".to_string()))?;

        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid user".to_string()))?;

        let new_hash = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(user.id)
            .execute(db)
            .await?;

        let email_service = EmailService::new(email_config.clone());
        if let Err(e) = email_service
            .send_password_reset_confirmation(&user.email, &user.full_name())
            .await
        {
            warn!(error = %e, user_id = %user.id, "Failed to send reset confirmation email");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_verification_token_length_and_charset() {
        let token = generate_verification_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_verification_token_unique() {
        assert_ne!(generate_verification_token(), generate_verification_token());
    }
}

use uuid::Uuid;

use slate::config::jwt::JwtConfig;
use slate::modules::users::model::UserRole;
use slate::utils::jwt::{
    create_access_token, create_refresh_token, create_reset_token, verify_refresh_token,
    verify_reset_token, verify_token,
};

fn config_with_secret(secret: &str) -> JwtConfig {
    JwtConfig {
        secret: secret.to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 604800,
    }
}

#[test]
fn test_access_token_carries_identity_and_role() {
    let config = config_with_secret("integration-secret");
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, "admin@school.test", UserRole::Admin, &config).unwrap();
    let claims = verify_token(&token, &config).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.email, "admin@school.test");
    assert_eq!(claims.role, UserRole::Admin);
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_token_rejected_with_different_secret() {
    let config = config_with_secret("secret-a");
    let other = config_with_secret("secret-b");

    let token =
        create_access_token(Uuid::new_v4(), "a@b.test", UserRole::Student, &config).unwrap();
    assert!(verify_token(&token, &other).is_err());
}

#[test]
fn test_tampered_token_rejected() {
    let config = config_with_secret("secret");
    let token =
        create_access_token(Uuid::new_v4(), "a@b.test", UserRole::Student, &config).unwrap();

    let mut tampered = token.clone();
    tampered.truncate(token.len() - 2);
    assert!(verify_token(&tampered, &config).is_err());
}

#[test]
fn test_refresh_and_access_tokens_are_not_interchangeable() {
    let config = config_with_secret("secret");
    let user_id = Uuid::new_v4();

    let access = create_access_token(user_id, "a@b.test", UserRole::Teacher, &config).unwrap();
    let refresh = create_refresh_token(user_id, &config).unwrap();

    assert!(verify_refresh_token(&access, &config).is_err());
    assert!(verify_token(&refresh, &config).is_err());

    let claims = verify_refresh_token(&refresh, &config).unwrap();
    assert_eq!(claims.sub, user_id.to_string());
}

#[test]
fn test_reset_token_round_trip() {
    let config = config_with_secret("secret");
    let user_id = Uuid::new_v4();

    let token = create_reset_token(user_id, "reset@school.test", &config).unwrap();
    let claims = verify_reset_token(&token, &config).unwrap();

    assert_eq!(claims.user_id, user_id.to_string());
    assert_eq!(claims.email, "reset@school.test");
}

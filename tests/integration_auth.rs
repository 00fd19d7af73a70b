mod common;

use axum::http::StatusCode;
use common::{
    create_test_user, generate_unique_email, get_auth_token, json_request, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;

fn register_payload(email: &str, password: &str, password2: &str) -> serde_json::Value {
    json!({
        "email": email,
        "password": password,
        "password2": password2,
        "first_name": "Alice",
        "last_name": "Smith",
        "role": "teacher"
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_creates_inactive_user(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let email = generate_unique_email();

    let (status, body) = json_request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(register_payload(&email, "password123", "password123")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], email);
    assert_eq!(body["is_active"], false);
    assert_eq!(body["is_verified"], false);
    assert_eq!(body["role"], "teacher");
    assert!(body.get("password").is_none());

    // A profile and a verification token exist for the new user
    let user_id: uuid::Uuid = serde_json::from_value(body["id"].clone()).unwrap();
    let has_profile = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE user_id = $1)",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(has_profile);

    let has_token = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM email_verification_tokens WHERE user_id = $1)",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(has_token);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_rejects_mismatched_passwords(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let (status, body) = json_request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(register_payload(
            &generate_unique_email(),
            "password123",
            "different456",
        )),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["password"][0], "Password fields didn't match.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_rejects_duplicate_email(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "password123", "teacher").await;

    let app = setup_test_app(pool).await;
    let (status, body) = json_request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(register_payload(&email, "password123", "password123")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["email"][0]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_rejects_unverified_account(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let email = generate_unique_email();

    let (status, _) = json_request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(register_payload(&email, "password123", "password123")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let app = setup_test_app(pool).await;
    let (status, body) = json_request(
        app,
        "POST",
        "/api/auth/token",
        None,
        Some(json!({"email": email, "password": "password123"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("inactive"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_email_flips_flags_and_rejects_reuse(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let email = generate_unique_email();

    let (_, body) = json_request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(register_payload(&email, "password123", "password123")),
    )
    .await;
    let user_id: uuid::Uuid = serde_json::from_value(body["id"].clone()).unwrap();

    let token = sqlx::query_scalar::<_, String>(
        "SELECT token FROM email_verification_tokens WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = json_request(
        app,
        "GET",
        &format!("/api/auth/verify-email/{}/{}", user_id, token),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (is_active, is_verified) = sqlx::query_as::<_, (bool, bool)>(
        "SELECT is_active, is_verified FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(is_active);
    assert!(is_verified);

    // The token is one-time; a second attempt fails
    let app = setup_test_app(pool.clone()).await;
    let (status, _) = json_request(
        app,
        "GET",
        &format!("/api/auth/verify-email/{}/{}", user_id, token),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // And login now succeeds
    let app = setup_test_app(pool).await;
    let token = get_auth_token(app, &email, "password123").await;
    assert!(!token.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_email_rejects_wrong_token(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let email = generate_unique_email();

    let (_, body) = json_request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(register_payload(&email, "password123", "password123")),
    )
    .await;
    let user_id: uuid::Uuid = serde_json::from_value(body["id"].clone()).unwrap();

    let app = setup_test_app(pool).await;
    let (status, _) = json_request(
        app,
        "GET",
        &format!("/api/auth/verify-email/{}/not-the-token", user_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_token_refresh(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "password123", "teacher").await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "POST",
        "/api/auth/token",
        None,
        Some(json!({"email": email, "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let refresh = body["refresh"].as_str().unwrap().to_string();
    assert!(body["access"].as_str().is_some());
    assert_eq!(body["user"]["email"], email);

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "POST",
        "/api/auth/token/refresh",
        None,
        Some(json!({"refresh": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].as_str().is_some());

    // An access token is not accepted as a refresh token
    let app = setup_test_app(pool.clone()).await;
    let access = get_auth_token(setup_test_app(pool).await, &email, "password123").await;
    let (status, _) = json_request(
        app,
        "POST",
        "/api/auth/token/refresh",
        None,
        Some(json!({"refresh": access})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_change_password_requires_correct_old_password(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "password123", "teacher").await;

    let token = get_auth_token(setup_test_app(pool.clone()).await, &email, "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "PATCH",
        "/api/auth/change-password",
        Some(&token),
        Some(json!({"old_password": "wrong-password", "new_password": "newpassword456"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["old_password"][0], "Wrong password.");

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = json_request(
        app,
        "PATCH",
        "/api/auth/change-password",
        Some(&token),
        Some(json!({"old_password": "password123", "new_password": "newpassword456"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // New password works, old one doesn't
    let app = setup_test_app(pool.clone()).await;
    let (status, _) = json_request(
        app,
        "POST",
        "/api/auth/token",
        None,
        Some(json!({"email": email, "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = get_auth_token(setup_test_app(pool).await, &email, "newpassword456").await;
    assert!(!token.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_and_profile_endpoints(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "password123", "parent").await;
    let token = get_auth_token(setup_test_app(pool.clone()).await, &email, "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email);

    // Profile is created lazily on first access
    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(app, "GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["bio"], serde_json::Value::Null);

    let app = setup_test_app(pool).await;
    let (status, body) = json_request(
        app,
        "PATCH",
        "/api/auth/profile",
        Some(&token),
        Some(json!({"bio": "Hello", "website": "https://example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bio"], "Hello");
    assert_eq!(body["website"], "https://example.com");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_user_list_is_admin_only(pool: PgPool) {
    let teacher_email = generate_unique_email();
    create_test_user(&pool, &teacher_email, "password123", "teacher").await;
    let admin_email = generate_unique_email();
    create_test_user(&pool, &admin_email, "password123", "admin").await;

    let teacher_token =
        get_auth_token(setup_test_app(pool.clone()).await, &teacher_email, "password123").await;
    let app = setup_test_app(pool.clone()).await;
    let (status, _) = json_request(app, "GET", "/api/auth/users", Some(&teacher_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_token =
        get_auth_token(setup_test_app(pool.clone()).await, &admin_email, "password123").await;
    let app = setup_test_app(pool).await;
    let (status, body) = json_request(app, "GET", "/api/auth/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().len() >= 2);
    assert!(body["meta"]["total"].as_i64().unwrap() >= 2);
}

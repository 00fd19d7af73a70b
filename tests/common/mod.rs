use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use slate::config::cors::CorsConfig;
use slate::config::email::EmailConfig;
use slate::config::jwt::JwtConfig;
use slate::config::rate_limit::RateLimitConfig;
use slate::router::init_router;
use slate::state::AppState;
use slate::utils::password::hash_password;

pub async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool.clone(),
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        cache: None,
    };
    init_router(state)
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
}

/// Inserts an active, verified user directly; `role` is one of
/// "admin", "teacher", "student", "parent".
pub async fn create_test_user(pool: &PgPool, email: &str, password: &str, role: &str) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (first_name, last_name, email, password, role, is_active, is_verified) \
         VALUES ($1, $2, $3, $4, $5, TRUE, TRUE) RETURNING id",
    )
    .bind("Test")
    .bind("User")
    .bind(email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
    }
}

pub async fn get_auth_token(app: axum::Router, email: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/token")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&serde_json::json!({
                "email": email,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["access"]
        .as_str()
        .unwrap_or_else(|| panic!("no access token in {}", body))
        .to_string()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Minimal valid student payload; override fields per test as needed.
#[allow(dead_code)]
pub fn student_payload(email: &str) -> serde_json::Value {
    serde_json::json!({
        "first_name": "Student",
        "last_name": "Test",
        "date_of_birth": "2012-05-10",
        "gender": "F",
        "email": email,
        "emergency_contact_name": "Parent Test",
        "emergency_contact_phone": "+447700900001",
        "emergency_contact_relationship": "Mother",
        "address_line_1": "1 High Street",
        "city": "London",
        "county": "Greater London",
        "postal_code": "N1 1AA",
        "current_class": "Year 7",
        "academic_year": "2024-2025"
    })
}

#[allow(dead_code)]
pub async fn json_request(
    app: axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (axum::http::StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = builder
        .body(match body {
            Some(body) => Body::from(serde_json::to_string(&body).unwrap()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, body)
}

mod common;

use axum::http::StatusCode;
use chrono::Datelike;
use common::{
    create_test_user, generate_unique_email, get_auth_token, json_request, setup_test_app,
    student_payload,
};
use serde_json::json;
use sqlx::PgPool;

async fn admin_token(pool: &PgPool) -> String {
    let email = generate_unique_email();
    create_test_user(pool, &email, "password123", "admin").await;
    get_auth_token(setup_test_app(pool.clone()).await, &email, "password123").await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_endpoints_require_auth(pool: PgPool) {
    let app = setup_test_app(pool).await;
    let (status, _) = json_request(app, "GET", "/api/students", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_generates_sequential_ids(pool: PgPool) {
    let token = admin_token(&pool).await;
    let year = chrono::Utc::now().year();

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "POST",
        "/api/students",
        Some(&token),
        Some(student_payload(&generate_unique_email())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["student_id"], format!("STU{}0001", year));

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "POST",
        "/api/students",
        Some(&token),
        Some(student_payload(&generate_unique_email())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["student_id"], format!("STU{}0002", year));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_links_user_account(pool: PgPool) {
    let token = admin_token(&pool).await;
    let email = generate_unique_email();

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "POST",
        "/api/students",
        Some(&token),
        Some(student_payload(&email)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user_id"].as_str().is_some());

    let (role, is_active) = sqlx::query_as::<_, (String, bool)>(
        "SELECT role, is_active FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(role, "student");
    assert!(is_active);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_rejects_duplicate_email(pool: PgPool) {
    let token = admin_token(&pool).await;
    let email = generate_unique_email();

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = json_request(
        app,
        "POST",
        "/api/students",
        Some(&token),
        Some(student_payload(&email)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let app = setup_test_app(pool).await;
    let (status, body) = json_request(
        app,
        "POST",
        "/api/students",
        Some(&token),
        Some(student_payload(&email)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["email"][0]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_rejects_future_date_of_birth(pool: PgPool) {
    let token = admin_token(&pool).await;
    let mut payload = student_payload(&generate_unique_email());
    payload["date_of_birth"] = json!("2099-01-01");

    let app = setup_test_app(pool).await;
    let (status, body) =
        json_request(app, "POST", "/api/students", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["date_of_birth"][0]
        .as_str()
        .unwrap()
        .contains("future"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_student_syncs_linked_user(pool: PgPool) {
    let token = admin_token(&pool).await;
    let email = generate_unique_email();

    let app = setup_test_app(pool.clone()).await;
    let (_, body) = json_request(
        app,
        "POST",
        "/api/students",
        Some(&token),
        Some(student_payload(&email)),
    )
    .await;
    let student_id = body["id"].as_str().unwrap().to_string();

    // Suspending the student deactivates the linked user account
    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "PATCH",
        &format!("/api/students/{}", student_id),
        Some(&token),
        Some(json!({"first_name": "Renamed", "status": "suspended"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Renamed");
    assert_eq!(body["status"], "suspended");

    let (first_name, is_active) = sqlx::query_as::<_, (String, bool)>(
        "SELECT first_name, is_active FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(first_name, "Renamed");
    assert!(!is_active);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_student_deactivates_linked_user(pool: PgPool) {
    let token = admin_token(&pool).await;
    let email = generate_unique_email();

    let app = setup_test_app(pool.clone()).await;
    let (_, body) = json_request(
        app,
        "POST",
        "/api/students",
        Some(&token),
        Some(student_payload(&email)),
    )
    .await;
    let student_id = body["id"].as_str().unwrap().to_string();

    let app = setup_test_app(pool.clone()).await;
    let (status, _) = json_request(
        app,
        "DELETE",
        &format!("/api/students/{}", student_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let student_gone = sqlx::query_scalar::<_, bool>(
        "SELECT NOT EXISTS(SELECT 1 FROM students WHERE email = $1)",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(student_gone);

    let user_active = sqlx::query_scalar::<_, bool>("SELECT is_active FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!user_active);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filters_and_search(pool: PgPool) {
    let token = admin_token(&pool).await;

    let mut first = student_payload(&generate_unique_email());
    first["first_name"] = json!("Amelia");
    first["current_class"] = json!("Year 7");
    let mut second = student_payload(&generate_unique_email());
    second["first_name"] = json!("Benjamin");
    second["current_class"] = json!("Year 8");
    second["gender"] = json!("M");

    for payload in [first, second] {
        let app = setup_test_app(pool.clone()).await;
        let (status, _) =
            json_request(app, "POST", "/api/students", Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // No filters: everything, paginated
    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(app, "GET", "/api/students", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Filters AND together
    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "GET",
        "/api/students?current_class=Year%208&gender=M",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["first_name"], "Benjamin");

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "GET",
        "/api/students?current_class=Year%208&gender=F",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);

    // Free-text search
    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "GET",
        "/api/students?search=amel",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["first_name"], "Amelia");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_endpoint_combines_filters(pool: PgPool) {
    let token = admin_token(&pool).await;

    let mut payload = student_payload(&generate_unique_email());
    payload["first_name"] = json!("Charlotte");
    payload["section"] = json!("B");
    let app = setup_test_app(pool.clone()).await;
    json_request(app, "POST", "/api/students", Some(&token), Some(payload)).await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "POST",
        "/api/students/search",
        Some(&token),
        Some(json!({"query": "charl", "section": "B", "status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["first_name"], "Charlotte");

    // An empty body returns the full set
    let app = setup_test_app(pool).await;
    let (status, body) = json_request(
        app,
        "POST",
        "/api/students/search",
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_students_by_status_validates_status(pool: PgPool) {
    let token = admin_token(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "GET",
        "/api/students/status/enrolled",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid status"));

    let app = setup_test_app(pool).await;
    let (status, body) = json_request(
        app,
        "GET",
        "/api/students/status/active",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bulk_status_update(pool: PgPool) {
    let token = admin_token(&pool).await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let app = setup_test_app(pool.clone()).await;
        let (_, body) = json_request(
            app,
            "POST",
            "/api/students",
            Some(&token),
            Some(student_payload(&generate_unique_email())),
        )
        .await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    // Only the first two are updated
    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "POST",
        "/api/students/bulk/update-status",
        Some(&token),
        Some(json!({"student_ids": [ids[0], ids[1]], "status": "graduated"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated_count"], 2);

    let graduated = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM students WHERE status = 'graduated'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(graduated, 2);

    // Status outside the enumerated set is rejected
    let app = setup_test_app(pool.clone()).await;
    let (status, _) = json_request(
        app,
        "POST",
        "/api/students/bulk/update-status",
        Some(&token),
        Some(json!({"student_ids": [ids[2]], "status": "enrolled"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Empty id list is rejected
    let app = setup_test_app(pool).await;
    let (status, _) = json_request(
        app,
        "POST",
        "/api/students/bulk/update-status",
        Some(&token),
        Some(json!({"student_ids": [], "status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats_counts_and_age_buckets(pool: PgPool) {
    let token = admin_token(&pool).await;
    let year = chrono::Utc::now().year();

    let mut young = student_payload(&generate_unique_email());
    young["date_of_birth"] = json!(format!("{}-01-15", year - 4));
    let mut older = student_payload(&generate_unique_email());
    older["date_of_birth"] = json!(format!("{}-01-15", year - 16));

    for payload in [young, older] {
        let app = setup_test_app(pool.clone()).await;
        let (status, _) =
            json_request(app, "POST", "/api/students", Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let app = setup_test_app(pool).await;
    let (status, body) = json_request(app, "GET", "/api/students/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_students"], 2);
    assert_eq!(body["active_students"], 2);
    assert_eq!(body["new_admissions_this_month"], 2);
    assert_eq!(body["age_distribution"]["3-5"], 1);
    assert_eq!(body["age_distribution"]["15-17"], 1);
    assert_eq!(body["students_by_status"]["active"], 2);
    assert_eq!(body["students_by_class"]["Year 7"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_quick_info_lookup(pool: PgPool) {
    let token = admin_token(&pool).await;
    let year = chrono::Utc::now().year();

    let app = setup_test_app(pool.clone()).await;
    json_request(
        app,
        "POST",
        "/api/students",
        Some(&token),
        Some(student_payload(&generate_unique_email())),
    )
    .await;

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "GET",
        &format!("/api/students/quick-info/STU{}0001", year),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emergency_contact"]["relationship"], "Mother");

    let app = setup_test_app(pool).await;
    let (status, _) = json_request(
        app,
        "GET",
        "/api/students/quick-info/STU00000000",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_document_and_note_attachments(pool: PgPool) {
    let token = admin_token(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let (_, body) = json_request(
        app,
        "POST",
        "/api/students",
        Some(&token),
        Some(student_payload(&generate_unique_email())),
    )
    .await;
    let student_id = body["id"].as_str().unwrap().to_string();

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "POST",
        &format!("/api/students/{}/documents", student_id),
        Some(&token),
        Some(json!({
            "document_type": "birth_certificate",
            "title": "Birth certificate",
            "file_path": "students/documents/cert.pdf"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["document_type"], "birth_certificate");
    assert_eq!(body["uploaded_by_name"], "Test User");
    let document_id = body["id"].as_str().unwrap().to_string();

    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "POST",
        &format!("/api/students/{}/notes", student_id),
        Some(&token),
        Some(json!({
            "note_type": "academic",
            "title": "Strong start",
            "content": "Excellent first term."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_confidential"], false);

    // The detail endpoint embeds both
    let app = setup_test_app(pool.clone()).await;
    let (status, body) = json_request(
        app,
        "GET",
        &format!("/api/students/{}", student_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documents"].as_array().unwrap().len(), 1);
    assert_eq!(body["student_notes"].as_array().unwrap().len(), 1);
    assert!(body["full_name"].as_str().is_some());

    // Scoped delete
    let app = setup_test_app(pool.clone()).await;
    let (status, _) = json_request(
        app,
        "DELETE",
        &format!("/api/students/{}/documents/{}", student_id, document_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = setup_test_app(pool).await;
    let (status, _) = json_request(
        app,
        "DELETE",
        &format!("/api/students/{}/documents/{}", student_id, document_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    pub database: bool,
    pub cache: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub checks: HealthChecks,
}

/// Reports database and cache reachability. Dependency failures are folded
/// into booleans; the endpoint itself always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    ),
    tag = "Health"
)]
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    let cache = match &state.cache {
        Some(cache) => cache.check_reachable().await,
        None => false,
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        checks: HealthChecks { database, cache },
    })
}

use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_me, get_profile, list_users, update_me, update_profile};

/// Routes for the authenticated user's own record and profile.
pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).patch(update_me))
        .route("/profile", get(get_profile).patch(update_profile))
}

/// Admin-only user listing; guarded with `require_admin` at the nesting site.
pub fn init_admin_users_router() -> Router<AppState> {
    Router::new().route("/", get(list_users))
}

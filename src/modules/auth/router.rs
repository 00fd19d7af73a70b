use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    change_password, confirm_password_reset, login_user, refresh_token, register_user,
    request_password_reset, verify_email,
};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/verify-email/{user_id}/{token}", get(verify_email))
        .route("/token", post(login_user))
        .route("/token/refresh", post(refresh_token))
        .route("/change-password", patch(change_password))
        .route("/reset-password/request", post(request_password_reset))
        .route("/reset-password/confirm", post(confirm_password_reset))
}

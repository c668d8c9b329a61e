pub mod logout;
pub mod me;
pub mod password;
pub mod profile;

use crate::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for the signed-in account (mounted at /api/auth)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout::logout))
        .route("/me", get(me::me))
        .route("/profile", put(profile::update_profile))
        .route("/change-password", put(password::change_password))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        logout::logout,
        me::me,
        profile::update_profile,
        password::change_password,
    ),
    components(schemas(
        ladle_core::UpdateProfileRequest,
        ladle_core::ChangePasswordRequest,
        ladle_core::MessageResponse,
    ))
)]
pub struct ApiDoc;

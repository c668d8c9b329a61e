pub mod auth;
pub mod ping;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ping", get(ping::ping))
        .route("/api/auth/register", post(auth::register::register))
        .route("/api/auth/login", post(auth::login::login))
}

#[derive(OpenApi)]
#[openapi(
    paths(ping::ping, auth::login::login, auth::register::register,),
    components(schemas(
        ladle_core::MessageResponse,
        ladle_core::LoginRequest,
        ladle_core::RegisterRequest,
        ladle_core::AuthResponse,
        ladle_core::User,
        ladle_core::Role,
    ))
)]
pub struct ApiDoc;

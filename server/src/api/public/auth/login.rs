use super::normalize_email;
use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::{create_session, verify_password};
use crate::config::ServerConfig;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::User;
use crate::schema::users;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::{AuthResponse, LoginRequest};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "ada@example.com", "password": "secret1"})),
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<ServerConfig>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let Some(email) = normalize_email(&req.email) else {
        return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };

    let mut conn = get_conn!(pool);

    let user: User = match users::table
        .filter(users::email.eq(&email))
        .filter(users::deleted_at.is_null())
        .select(User::as_select())
        .first(&mut conn)
        .optional()
    {
        Ok(Some(u)) => u,
        Ok(None) => return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials"),
        Err(e) => return internal_error("Failed to look up user", e),
    };

    if !verify_password(&req.password, &user.password_hash) {
        tracing::debug!(user_id = %user.id, "login rejected: wrong password");
        return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    let token = match create_session(&mut conn, user.id, config.session_ttl_days) {
        Ok(t) => t,
        Err(e) => return internal_error("Failed to create session", e),
    };

    (
        StatusCode::OK,
        Json(AuthResponse {
            token,
            user: user.to_api(),
        }),
    )
        .into_response()
}

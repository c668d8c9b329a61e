use super::normalize_email;
use crate::api::{error_response, internal_error, is_unique_violation, ErrorResponse};
use crate::auth::{create_session, hash_password, MIN_PASSWORD_LEN};
use crate::config::ServerConfig;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewUser, User};
use crate::schema::users;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::{AuthResponse, RegisterRequest, Role};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body(content = RegisterRequest, example = json!({"name": "Ada", "email": "ada@example.com", "password": "secret1"})),
    responses(
        (status = 201, description = "Account created and signed in", body = AuthResponse),
        (status = 400, description = "Invalid request or email already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<ServerConfig>>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let name = req.name.trim();
    if name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Name is required");
    }
    let Some(email) = normalize_email(&req.email) else {
        return error_response(StatusCode::BAD_REQUEST, "A valid email is required");
    };
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }

    let mut conn = get_conn!(pool);

    let password_hash = match hash_password(&req.password) {
        Ok(h) => h,
        Err(e) => return internal_error("Failed to hash password", e),
    };

    let new_user = NewUser {
        name,
        email: &email,
        password_hash: &password_hash,
        role: Role::User.as_str(),
    };

    let user: User = match diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
    {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            return error_response(StatusCode::BAD_REQUEST, "Email is already registered")
        }
        Err(e) => return internal_error("Failed to create user", e),
    };

    let token = match create_session(&mut conn, user.id, config.session_ttl_days) {
        Ok(t) => t,
        Err(e) => return internal_error("Failed to create session", e),
    };

    tracing::info!(user_id = %user.id, "registered new account");

    (
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.to_api(),
        }),
    )
        .into_response()
}

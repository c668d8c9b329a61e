use crate::api::public::auth::normalize_email;
use crate::api::{error_response, internal_error, is_unique_violation, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{User, UserChanges};
use crate::schema::users;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use ladle_core::UpdateProfileRequest;
use std::sync::Arc;

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    tag = "auth",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ladle_core::User),
        (status = 400, description = "Invalid request or email already registered", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<UpdateProfileRequest>,
) -> Response {
    let name = match req.name {
        Some(name) if name.trim().is_empty() => {
            return error_response(StatusCode::BAD_REQUEST, "Name cannot be empty")
        }
        other => other.map(|n| n.trim().to_string()),
    };

    let email = match req.email {
        Some(email) => match normalize_email(&email) {
            Some(email) => Some(email),
            None => return error_response(StatusCode::BAD_REQUEST, "A valid email is required"),
        },
        None => None,
    };

    // Bio and avatar may be cleared with an empty string
    let changes = UserChanges {
        name,
        email,
        bio: req.bio.map(|b| b.trim().to_string()),
        avatar: req.avatar.map(|a| a.trim().to_string()),
        role: None,
        updated_at: Some(Utc::now()),
    };

    let mut conn = get_conn!(pool);

    match diesel::update(users::table.find(user.id))
        .set(&changes)
        .returning(User::as_returning())
        .get_result(&mut conn)
    {
        Ok(updated) => (StatusCode::OK, Json(updated.to_api())).into_response(),
        Err(e) if is_unique_violation(&e) => {
            error_response(StatusCode::BAD_REQUEST, "Email is already registered")
        }
        Err(e) => internal_error("Failed to update profile", e),
    }
}

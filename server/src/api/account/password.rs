use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::{
    bearer_token, hash_password, revoke_user_sessions, verify_password, AuthUser,
    MIN_PASSWORD_LEN,
};
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::users;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use ladle_core::{ChangePasswordRequest, MessageResponse};
use std::sync::Arc;

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed; other sessions revoked", body = MessageResponse),
        (status = 400, description = "Wrong current password or new password too short", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn change_password(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Json(req): Json<ChangePasswordRequest>,
) -> Response {
    if !verify_password(&req.current_password, &user.password_hash) {
        return error_response(StatusCode::BAD_REQUEST, "Current password is incorrect");
    }
    if req.new_password.chars().count() < MIN_PASSWORD_LEN {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }

    let password_hash = match hash_password(&req.new_password) {
        Ok(h) => h,
        Err(e) => return internal_error("Failed to hash password", e),
    };

    let mut conn = get_conn!(pool);

    let result = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::update(users::table.find(user.id))
            .set((
                users::password_hash.eq(&password_hash),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;
        revoke_user_sessions(conn, user.id, bearer_token(&headers).ok())
    });

    match result {
        Ok(revoked) => {
            tracing::info!(user_id = %user.id, revoked, "password changed");
            (
                StatusCode::OK,
                Json(MessageResponse {
                    message: "Password updated".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => internal_error("Failed to change password", e),
    }
}

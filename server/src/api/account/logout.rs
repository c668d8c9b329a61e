use crate::api::{internal_error, ErrorResponse};
use crate::auth::{bearer_token, revoke_session, AuthUser};
use crate::db::DbPool;
use crate::get_conn;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
) -> Response {
    // The extractor already accepted this header
    let Ok(token) = bearer_token(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let mut conn = get_conn!(pool);

    match revoke_session(&mut conn, token) {
        Ok(_) => {
            tracing::debug!(user_id = %user.id, "session revoked");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => internal_error("Failed to revoke session", e),
    }
}

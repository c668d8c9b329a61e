use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "The signed-in user", body = ladle_core::User),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(AuthUser(user): AuthUser) -> Json<ladle_core::User> {
    Json(user.to_api())
}

use crate::api::{internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::favorites;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/favorites/{recipe_id}",
    tag = "favorites",
    params(
        ("recipe_id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe is not a favorite (any more)"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(recipe_id): Path<Uuid>,
) -> Response {
    let mut conn = get_conn!(pool);

    match diesel::delete(favorites::table.find((user.id, recipe_id))).execute(&mut conn) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => internal_error("Failed to remove favorite", e),
    }
}

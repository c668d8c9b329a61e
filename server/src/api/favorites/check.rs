use crate::api::{internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::favorites;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::FavoriteCheckResponse;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/favorites/check/{recipe_id}",
    tag = "favorites",
    params(
        ("recipe_id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Whether the caller favorited the recipe", body = FavoriteCheckResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn check_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(recipe_id): Path<Uuid>,
) -> Response {
    let mut conn = get_conn!(pool);

    match diesel::select(diesel::dsl::exists(
        favorites::table.find((user.id, recipe_id)),
    ))
    .get_result::<bool>(&mut conn)
    {
        Ok(is_favorite) => (StatusCode::OK, Json(FavoriteCheckResponse { is_favorite })).into_response(),
        Err(e) => internal_error("Failed to check favorite", e),
    }
}

use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewFavorite;
use crate::recipe_is_active;
use crate::schema::{favorites, recipes};
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
    post,
    path = "/api/favorites/{recipe_id}",
    tag = "favorites",
    params(
        ("recipe_id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe is a favorite (already or now)", body = FavoriteCheckResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(recipe_id): Path<Uuid>,
) -> Response {
    let mut conn = get_conn!(pool);

    let exists = diesel::select(diesel::dsl::exists(
        recipes::table.find(recipe_id).filter(recipe_is_active!()),
    ))
    .get_result::<bool>(&mut conn);
    match exists {
        Ok(true) => {}
        Ok(false) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => return internal_error("Failed to check recipe", e),
    }

    match diesel::insert_into(favorites::table)
        .values(&NewFavorite {
            user_id: user.id,
            recipe_id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)
    {
        Ok(_) => (
            StatusCode::OK,
            Json(FavoriteCheckResponse { is_favorite: true }),
        )
            .into_response(),
        Err(e) => internal_error("Failed to add favorite", e),
    }
}

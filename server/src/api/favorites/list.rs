use crate::api::{internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::RecipeRow;
use crate::recipe_is_active;
use crate::schema::{favorites, recipes};
use crate::views::recipe_summaries;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::RecipeSummary;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/favorites",
    tag = "favorites",
    responses(
        (status = 200, description = "Favorited active recipes, most recently favorited first", body = Vec<RecipeSummary>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_favorites(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Response {
    let mut conn = get_conn!(pool);

    let rows: Vec<RecipeRow> = match favorites::table
        .inner_join(recipes::table)
        .filter(favorites::user_id.eq(user.id))
        .filter(recipe_is_active!())
        .order(favorites::created_at.desc())
        .select(RecipeRow::as_select())
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => return internal_error("Failed to fetch favorites", e),
    };

    match recipe_summaries(&mut conn, rows) {
        Ok(recipes) => (StatusCode::OK, Json(recipes)).into_response(),
        Err(e) => internal_error("Failed to fetch favorites", e),
    }
}

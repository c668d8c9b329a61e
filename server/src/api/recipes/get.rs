use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{RecipeRow, User};
use crate::recipe_is_active;
use crate::schema::recipes;
use crate::views::recipe_detail;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::Recipe;
use std::sync::Arc;
use uuid::Uuid;

use super::can_view;

#[utoipa::path(
    get,
    path = "/api/recipes/{slug}",
    tag = "recipes",
    params(
        ("slug" = String, Path, description = "Recipe slug")
    ),
    responses(
        (status = 200, description = "Recipe with reviews", body = Recipe),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(slug): Path<String>,
) -> Response {
    let mut conn = get_conn!(pool);

    let row = recipes::table
        .filter(recipes::slug.eq(&slug))
        .filter(recipe_is_active!())
        .select(RecipeRow::as_select())
        .first(&mut conn)
        .optional();

    respond(&mut conn, viewer.as_ref(), row)
}

#[utoipa::path(
    get,
    path = "/api/recipes/id/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe with reviews", body = Recipe),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe_by_id(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Response {
    let mut conn = get_conn!(pool);

    let row = recipes::table
        .find(id)
        .filter(recipe_is_active!())
        .select(RecipeRow::as_select())
        .first(&mut conn)
        .optional();

    respond(&mut conn, viewer.as_ref(), row)
}

fn respond(
    conn: &mut PgConnection,
    viewer: Option<&User>,
    row: QueryResult<Option<RecipeRow>>,
) -> Response {
    let row = match row {
        Ok(Some(row)) if can_view(viewer, &row) => row,
        Ok(_) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => return internal_error("Failed to fetch recipe", e),
    };

    match recipe_detail(conn, row) {
        Ok(recipe) => (StatusCode::OK, Json(recipe)).into_response(),
        Err(e) => internal_error("Failed to fetch recipe", e),
    }
}

use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::RecipeRow;
use crate::schema::recipes;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use super::can_edit;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted along with its reviews and favorites"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Response {
    let mut conn = get_conn!(pool);

    let existing: RecipeRow = match recipes::table
        .find(id)
        .select(RecipeRow::as_select())
        .first(&mut conn)
        .optional()
    {
        Ok(Some(r)) => r,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => return internal_error("Failed to fetch recipe", e),
    };

    if !can_edit(&user, &existing) {
        return error_response(StatusCode::FORBIDDEN, "You can only delete your own recipes");
    }

    // Reviews and favorites go with it (ON DELETE CASCADE)
    match diesel::delete(recipes::table.find(id)).execute(&mut conn) {
        Ok(0) => error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Ok(_) => {
            tracing::info!(recipe_id = %id, user_id = %user.id, "recipe deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => internal_error("Failed to delete recipe", e),
    }
}

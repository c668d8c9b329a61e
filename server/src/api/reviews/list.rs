use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::{AdminUser, AuthUser};
use crate::db::DbPool;
use crate::get_conn;
use crate::models::ReviewRow;
use crate::recipe_is_active;
use crate::schema::{recipes, reviews};
use crate::views::reviews_view;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::Review;
use std::sync::Arc;
use uuid::Uuid;

use super::active_reviews;

fn respond(conn: &mut PgConnection, rows: QueryResult<Vec<ReviewRow>>) -> Response {
    let rows = match rows {
        Ok(r) => r,
        Err(e) => return internal_error("Failed to fetch reviews", e),
    };
    match reviews_view(conn, rows) {
        Ok(reviews) => (StatusCode::OK, Json(reviews)).into_response(),
        Err(e) => internal_error("Failed to fetch reviews", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/reviews/recipe/{id}",
    tag = "reviews",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Reviews of the recipe, newest first", body = Vec<Review>),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn list_recipe_reviews(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Response {
    let mut conn = get_conn!(pool);

    let exists = diesel::select(diesel::dsl::exists(
        recipes::table.find(id).filter(recipe_is_active!()),
    ))
    .get_result::<bool>(&mut conn);
    match exists {
        Ok(true) => {}
        Ok(false) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => return internal_error("Failed to check recipe", e),
    }

    let rows = reviews::table
        .filter(reviews::recipe_id.eq(id))
        .order(reviews::created_at.desc())
        .select(ReviewRow::as_select())
        .load(&mut conn);

    respond(&mut conn, rows)
}

#[utoipa::path(
    get,
    path = "/api/reviews/user",
    tag = "reviews",
    responses(
        (status = 200, description = "The caller's reviews, newest first", body = Vec<Review>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_my_reviews(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Response {
    let mut conn = get_conn!(pool);

    let rows = active_reviews()
        .filter(reviews::user_id.eq(user.id))
        .order(reviews::created_at.desc())
        .select(ReviewRow::as_select())
        .load(&mut conn);

    respond(&mut conn, rows)
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    tag = "reviews",
    responses(
        (status = 200, description = "Every review, newest first", body = Vec<Review>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_all_reviews(
    AdminUser(_admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
) -> Response {
    let mut conn = get_conn!(pool);

    let rows = active_reviews()
        .order(reviews::created_at.desc())
        .select(ReviewRow::as_select())
        .load(&mut conn);

    respond(&mut conn, rows)
}

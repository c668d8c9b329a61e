use crate::api::{error_response, internal_error, is_unique_violation, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewReview, ReviewRow, User};
use crate::recipe_is_active;
use crate::schema::{recipes, reviews};
use crate::views::reviews_view;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::review::validate_review;
use ladle_core::{CreateReviewRequest, Review};
use std::sync::Arc;
use uuid::Uuid;

/// Validate and store a review of an active recipe, answering 201 with the
/// stored review.
pub fn insert_review(
    conn: &mut PgConnection,
    user: &User,
    recipe_id: Uuid,
    rating: i32,
    comment: &str,
) -> Response {
    let comment = match validate_review(rating, comment) {
        Ok(c) => c,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let recipe_exists = diesel::select(diesel::dsl::exists(
        recipes::table.find(recipe_id).filter(recipe_is_active!()),
    ))
    .get_result::<bool>(conn);
    match recipe_exists {
        Ok(true) => {}
        Ok(false) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => return internal_error("Failed to check recipe", e),
    }

    let row: ReviewRow = match diesel::insert_into(reviews::table)
        .values(&NewReview {
            recipe_id,
            user_id: user.id,
            rating,
            comment,
        })
        .returning(ReviewRow::as_returning())
        .get_result(conn)
    {
        Ok(r) => r,
        Err(e) if is_unique_violation(&e) => {
            return error_response(StatusCode::BAD_REQUEST, "You have already reviewed this recipe")
        }
        Err(e) => return internal_error("Failed to create review", e),
    };

    tracing::info!(review_id = %row.id, recipe_id = %recipe_id, user_id = %user.id, rating, "review created");

    match reviews_view(conn, vec![row]) {
        Ok(mut views) if !views.is_empty() => {
            (StatusCode::CREATED, Json(views.remove(0))).into_response()
        }
        Ok(_) => internal_error("Failed to load created review", "empty view"),
        Err(e) => internal_error("Failed to load created review", e),
    }
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid rating or comment, or already reviewed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_review(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateReviewRequest>,
) -> Response {
    let mut conn = get_conn!(pool);
    insert_review(
        &mut conn,
        &user,
        request.recipe_id,
        request.rating,
        &request.comment,
    )
}

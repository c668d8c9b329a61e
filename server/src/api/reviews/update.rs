use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::ReviewRow;
use crate::schema::reviews;
use crate::views::reviews_view;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use ladle_core::review::{validate_comment, validate_rating};
use ladle_core::{Review, UpdateReviewRequest};
use std::sync::Arc;
use uuid::Uuid;

use super::can_manage;

#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    tag = "reviews",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 400, description = "Invalid rating or comment", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the reviewer", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_review(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateReviewRequest>,
) -> Response {
    if let Some(rating) = request.rating {
        if let Err(e) = validate_rating(rating) {
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    }
    let comment = match request.comment.as_deref().map(validate_comment) {
        Some(Ok(c)) => Some(c.to_string()),
        Some(Err(e)) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        None => None,
    };

    let mut conn = get_conn!(pool);

    let existing: ReviewRow = match reviews::table
        .find(id)
        .select(ReviewRow::as_select())
        .first(&mut conn)
        .optional()
    {
        Ok(Some(r)) => r,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Review not found"),
        Err(e) => return internal_error("Failed to fetch review", e),
    };

    if !can_manage(&user, &existing) {
        return error_response(StatusCode::FORBIDDEN, "You can only edit your own reviews");
    }

    let row: ReviewRow = match diesel::update(reviews::table.find(id))
        .set((
            reviews::rating.eq(request.rating.unwrap_or(existing.rating)),
            reviews::comment.eq(comment.unwrap_or(existing.comment)),
            reviews::updated_at.eq(Utc::now()),
        ))
        .returning(ReviewRow::as_returning())
        .get_result(&mut conn)
    {
        Ok(r) => r,
        Err(e) => return internal_error("Failed to update review", e),
    };

    match reviews_view(&mut conn, vec![row]) {
        Ok(mut views) if !views.is_empty() => (StatusCode::OK, Json(views.remove(0))).into_response(),
        Ok(_) => internal_error("Failed to load updated review", "empty view"),
        Err(e) => internal_error("Failed to load updated review", e),
    }
}

use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::ReviewRow;
use crate::schema::reviews;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use super::can_manage;

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    tag = "reviews",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the reviewer", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_review(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Response {
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
        return error_response(StatusCode::FORBIDDEN, "You can only delete your own reviews");
    }

    match diesel::delete(reviews::table.find(id)).execute(&mut conn) {
        Ok(_) => {
            tracing::info!(review_id = %id, user_id = %user.id, "review deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => internal_error("Failed to delete review", e),
    }
}

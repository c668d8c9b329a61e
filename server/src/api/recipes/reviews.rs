use crate::api::reviews::create::insert_review;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use ladle_core::{AttachReviewRequest, Review};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/reviews",
    tag = "reviews",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = AttachReviewRequest,
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
pub async fn attach_review(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AttachReviewRequest>,
) -> Response {
    let mut conn = get_conn!(pool);
    insert_review(&mut conn, &user, id, request.rating, &request.comment)
}

use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::categories;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted; its recipes become uncategorized"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_category(
    AdminUser(admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Response {
    let mut conn = get_conn!(pool);

    // recipes.category_id is ON DELETE SET NULL
    match diesel::delete(categories::table.find(id)).execute(&mut conn) {
        Ok(0) => error_response(StatusCode::NOT_FOUND, "Category not found"),
        Ok(_) => {
            tracing::info!(category_id = %id, admin_id = %admin.id, "category deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => internal_error("Failed to delete category", e),
    }
}

use crate::api::{error_response, internal_error, is_unique_violation, ErrorResponse};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{CategoryChanges, CategoryRow};
use crate::schema::categories;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use ladle_core::{Category, UpdateCategoryRequest};
use std::sync::Arc;
use uuid::Uuid;

use super::recipe_counts;

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Blank or duplicate name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_category(
    AdminUser(_admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Response {
    let name = match request.name {
        Some(n) if n.trim().is_empty() => {
            return error_response(StatusCode::BAD_REQUEST, "Category name cannot be empty")
        }
        other => other.map(|n| n.trim().to_string()),
    };

    let changes = CategoryChanges {
        name,
        description: request.description.map(|d| d.trim().to_string()),
        icon: request.icon.map(|i| i.trim().to_string()),
        color: request.color.map(|c| c.trim().to_string()),
        bg_color: request.bg_color.map(|c| c.trim().to_string()),
        updated_at: Some(Utc::now()),
    };

    let mut conn = get_conn!(pool);

    let row: CategoryRow = match diesel::update(categories::table.find(id))
        .set(&changes)
        .returning(CategoryRow::as_returning())
        .get_result(&mut conn)
        .optional()
    {
        Ok(Some(c)) => c,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Category not found"),
        Err(e) if is_unique_violation(&e) => {
            return error_response(StatusCode::BAD_REQUEST, "A category with that name already exists")
        }
        Err(e) => return internal_error("Failed to update category", e),
    };

    let count = match recipe_counts(&mut conn) {
        Ok(c) => c.get(&id).copied().unwrap_or(0),
        Err(e) => return internal_error("Failed to count recipes", e),
    };

    (StatusCode::OK, Json(row.to_api(count))).into_response()
}

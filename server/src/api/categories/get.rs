use crate::api::{error_response, internal_error, ErrorResponse};
use crate::db::DbPool;
use crate::get_conn;
use crate::models::CategoryRow;
use crate::schema::categories;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::Category;
use std::sync::Arc;
use uuid::Uuid;

use super::recipe_counts;

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "categories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_category(State(pool): State<Arc<DbPool>>, Path(id): Path<Uuid>) -> Response {
    let mut conn = get_conn!(pool);

    let row: CategoryRow = match categories::table
        .find(id)
        .select(CategoryRow::as_select())
        .first(&mut conn)
        .optional()
    {
        Ok(Some(c)) => c,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Category not found"),
        Err(e) => return internal_error("Failed to fetch category", e),
    };

    let count = match recipe_counts(&mut conn) {
        Ok(c) => c.get(&id).copied().unwrap_or(0),
        Err(e) => return internal_error("Failed to count recipes", e),
    };

    (StatusCode::OK, Json(row.to_api(count))).into_response()
}

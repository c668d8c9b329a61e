use crate::api::internal_error;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::CategoryRow;
use crate::schema::categories;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::Category;
use std::sync::Arc;

use super::recipe_counts;

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories by name, with active recipe counts", body = Vec<Category>)
    )
)]
pub async fn list_categories(State(pool): State<Arc<DbPool>>) -> Response {
    let mut conn = get_conn!(pool);

    let rows: Vec<CategoryRow> = match categories::table
        .order(categories::name.asc())
        .select(CategoryRow::as_select())
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => return internal_error("Failed to fetch categories", e),
    };

    let counts = match recipe_counts(&mut conn) {
        Ok(c) => c,
        Err(e) => return internal_error("Failed to count recipes", e),
    };

    let categories: Vec<Category> = rows
        .iter()
        .map(|c| c.to_api(counts.get(&c.id).copied().unwrap_or(0)))
        .collect();

    (StatusCode::OK, Json(categories)).into_response()
}

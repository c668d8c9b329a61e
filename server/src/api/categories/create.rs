use crate::api::{error_response, internal_error, is_unique_violation, non_blank, ErrorResponse};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{CategoryRow, NewCategory};
use crate::schema::categories;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::{Category, CategoryRequest};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Blank or duplicate name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_category(
    AdminUser(admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CategoryRequest>,
) -> Response {
    let name = request.name.trim();
    if name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Category name cannot be empty");
    }

    let description = non_blank(request.description);
    let icon = non_blank(request.icon);
    let color = non_blank(request.color);
    let bg_color = non_blank(request.bg_color);

    let mut conn = get_conn!(pool);

    let row: CategoryRow = match diesel::insert_into(categories::table)
        .values(&NewCategory {
            name,
            description: description.as_deref(),
            icon: icon.as_deref(),
            color: color.as_deref(),
            bg_color: bg_color.as_deref(),
        })
        .returning(CategoryRow::as_returning())
        .get_result(&mut conn)
    {
        Ok(c) => c,
        // Names are unique ignoring case
        Err(e) if is_unique_violation(&e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Category \"{}\" already exists", name),
            )
        }
        Err(e) => return internal_error("Failed to create category", e),
    };

    tracing::info!(category_id = %row.id, admin_id = %admin.id, "category created");

    (StatusCode::CREATED, Json(row.to_api(0))).into_response()
}

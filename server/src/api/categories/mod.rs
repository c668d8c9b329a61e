pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use crate::recipe_is_active;
use crate::schema::recipes;
use crate::AppState;
use axum::routing::get;
use axum::Router;
use diesel::dsl::count;
use diesel::prelude::*;
use std::collections::HashMap;
use utoipa::OpenApi;
use uuid::Uuid;

/// Returns the router for /api/categories endpoints (mounted at /api/categories)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_categories).post(create::create_category))
        .route(
            "/{id}",
            get(get::get_category)
                .put(update::update_category)
                .delete(delete::delete_category),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_categories,
        get::get_category,
        create::create_category,
        update::update_category,
        delete::delete_category,
    ),
    components(schemas(
        ladle_core::Category,
        ladle_core::CategoryRequest,
        ladle_core::UpdateCategoryRequest,
    ))
)]
pub struct ApiDoc;

/// Number of active recipes in each category. Empty categories are absent.
pub fn recipe_counts(conn: &mut PgConnection) -> QueryResult<HashMap<Uuid, i64>> {
    let rows: Vec<(Option<Uuid>, i64)> = recipes::table
        .filter(recipe_is_active!())
        .filter(recipes::category_id.is_not_null())
        .group_by(recipes::category_id)
        .select((recipes::category_id, count(recipes::id)))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .filter_map(|(id, n)| id.map(|id| (id, n)))
        .collect())
}
